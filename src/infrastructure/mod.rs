pub mod bluez;
pub mod logging;
pub mod power;
