pub mod executor;
pub mod gateway;
pub mod icons;
pub mod models;
pub mod navigation;
pub mod router;
pub mod settings;
pub mod time_format;
pub mod waiting;
