//! Contracts towards the Bluetooth control plane.
//!
//! The core never talks to BlueZ directly: it reads snapshots and issues
//! mutations through [`BluetoothGateway`], and powers the adapter on/off
//! through [`AdapterPower`]. Production implementations live in
//! `infrastructure`; tests use the in-memory fake from [`testing`].

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::{AdapterInfo, DeviceInfo};

/// Failures a gateway call can report. Both are ordinary outcomes for the
/// executor, never faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The adapter or device vanished between render and action.
    #[error("adapter or device is no longer available")]
    Unavailable,
    /// The operation did not complete in time (connect/pair).
    #[error("operation timed out")]
    Timeout,
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Snapshot reads and mutations against a single local adapter and its
/// devices. Devices are keyed by their colon-form address.
#[async_trait]
pub trait BluetoothGateway: Send + Sync {
    /// Adapter snapshot, or `None` while no adapter is present.
    async fn adapter(&self) -> Option<AdapterInfo>;

    /// All known devices.
    async fn devices(&self) -> BTreeMap<String, DeviceInfo>;

    /// One device by colon-form address.
    async fn device(&self, address: &str) -> Option<DeviceInfo>;

    /// Devices with a signal-strength reading (observed during discovery).
    async fn nearby_devices(&self) -> BTreeMap<String, DeviceInfo> {
        let mut devices = self.devices().await;
        devices.retain(|_, device| device.is_nearby());
        devices
    }

    async fn connected_devices(&self) -> BTreeMap<String, DeviceInfo> {
        let mut devices = self.devices().await;
        devices.retain(|_, device| device.connected);
        devices
    }

    async fn paired_devices(&self) -> BTreeMap<String, DeviceInfo> {
        let mut devices = self.devices().await;
        devices.retain(|_, device| device.paired);
        devices
    }

    async fn set_adapter_alias(&self, alias: &str) -> GatewayResult<()>;
    /// `timeout` is in seconds; 0 means permanently discoverable.
    async fn set_discoverable(&self, discoverable: bool, timeout: u64) -> GatewayResult<()>;
    /// `timeout` is in seconds; 0 means permanently pairable.
    async fn set_pairable(&self, pairable: bool, timeout: u64) -> GatewayResult<()>;
    async fn start_discovery(&self) -> GatewayResult<()>;
    async fn stop_discovery(&self) -> GatewayResult<()>;
    async fn remove_device(&self, address: &str) -> GatewayResult<()>;
    async fn connect_device(&self, address: &str) -> GatewayResult<()>;
    async fn disconnect_device(&self, address: &str) -> GatewayResult<()>;
    async fn pair_device(&self, address: &str) -> GatewayResult<()>;
    async fn set_device_alias(&self, address: &str, alias: &str) -> GatewayResult<()>;
    async fn set_device_trusted(&self, address: &str, trusted: bool) -> GatewayResult<()>;
    async fn set_device_blocked(&self, address: &str, blocked: bool) -> GatewayResult<()>;
}

/// Launches the configured "turn adapter on/off" commands. Failures are
/// logged by the implementation; the executor verifies the outcome by
/// polling adapter presence instead.
#[async_trait]
pub trait AdapterPower: Send + Sync {
    async fn power_on(&self);
    async fn power_off(&self);
}
