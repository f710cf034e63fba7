//! BlueZ-backed gateway implementation on top of `bluer`.
//!
//! The adapter handle is memoized and re-resolved whenever it goes stale,
//! so the core sees `None` while Bluetooth is off and a fresh snapshot as
//! soon as it comes back. Discovery stays active for as long as the event
//! stream returned by `bluer` is held; dropping it stops the scan.

use std::collections::BTreeMap;
use std::pin::Pin;
use std::str::FromStr;

use async_trait::async_trait;
use bluer::{Adapter, AdapterEvent, Address, Device, Session};
use futures::Stream;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::gateway::{BluetoothGateway, GatewayError, GatewayResult};
use crate::domain::models::{AdapterInfo, DeviceInfo};

type DiscoveryStream = Pin<Box<dyn Stream<Item = AdapterEvent> + Send>>;

pub struct BluezGateway {
    session: Session,
    preferred_name: String,
    adapter: Mutex<Option<Adapter>>,
    discovery: Mutex<Option<DiscoveryStream>>,
}

impl BluezGateway {
    pub async fn new(preferred_name: &str) -> bluer::Result<Self> {
        let session = Session::new().await?;
        Ok(Self {
            session,
            preferred_name: preferred_name.to_string(),
            adapter: Mutex::new(None),
            discovery: Mutex::new(None),
        })
    }

    /// Memoized adapter handle. A powered-off or removed adapter counts as
    /// absent; the stale handle and any running discovery are dropped.
    async fn handle(&self) -> Option<Adapter> {
        let mut memo = self.adapter.lock().await;
        if let Some(adapter) = memo.as_ref() {
            if adapter.is_powered().await.unwrap_or(false) {
                return Some(adapter.clone());
            }
            debug!("adapter handle went stale");
            *memo = None;
            self.discovery.lock().await.take();
        }

        let names = self.session.adapter_names().await.ok()?;
        let name = names
            .iter()
            .find(|name| **name == self.preferred_name)
            .or_else(|| names.first())?;
        let adapter = self.session.adapter(name).ok()?;
        if !adapter.is_powered().await.unwrap_or(false) {
            return None;
        }
        debug!(%name, "resolved adapter");
        *memo = Some(adapter.clone());
        Some(adapter)
    }

    async fn resolve_device(&self, address: &str) -> GatewayResult<Device> {
        let adapter = self.handle().await.ok_or(GatewayError::Unavailable)?;
        let address = Address::from_str(address).map_err(|_| GatewayError::Unavailable)?;
        adapter.device(address).map_err(|_| GatewayError::Unavailable)
    }

    async fn snapshot_adapter(adapter: &Adapter) -> bluer::Result<AdapterInfo> {
        Ok(AdapterInfo {
            alias: adapter.alias().await?,
            discoverable: adapter.is_discoverable().await?,
            discoverable_timeout: u64::from(adapter.discoverable_timeout().await?),
            pairable: adapter.is_pairable().await?,
            pairable_timeout: u64::from(adapter.pairable_timeout().await?),
            discovering: adapter.is_discovering().await?,
        })
    }

    async fn snapshot_device(device: &Device) -> bluer::Result<DeviceInfo> {
        Ok(DeviceInfo {
            address: device.address().to_string(),
            alias: device.alias().await?,
            name: device.name().await?,
            icon: device.icon().await?,
            paired: device.is_paired().await?,
            connected: device.is_connected().await?,
            trusted: device.is_trusted().await?,
            blocked: device.is_blocked().await?,
            rssi: device.rssi().await?,
        })
    }
}

fn map_err(err: bluer::Error) -> GatewayError {
    match err.kind {
        bluer::ErrorKind::AuthenticationTimeout => GatewayError::Timeout,
        _ => GatewayError::Unavailable,
    }
}

#[async_trait]
impl BluetoothGateway for BluezGateway {
    async fn adapter(&self) -> Option<AdapterInfo> {
        let adapter = self.handle().await?;
        match Self::snapshot_adapter(&adapter).await {
            Ok(info) => Some(info),
            Err(err) => {
                warn!(%err, "failed to read adapter properties");
                None
            }
        }
    }

    async fn devices(&self) -> BTreeMap<String, DeviceInfo> {
        let mut devices = BTreeMap::new();
        let Some(adapter) = self.handle().await else {
            return devices;
        };
        let addresses = match adapter.device_addresses().await {
            Ok(addresses) => addresses,
            Err(err) => {
                warn!(%err, "failed to enumerate devices");
                return devices;
            }
        };
        for address in addresses {
            let Ok(device) = adapter.device(address) else {
                continue;
            };
            match Self::snapshot_device(&device).await {
                Ok(info) => {
                    devices.insert(info.address.clone(), info);
                }
                // A device can be removed mid-enumeration; skip it.
                Err(err) => debug!(%address, %err, "skipping device"),
            }
        }
        devices
    }

    async fn device(&self, address: &str) -> Option<DeviceInfo> {
        let device = self.resolve_device(address).await.ok()?;
        Self::snapshot_device(&device).await.ok()
    }

    async fn set_adapter_alias(&self, alias: &str) -> GatewayResult<()> {
        let adapter = self.handle().await.ok_or(GatewayError::Unavailable)?;
        adapter.set_alias(alias.to_string()).await.map_err(map_err)
    }

    async fn set_discoverable(&self, discoverable: bool, timeout: u64) -> GatewayResult<()> {
        let adapter = self.handle().await.ok_or(GatewayError::Unavailable)?;
        // Timeout has to land before the flag, or BlueZ applies the old one.
        let timeout = u32::try_from(timeout).unwrap_or(u32::MAX);
        adapter
            .set_discoverable_timeout(timeout)
            .await
            .map_err(map_err)?;
        adapter.set_discoverable(discoverable).await.map_err(map_err)
    }

    async fn set_pairable(&self, pairable: bool, timeout: u64) -> GatewayResult<()> {
        let adapter = self.handle().await.ok_or(GatewayError::Unavailable)?;
        let timeout = u32::try_from(timeout).unwrap_or(u32::MAX);
        adapter
            .set_pairable_timeout(timeout)
            .await
            .map_err(map_err)?;
        adapter.set_pairable(pairable).await.map_err(map_err)
    }

    async fn start_discovery(&self) -> GatewayResult<()> {
        let adapter = self.handle().await.ok_or(GatewayError::Unavailable)?;
        let stream = adapter.discover_devices().await.map_err(map_err)?;
        // Holding the stream keeps the scan running.
        *self.discovery.lock().await = Some(Box::pin(stream));
        Ok(())
    }

    async fn stop_discovery(&self) -> GatewayResult<()> {
        self.discovery.lock().await.take();
        Ok(())
    }

    async fn remove_device(&self, address: &str) -> GatewayResult<()> {
        let adapter = self.handle().await.ok_or(GatewayError::Unavailable)?;
        let address = Address::from_str(address).map_err(|_| GatewayError::Unavailable)?;
        adapter.remove_device(address).await.map_err(map_err)
    }

    async fn connect_device(&self, address: &str) -> GatewayResult<()> {
        let device = self.resolve_device(address).await?;
        device.connect().await.map_err(map_err)
    }

    async fn disconnect_device(&self, address: &str) -> GatewayResult<()> {
        let device = self.resolve_device(address).await?;
        device.disconnect().await.map_err(map_err)
    }

    async fn pair_device(&self, address: &str) -> GatewayResult<()> {
        let device = self.resolve_device(address).await?;
        device.pair().await.map_err(map_err)
    }

    async fn set_device_alias(&self, address: &str, alias: &str) -> GatewayResult<()> {
        let device = self.resolve_device(address).await?;
        device.set_alias(alias.to_string()).await.map_err(map_err)
    }

    async fn set_device_trusted(&self, address: &str, trusted: bool) -> GatewayResult<()> {
        let device = self.resolve_device(address).await?;
        device.set_trusted(trusted).await.map_err(map_err)
    }

    async fn set_device_blocked(&self, address: &str, blocked: bool) -> GatewayResult<()> {
        let device = self.resolve_device(address).await?;
        device.set_blocked(blocked).await.map_err(map_err)
    }
}
