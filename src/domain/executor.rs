//! Action execution with bounded waits and deterministic redirects.
//!
//! One action performs at most one externally observable side effect, then
//! resolves to the next query argument the host should re-submit. Every
//! gateway failure, hard-deadline expiry or exhausted verification poll is
//! absorbed here and turned into the documented redirect; nothing escapes
//! as a fault.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::gateway::{AdapterPower, BluetoothGateway};
use crate::domain::models::{Action, ActionKind};
use crate::domain::navigation::{encode_address, Origin};
use crate::domain::waiting::{wait_while, with_deadline, CallOutcome};

/// Poll and deadline parameters, normally taken from [`crate::domain::settings::Settings`].
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    /// Interval between verification poll checks.
    pub poll_interval: Duration,
    /// Total budget for a verification poll.
    pub poll_timeout: Duration,
    /// Hard deadline for a single connect/pair call.
    pub operation_deadline: Duration,
    /// Settle delay after starting discovery, before listing results.
    pub scan_settle: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(250),
            poll_timeout: Duration::from_secs(5),
            operation_deadline: Duration::from_secs(5),
            scan_settle: Duration::from_secs(2),
        }
    }
}

pub struct Executor<'a> {
    gateway: &'a dyn BluetoothGateway,
    power: &'a dyn AdapterPower,
    timing: Timing,
}

impl<'a> Executor<'a> {
    pub fn new(gateway: &'a dyn BluetoothGateway, power: &'a dyn AdapterPower, timing: Timing) -> Self {
        Self {
            gateway,
            power,
            timing,
        }
    }

    /// Perform the action's side effect and compute the next query
    /// argument. `None` means no redirect (the host leaves the current
    /// view untouched).
    pub async fn execute(&self, action: &Action) -> Option<String> {
        debug!(kind = ?action.kind, last_input = action.last_input(), "executing action");
        let last_input = action.last_input();

        match &action.kind {
            ActionKind::Reload => return Some(last_input.to_string()),
            ActionKind::TurnOn => return self.turn_on().await,
            _ => {}
        }

        // Every remaining action needs the adapter; without one, redirect
        // to the unmodified query so the turn-on prompt renders.
        let Some(adapter) = self.gateway.adapter().await else {
            debug!("adapter vanished, redirecting without effect");
            return Some(last_input.to_string());
        };

        match action.kind.clone() {
            ActionKind::Reload | ActionKind::TurnOn => unreachable!("handled above"),

            ActionKind::TurnOff => {
                self.power.power_off().await;
                let gateway = self.gateway;
                let resolved = self
                    .poll(move || async move { gateway.adapter().await.is_some() })
                    .await;
                if resolved {
                    info!("adapter turned off");
                    Some(last_input.to_string())
                } else {
                    warn!("adapter still present after turn-off command");
                    None
                }
            }

            ActionKind::ChangeAdapterAlias { alias } => {
                if let Err(err) = self.gateway.set_adapter_alias(&alias).await {
                    warn!(%err, "failed to change adapter alias");
                }
                Some("settings".to_string())
            }

            ActionKind::ChangeDiscoverable {
                discoverable,
                timeout,
            } => {
                if let Err(err) = self
                    .gateway
                    .set_discoverable(discoverable, timeout.unwrap_or(0))
                    .await
                {
                    warn!(%err, "failed to change discoverable mode");
                }
                Some("settings".to_string())
            }

            ActionKind::ChangePairable { pairable, timeout } => {
                if let Err(err) = self
                    .gateway
                    .set_pairable(pairable, timeout.unwrap_or(0))
                    .await
                {
                    warn!(%err, "failed to change pairable mode");
                }
                Some("settings".to_string())
            }

            ActionKind::StartScan => {
                if adapter.discovering {
                    debug!("discovery already running");
                    return Some(last_input.to_string());
                }
                if let Err(err) = self.gateway.start_discovery().await {
                    warn!(%err, "failed to start discovery");
                    return Some(last_input.to_string());
                }
                // Give discovery a moment to populate before listing.
                tokio::time::sleep(self.timing.scan_settle).await;
                Some("scanned".to_string())
            }

            ActionKind::StopScan => {
                if adapter.discovering {
                    if let Err(err) = self.gateway.stop_discovery().await {
                        warn!(%err, "failed to stop discovery");
                    }
                }
                Some(last_input.to_string())
            }

            ActionKind::Connect { address, origin } => self.connect(&address, origin).await,

            ActionKind::Disconnect { address, origin } => self.disconnect(&address, origin).await,

            ActionKind::Pair { address } => self.pair(&address).await,

            ActionKind::Unpair { address, origin } => self.unpair(&address, origin).await,

            ActionKind::ChangeDeviceAlias {
                address,
                origin,
                alias,
            } => {
                self.change_device_property(&address, origin, |gateway, address| async move {
                    gateway.set_device_alias(&address, &alias).await
                })
                .await
            }

            ActionKind::ChangeDeviceTrusted {
                address,
                origin,
                trusted,
            } => {
                self.change_device_property(&address, origin, |gateway, address| async move {
                    gateway.set_device_trusted(&address, trusted).await
                })
                .await
            }

            ActionKind::ChangeDeviceBlocked {
                address,
                origin,
                blocked,
            } => {
                self.change_device_property(&address, origin, |gateway, address| async move {
                    gateway.set_device_blocked(&address, blocked).await
                })
                .await
            }
        }
    }

    async fn turn_on(&self) -> Option<String> {
        if self.gateway.adapter().await.is_some() {
            debug!("adapter already present");
            return None;
        }
        self.power.power_on().await;
        let gateway = self.gateway;
        let resolved = self
            .poll(move || async move { gateway.adapter().await.is_none() })
            .await;
        if resolved {
            info!("adapter turned on");
            Some(String::new())
        } else {
            warn!("adapter still absent after turn-on command");
            None
        }
    }

    async fn connect(&self, address: &str, origin: Origin) -> Option<String> {
        let fallback = origin.back_argument().to_string();
        let Some(device) = self.gateway.device(address).await else {
            warn!(address, "device to connect is gone");
            return Some(fallback);
        };
        let detail = detail_argument(origin, address);
        if device.connected {
            return Some(detail);
        }

        match with_deadline(
            self.gateway.connect_device(address),
            self.timing.operation_deadline,
        )
        .await
        {
            CallOutcome::Ok => {
                info!(address, "connected");
                Some(detail)
            }
            outcome => {
                warn!(address, ?outcome, "connect failed");
                Some(fallback)
            }
        }
    }

    async fn disconnect(&self, address: &str, origin: Origin) -> Option<String> {
        // Back to the paired list when we came from it, otherwise to the
        // detail view; the verification outcome does not change the target.
        let target = match origin {
            Origin::FromPaired => "paired".to_string(),
            Origin::Direct => detail_argument(origin, address),
        };
        let Some(device) = self.gateway.device(address).await else {
            return Some(target);
        };
        if device.connected {
            if let Err(err) = self.gateway.disconnect_device(address).await {
                warn!(address, %err, "disconnect failed");
            }
            let gateway = self.gateway;
            let confirmed = self
                .poll(move || async move {
                    gateway
                        .device(address)
                        .await
                        .map(|d| d.connected)
                        .unwrap_or(false)
                })
                .await;
            if !confirmed {
                debug!(address, "disconnect not confirmed in time");
            }
        }
        Some(target)
    }

    async fn pair(&self, address: &str) -> Option<String> {
        let Some(device) = self.gateway.device(address).await else {
            warn!(address, "device to pair is gone");
            return Some("scanned".to_string());
        };
        if device.paired {
            return Some(detail_argument(Origin::Direct, address));
        }

        match with_deadline(
            self.gateway.pair_device(address),
            self.timing.operation_deadline,
        )
        .await
        {
            CallOutcome::Ok => {
                info!(address, "paired");
                Some(detail_argument(Origin::FromPaired, address))
            }
            outcome => {
                warn!(address, ?outcome, "pairing failed");
                Some("scanned".to_string())
            }
        }
    }

    async fn unpair(&self, address: &str, origin: Origin) -> Option<String> {
        let target = origin.back_argument().to_string();
        let Some(device) = self.gateway.device(address).await else {
            return Some(target);
        };
        if !device.paired {
            return Some(target);
        }

        if let Err(err) = self.gateway.remove_device(address).await {
            warn!(address, %err, "unpair failed");
        }
        // Best effort: wait for the removal to be visible, but redirect
        // either way.
        let gateway = self.gateway;
        let confirmed = self
            .poll(move || async move {
                gateway
                    .device(address)
                    .await
                    .map(|d| d.paired)
                    .unwrap_or(false)
            })
            .await;
        if !confirmed {
            debug!(address, "removal not confirmed in time");
        }
        Some(target)
    }

    /// Shared precondition for alias/trusted/blocked changes: the device
    /// must still be resolvable and paired, otherwise redirect to the
    /// origin's list view without touching anything.
    async fn change_device_property<F, Fut>(
        &self,
        address: &str,
        origin: Origin,
        set: F,
    ) -> Option<String>
    where
        F: FnOnce(&'a dyn BluetoothGateway, String) -> Fut,
        Fut: std::future::Future<Output = crate::domain::gateway::GatewayResult<()>>,
    {
        let device = self.gateway.device(address).await;
        if !device.map(|d| d.paired).unwrap_or(false) {
            debug!(address, "device missing or unpaired, skipping property change");
            return Some(origin.back_argument().to_string());
        }
        if let Err(err) = set(self.gateway, address.to_string()).await {
            warn!(address, %err, "device property change failed");
        }
        Some(detail_argument(origin, address))
    }

    async fn poll<F, Fut>(&self, condition: F) -> bool
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        wait_while(condition, self.timing.poll_interval, self.timing.poll_timeout).await
    }
}

fn detail_argument(origin: Origin, address: &str) -> String {
    format!("{} {}", origin.branch(), encode_address(address))
}
