//! Data model for the menu core.
//!
//! Everything here is a plain snapshot or value type: the router reads
//! [`AdapterInfo`]/[`DeviceInfo`] snapshots from the gateway and produces
//! [`MenuItem`]s, each carrying a [`Binding`] that is either an immediate
//! navigation or a deferred [`Action`] for the executor.

use crate::domain::navigation::Origin;

/// Adapter state snapshot, read once per render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterInfo {
    pub alias: String,
    pub discoverable: bool,
    /// Seconds the adapter stays discoverable; 0 means permanently.
    pub discoverable_timeout: u64,
    pub pairable: bool,
    /// Seconds the adapter stays pairable; 0 means permanently.
    pub pairable_timeout: u64,
    pub discovering: bool,
}

/// Remote device snapshot, read once per render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Colon-delimited address, e.g. `AA:BB:CC:DD:EE:FF`.
    pub address: String,
    pub alias: String,
    pub name: Option<String>,
    /// BlueZ icon class, e.g. `audio-headset`.
    pub icon: Option<String>,
    pub paired: bool,
    pub connected: bool,
    pub trusted: bool,
    pub blocked: bool,
    /// Present while the device is observed during discovery.
    pub rssi: Option<i16>,
}

impl DeviceInfo {
    pub fn has_name(&self) -> bool {
        self.name.is_some()
    }

    /// A device counts as nearby while it has a signal-strength reading.
    pub fn is_nearby(&self) -> bool {
        self.rssi.is_some()
    }

    /// Display name for detail views; falls back to the alias when the
    /// device never reported a name.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.alias)
    }
}

/// What activating a menu item does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Informational item, activation is a no-op.
    Nothing,
    /// Replace the query argument (the keyword is prepended by the host).
    SetQuery(String),
    /// Dispatch a deferred action to the executor.
    Run(Action),
}

/// One selectable row in the rendered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub icon: String,
    pub title: String,
    pub description: Option<String>,
    pub highlightable: bool,
    pub on_enter: Binding,
    pub on_alt_enter: Option<Binding>,
}

impl MenuItem {
    pub fn new(icon: impl Into<String>, title: impl Into<String>, on_enter: Binding) -> Self {
        Self {
            icon: icon.into(),
            title: title.into(),
            description: None,
            highlightable: false,
            on_enter,
            on_alt_enter: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_alt_enter(mut self, binding: Binding) -> Self {
        self.on_alt_enter = Some(binding);
        self
    }
}

/// A deferred side effect bound to a rendered item.
///
/// Carries the keyword and the argument string that was active when the
/// item was rendered, so the executor can redirect deterministically. Only
/// constructible with that context attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    keyword: String,
    last_input: String,
    pub kind: ActionKind,
}

impl Action {
    pub fn new(keyword: &str, last_input: &str, kind: ActionKind) -> Self {
        Self {
            keyword: keyword.to_string(),
            last_input: last_input.to_string(),
            kind,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn last_input(&self) -> &str {
        &self.last_input
    }
}

/// Closed set of side effects the executor knows how to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    Reload,
    TurnOn,
    TurnOff,
    ChangeAdapterAlias {
        alias: String,
    },
    ChangeDiscoverable {
        discoverable: bool,
        timeout: Option<u64>,
    },
    ChangePairable {
        pairable: bool,
        timeout: Option<u64>,
    },
    StartScan,
    StopScan,
    Connect {
        address: String,
        origin: Origin,
    },
    Disconnect {
        address: String,
        origin: Origin,
    },
    Pair {
        address: String,
    },
    Unpair {
        address: String,
        origin: Origin,
    },
    ChangeDeviceAlias {
        address: String,
        origin: Origin,
        alias: String,
    },
    ChangeDeviceTrusted {
        address: String,
        origin: Origin,
        trusted: bool,
    },
    ChangeDeviceBlocked {
        address: String,
        origin: Origin,
        blocked: bool,
    },
}
