//! Query-driven navigation: one argument string in, one menu out.
//!
//! The router re-derives the [`NavState`] from the argument on every call,
//! reads a fresh gateway snapshot and produces the ordered item list for
//! that state. It performs no side effects itself; items either navigate
//! (rewrite the query) or carry a deferred [`Action`] for the executor.

use tracing::debug;

use crate::domain::gateway::BluetoothGateway;
use crate::domain::icons;
use crate::domain::models::{
    Action, ActionKind, AdapterInfo, Binding, DeviceInfo, MenuItem,
};
use crate::domain::navigation::{encode_address, NavState, Origin, SettingsField};
use crate::domain::time_format::{format_duration, parse_duration};

const TIME_HELP: &str = "You can use \"s\", \"m\", \"h\" and \"d\"\nFor example: \"1h 30m\"";

pub struct Router<'a> {
    gateway: &'a dyn BluetoothGateway,
    keyword: &'a str,
}

impl<'a> Router<'a> {
    pub fn new(gateway: &'a dyn BluetoothGateway, keyword: &'a str) -> Self {
        Self { gateway, keyword }
    }

    /// Render the menu for an argument string. Unknown branches yield an
    /// empty list; a missing adapter renders the turn-on prompt regardless
    /// of the requested state.
    pub async fn render(&self, argument: &str) -> Vec<MenuItem> {
        let Some(adapter) = self.gateway.adapter().await else {
            debug!(argument, "no adapter present, offering turn-on");
            return vec![MenuItem::new(
                icons::GENERIC,
                "Turn Bluetooth on",
                self.run(argument, ActionKind::TurnOn),
            )];
        };

        let Some(state) = NavState::parse(argument) else {
            debug!(argument, "unrecognized argument");
            return Vec::new();
        };

        match state {
            NavState::Home => self.home(argument, &adapter).await,
            NavState::Settings => self.settings(argument, &adapter),
            NavState::AdapterField { field, value } => {
                self.adapter_field(argument, field, value.as_deref())
            }
            NavState::Paired => self.paired(argument).await,
            NavState::Scanned => self.scanned(argument).await,
            NavState::Device { address, origin } => {
                self.device_detail(argument, &address, origin).await
            }
            NavState::DeviceAlias {
                address,
                origin,
                value,
            } => self.device_alias(argument, &address, origin, value.as_deref()).await,
        }
    }

    fn run(&self, argument: &str, kind: ActionKind) -> Binding {
        Binding::Run(Action::new(self.keyword, argument, kind))
    }

    fn back_item(&self, title: &str, target: &str) -> MenuItem {
        MenuItem::new(icons::BACK, title, Binding::SetQuery(target.to_string()))
    }

    async fn home(&self, argument: &str, adapter: &AdapterInfo) -> Vec<MenuItem> {
        let mut items = Vec::new();

        for (address, device) in self.gateway.connected_devices().await {
            items.push(
                MenuItem::new(
                    icons::device_icon(&device),
                    format!("Connected: {}", device.alias),
                    Binding::SetQuery(format!("device {}", encode_address(&address))),
                )
                .with_description("Enter to manage\nAlt+Enter to disconnect")
                .with_alt_enter(self.run(
                    argument,
                    ActionKind::Disconnect {
                        address,
                        origin: Origin::Direct,
                    },
                )),
            );
        }

        items.push(
            MenuItem::new(
                icons::GENERIC,
                "Change adapter settings",
                Binding::SetQuery("settings".to_string()),
            )
            .with_description("Edit alias and manage discovery and pairing mode"),
        );

        let paired_count = self.gateway.paired_devices().await.len();
        items.push(
            MenuItem::new(
                icons::GENERIC,
                "Paired devices",
                Binding::SetQuery("paired".to_string()),
            )
            .with_description(format!("There are {paired_count} paired devices")),
        );

        if adapter.discovering {
            let nearby_count = self.gateway.nearby_devices().await.len();
            items.push(
                MenuItem::new(
                    icons::GENERIC,
                    format!("Devices found while scanning: {nearby_count}"),
                    Binding::SetQuery("scanned".to_string()),
                )
                .with_description("Enter to list devices\nAlt+Enter to stop scanning")
                .with_alt_enter(self.run(argument, ActionKind::StopScan)),
            );
        } else {
            items.push(MenuItem::new(
                icons::GENERIC,
                "Start scanning for devices",
                self.run(argument, ActionKind::StartScan),
            ));
        }

        items.push(MenuItem::new(
            icons::GENERIC,
            "Turn Bluetooth off",
            self.run(argument, ActionKind::TurnOff),
        ));

        items
    }

    fn settings(&self, argument: &str, adapter: &AdapterInfo) -> Vec<MenuItem> {
        let mut items = vec![
            self.back_item("Go back", ""),
            MenuItem::new(
                icons::GENERIC,
                "Reload settings",
                self.run(argument, ActionKind::Reload),
            ),
            MenuItem::new(
                icons::GENERIC,
                format!("Alias: \"{}\"", adapter.alias),
                Binding::SetQuery("settings alias ".to_string()),
            )
            .with_description("Enter to change"),
        ];

        items.push(self.mode_toggle(
            argument,
            TimedMode::Discoverable,
            adapter.discoverable,
            adapter.discoverable_timeout > 0,
        ));
        items.push(self.mode_toggle(
            argument,
            TimedMode::Pairable,
            adapter.pairable,
            adapter.pairable_timeout > 0,
        ));

        items
    }

    /// The discoverable/pairable rows share their three-way phrasing:
    /// permanently on, temporarily on, or off.
    fn mode_toggle(
        &self,
        argument: &str,
        mode: TimedMode,
        enabled: bool,
        temporary: bool,
    ) -> MenuItem {
        let on_name = mode.on_name();
        let off_name = mode.off_name();
        let timed_query = Binding::SetQuery(format!("settings {} ", mode.token()));
        let set = |on: bool| self.run(argument, mode.change_action(on, None));

        if enabled && !temporary {
            MenuItem::new(icons::GENERIC, format!("Adapter is {on_name}"), set(false))
                .with_description(format!(
                    "Enter to make it {off_name}\nAlt+Enter to make it temporarily {on_name}"
                ))
                .with_alt_enter(timed_query)
        } else if enabled {
            MenuItem::new(
                icons::GENERIC,
                format!("Adapter is temporarily {on_name}"),
                set(false),
            )
            .with_description(format!(
                "Enter to make it {off_name}\nAlt+Enter to make it permanently {on_name}"
            ))
            .with_alt_enter(set(true))
        } else {
            MenuItem::new(icons::GENERIC, format!("Adapter is {off_name}"), set(true))
                .with_description(format!(
                    "Enter to make it {on_name}\nAlt+Enter to make it temporarily {on_name}"
                ))
                .with_alt_enter(timed_query)
        }
    }

    fn adapter_field(
        &self,
        argument: &str,
        field: SettingsField,
        value: Option<&str>,
    ) -> Vec<MenuItem> {
        let mut items = match field {
            SettingsField::Alias => match value {
                None => vec![MenuItem::new(
                    icons::GENERIC,
                    "Enter new alias...",
                    Binding::Nothing,
                )],
                Some(alias) => vec![MenuItem::new(
                    icons::GENERIC,
                    format!("Set the new alias: {alias}"),
                    self.run(
                        argument,
                        ActionKind::ChangeAdapterAlias {
                            alias: alias.to_string(),
                        },
                    ),
                )],
            },
            SettingsField::Discoverable => {
                vec![self.timeout_item(argument, TimedMode::Discoverable, value)]
            }
            SettingsField::Pairable => {
                vec![self.timeout_item(argument, TimedMode::Pairable, value)]
            }
        };

        items.push(self.back_item("Cancel", "settings"));
        items
    }

    /// Prompt, invalid-format, invalid-range or confirmation item for a
    /// timeout entry sub-state.
    fn timeout_item(&self, argument: &str, mode: TimedMode, value: Option<&str>) -> MenuItem {
        let item = |title: String, on_enter: Binding| {
            MenuItem::new(icons::GENERIC, title, on_enter).with_description(TIME_HELP)
        };

        let Some(value) = value else {
            return item(
                format!("Enter the new {} timeout", mode.token()),
                Binding::Nothing,
            );
        };
        match parse_duration(value) {
            None => item("Invalid time format".to_string(), Binding::Nothing),
            Some(0) => item(
                "Invalid time (has to be at least 1 second)".to_string(),
                Binding::Nothing,
            ),
            Some(seconds) => item(
                format!(
                    "Set the new {} timeout: {}",
                    mode.token(),
                    format_duration(seconds)
                ),
                self.run(argument, mode.change_action(true, Some(seconds))),
            ),
        }
    }

    async fn paired(&self, argument: &str) -> Vec<MenuItem> {
        let mut items = vec![self.back_item("Go back", "")];

        for (address, device) in self.gateway.paired_devices().await {
            let manage = Binding::SetQuery(format!("device_p {}", encode_address(&address)));
            let item = MenuItem::new(icons::device_icon(&device), device.alias.clone(), {
                if device.connected {
                    manage.clone()
                } else {
                    self.run(
                        argument,
                        ActionKind::Connect {
                            address,
                            origin: Origin::FromPaired,
                        },
                    )
                }
            })
            .with_description(if device.connected {
                "Connected\nEnter to manage"
            } else {
                "Enter to connect\nAlt+Enter to manage"
            })
            .with_alt_enter(manage);
            items.push(item);
        }

        items
    }

    async fn scanned(&self, argument: &str) -> Vec<MenuItem> {
        let mut items = vec![
            self.back_item("Go back", ""),
            MenuItem::new(
                icons::GENERIC,
                "Reload scanned devices",
                self.run(argument, ActionKind::Reload),
            ),
        ];

        // Named devices first; order within each category is whatever the
        // gateway enumeration yields (stable sort).
        let mut nearby: Vec<(String, DeviceInfo)> =
            self.gateway.nearby_devices().await.into_iter().collect();
        nearby.sort_by_key(|(_, device)| !device.has_name());

        for (address, device) in nearby {
            let title = if device.paired {
                format!("{} (Paired)", device.alias)
            } else {
                device.alias.clone()
            };
            let item = if device.paired {
                let manage = Binding::SetQuery(format!("device {}", encode_address(&address)));
                MenuItem::new(icons::device_icon(&device), title, manage.clone())
                    .with_description("Enter to manage")
                    .with_alt_enter(manage)
            } else {
                MenuItem::new(
                    icons::device_icon(&device),
                    title,
                    self.run(argument, ActionKind::Pair { address }),
                )
                .with_description("Enter to pair")
            };
            items.push(item);
        }

        items
    }

    async fn device_detail(
        &self,
        argument: &str,
        address: &str,
        origin: Origin,
    ) -> Vec<MenuItem> {
        let Some(device) = self.gateway.device(address).await else {
            debug!(address, "device not resolvable");
            return Vec::new();
        };
        let icon = icons::device_icon(&device);
        let detail = format!("{} {}", origin.branch(), encode_address(address));

        vec![
            self.back_item("Go back", origin.back_argument()),
            MenuItem::new(
                icons::GENERIC,
                "Reload information",
                self.run(argument, ActionKind::Reload),
            ),
            MenuItem::new(&icon, format!("Device: {}", device.display_name()), {
                self.run(
                    argument,
                    ActionKind::Unpair {
                        address: address.to_string(),
                        origin,
                    },
                )
            })
            .with_description(format!("Address: {address}\nEnter to unpair")),
            MenuItem::new(
                &icon,
                format!("Connected: {}", yes_no(device.connected)),
                self.run(
                    argument,
                    if device.connected {
                        ActionKind::Disconnect {
                            address: address.to_string(),
                            origin,
                        }
                    } else {
                        ActionKind::Connect {
                            address: address.to_string(),
                            origin,
                        }
                    },
                ),
            )
            .with_description(if device.connected {
                "Enter to disconnect"
            } else {
                "Enter to connect"
            }),
            MenuItem::new(
                &icon,
                format!("Alias: {}", device.alias),
                Binding::SetQuery(format!("{detail} alias ")),
            )
            .with_description("Enter to change"),
            MenuItem::new(
                &icon,
                format!("Trusted: {}", yes_no(device.trusted)),
                self.run(
                    argument,
                    ActionKind::ChangeDeviceTrusted {
                        address: address.to_string(),
                        origin,
                        trusted: !device.trusted,
                    },
                ),
            )
            .with_description(if device.trusted {
                "Enter to untrust"
            } else {
                "Enter to trust"
            }),
            MenuItem::new(
                &icon,
                format!("Blocked: {}", yes_no(device.blocked)),
                self.run(
                    argument,
                    ActionKind::ChangeDeviceBlocked {
                        address: address.to_string(),
                        origin,
                        blocked: !device.blocked,
                    },
                ),
            )
            .with_description(if device.blocked {
                "Enter to unblock"
            } else {
                "Enter to block"
            }),
        ]
    }

    async fn device_alias(
        &self,
        argument: &str,
        address: &str,
        origin: Origin,
        value: Option<&str>,
    ) -> Vec<MenuItem> {
        let Some(device) = self.gateway.device(address).await else {
            return Vec::new();
        };
        let icon = icons::device_icon(&device);

        let entry = match value {
            None => MenuItem::new(&icon, "Enter new alias...", Binding::Nothing)
                .with_description(format!("Device: {}", device.display_name())),
            Some(alias) => MenuItem::new(
                &icon,
                format!("Set the new alias: {alias}"),
                self.run(
                    argument,
                    ActionKind::ChangeDeviceAlias {
                        address: address.to_string(),
                        origin,
                        alias: alias.to_string(),
                    },
                ),
            )
            .with_description(format!("Device: {}", device.display_name())),
        };

        // Cancel returns to the detail view, keeping the origin intact.
        let detail = format!("{} {}", origin.branch(), encode_address(address));
        vec![entry, self.back_item("Cancel", &detail)]
    }
}

/// The two adapter modes that share the timed on/off treatment.
#[derive(Debug, Clone, Copy)]
enum TimedMode {
    Discoverable,
    Pairable,
}

impl TimedMode {
    fn token(self) -> &'static str {
        match self {
            Self::Discoverable => "discoverable",
            Self::Pairable => "pairable",
        }
    }

    fn on_name(self) -> &'static str {
        self.token()
    }

    fn off_name(self) -> &'static str {
        match self {
            Self::Discoverable => "invisible",
            Self::Pairable => "not pairable",
        }
    }

    fn change_action(self, enabled: bool, timeout: Option<u64>) -> ActionKind {
        match self {
            Self::Discoverable => ActionKind::ChangeDiscoverable {
                discoverable: enabled,
                timeout,
            },
            Self::Pairable => ActionKind::ChangePairable {
                pairable: enabled,
                timeout,
            },
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gateway::testing::{device_info, FakeGateway};
    use crate::domain::gateway::GatewayError;

    const ADDR: &str = "AA:BB:CC:DD:EE:FF";

    fn router(gateway: &FakeGateway) -> Router<'_> {
        Router::new(gateway, "bt")
    }

    fn action_of(binding: &Binding) -> &Action {
        match binding {
            Binding::Run(action) => action,
            other => panic!("expected a deferred action, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_adapter_renders_single_turn_on_item() {
        let gateway = FakeGateway::default();
        let items = router(&gateway).render("").await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Turn Bluetooth on");
        let action = action_of(&items[0].on_enter);
        assert_eq!(action.kind, ActionKind::TurnOn);
        assert_eq!(action.keyword(), "bt");
        assert_eq!(action.last_input(), "");
    }

    #[tokio::test]
    async fn test_missing_adapter_gates_every_state() {
        let gateway = FakeGateway::default();
        let items = router(&gateway).render("settings").await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Turn Bluetooth on");
    }

    #[tokio::test]
    async fn test_unknown_branch_renders_nothing() {
        let gateway = FakeGateway::with_adapter();
        assert!(router(&gateway).render("nonsense").await.is_empty());
        assert!(router(&gateway).render("device").await.is_empty());
    }

    #[tokio::test]
    async fn test_home_lists_connected_devices_and_entries() {
        let gateway = FakeGateway::with_adapter();
        let mut headset = device_info(ADDR, "Headset");
        headset.paired = true;
        headset.connected = true;
        gateway.add_device(headset);

        let items = router(&gateway).render("").await;
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Connected: Headset",
                "Change adapter settings",
                "Paired devices",
                "Start scanning for devices",
                "Turn Bluetooth off",
            ]
        );
        assert_eq!(
            items[0].on_enter,
            Binding::SetQuery("device AA_BB_CC_DD_EE_FF".to_string())
        );
        let disconnect = action_of(items[0].on_alt_enter.as_ref().unwrap());
        assert_eq!(
            disconnect.kind,
            ActionKind::Disconnect {
                address: ADDR.to_string(),
                origin: Origin::Direct,
            }
        );
        assert_eq!(
            items[2].description.as_deref(),
            Some("There are 1 paired devices")
        );
    }

    #[tokio::test]
    async fn test_home_scan_toggle_reflects_discovering() {
        let gateway = FakeGateway::with_adapter();
        gateway.update(|state| {
            state.adapter.as_mut().unwrap().discovering = true;
        });
        let mut nearby = device_info(ADDR, "Speaker");
        nearby.rssi = Some(-40);
        gateway.add_device(nearby);

        let items = router(&gateway).render("").await;
        let scan = items
            .iter()
            .find(|i| i.title.starts_with("Devices found"))
            .unwrap();
        assert_eq!(scan.title, "Devices found while scanning: 1");
        assert_eq!(scan.on_enter, Binding::SetQuery("scanned".to_string()));
        let stop = action_of(scan.on_alt_enter.as_ref().unwrap());
        assert_eq!(stop.kind, ActionKind::StopScan);
    }

    #[tokio::test]
    async fn test_settings_list_phrasing() {
        let gateway = FakeGateway::with_adapter();
        gateway.update(|state| {
            let adapter = state.adapter.as_mut().unwrap();
            adapter.discoverable = true;
            adapter.discoverable_timeout = 180;
            adapter.pairable = true;
            adapter.pairable_timeout = 0;
        });

        let items = router(&gateway).render("settings").await;
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Go back",
                "Reload settings",
                "Alias: \"test-adapter\"",
                "Adapter is temporarily discoverable",
                "Adapter is pairable",
            ]
        );
        // Temporarily discoverable: alt-enter makes it permanent.
        let permanent = action_of(items[3].on_alt_enter.as_ref().unwrap());
        assert_eq!(
            permanent.kind,
            ActionKind::ChangeDiscoverable {
                discoverable: true,
                timeout: None,
            }
        );
        // Permanently pairable: alt-enter opens the timeout entry.
        assert_eq!(
            items[4].on_alt_enter,
            Some(Binding::SetQuery("settings pairable ".to_string()))
        );
    }

    #[tokio::test]
    async fn test_settings_timeout_confirmation_carries_seconds() {
        let gateway = FakeGateway::with_adapter();
        let items = router(&gateway).render("settings discoverable 1h 30m").await;
        assert_eq!(items.len(), 2);
        let confirm = action_of(&items[0].on_enter);
        assert_eq!(
            confirm.kind,
            ActionKind::ChangeDiscoverable {
                discoverable: true,
                timeout: Some(5400),
            }
        );
        assert_eq!(items[1].title, "Cancel");
        assert_eq!(items[1].on_enter, Binding::SetQuery("settings".to_string()));
    }

    #[tokio::test]
    async fn test_settings_timeout_zero_is_invalid_without_action() {
        let gateway = FakeGateway::with_adapter();
        let items = router(&gateway).render("settings discoverable 0h").await;
        assert_eq!(
            items[0].title,
            "Invalid time (has to be at least 1 second)"
        );
        assert_eq!(items[0].on_enter, Binding::Nothing);
    }

    #[tokio::test]
    async fn test_settings_timeout_malformed_is_invalid_format() {
        let gateway = FakeGateway::with_adapter();
        let items = router(&gateway).render("settings pairable 1x").await;
        assert_eq!(items[0].title, "Invalid time format");
        assert_eq!(items[0].on_enter, Binding::Nothing);
    }

    #[tokio::test]
    async fn test_paired_connects_or_manages() {
        let gateway = FakeGateway::with_adapter();
        let mut offline = device_info(ADDR, "Offline");
        offline.paired = true;
        gateway.add_device(offline);
        let mut online = device_info("11:22:33:44:55:66", "Online");
        online.paired = true;
        online.connected = true;
        gateway.add_device(online);

        let items = router(&gateway).render("paired").await;
        assert_eq!(items[0].title, "Go back");

        let online_item = items.iter().find(|i| i.title == "Online").unwrap();
        assert_eq!(
            online_item.on_enter,
            Binding::SetQuery("device_p 11_22_33_44_55_66".to_string())
        );

        let offline_item = items.iter().find(|i| i.title == "Offline").unwrap();
        let connect = action_of(&offline_item.on_enter);
        assert_eq!(
            connect.kind,
            ActionKind::Connect {
                address: ADDR.to_string(),
                origin: Origin::FromPaired,
            }
        );
        assert_eq!(
            offline_item.on_alt_enter,
            Some(Binding::SetQuery("device_p AA_BB_CC_DD_EE_FF".to_string()))
        );
    }

    #[tokio::test]
    async fn test_scanned_sorts_named_before_nameless() {
        let gateway = FakeGateway::with_adapter();
        let mut nameless = device_info("11:22:33:44:55:66", "11-22-33-44-55-66");
        nameless.name = None;
        nameless.rssi = Some(-70);
        gateway.add_device(nameless);
        let mut named = device_info(ADDR, "Speaker");
        named.rssi = Some(-50);
        named.paired = true;
        gateway.add_device(named);

        let items = router(&gateway).render("scanned").await;
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Go back",
                "Reload scanned devices",
                "Speaker (Paired)",
                "11-22-33-44-55-66",
            ]
        );

        // Paired nearby device: enter and alt-enter both open the detail
        // view; connecting stays one step away in there.
        let paired_item = &items[2];
        assert_eq!(
            paired_item.on_enter,
            Binding::SetQuery("device AA_BB_CC_DD_EE_FF".to_string())
        );
        assert_eq!(
            paired_item.on_alt_enter,
            Some(Binding::SetQuery("device AA_BB_CC_DD_EE_FF".to_string()))
        );

        // Unpaired nearby device: enter pairs, no alt binding.
        let unpaired_item = &items[3];
        let pair = action_of(&unpaired_item.on_enter);
        assert_eq!(
            pair.kind,
            ActionKind::Pair {
                address: "11:22:33:44:55:66".to_string(),
            }
        );
        assert!(unpaired_item.on_alt_enter.is_none());
    }

    #[tokio::test]
    async fn test_device_detail_items() {
        let gateway = FakeGateway::with_adapter();
        let mut device = device_info(ADDR, "Headset");
        device.paired = true;
        device.connected = true;
        device.trusted = true;
        gateway.add_device(device);

        let items = router(&gateway)
            .render("device_p AA_BB_CC_DD_EE_FF")
            .await;
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Go back",
                "Reload information",
                "Device: Headset",
                "Connected: yes",
                "Alias: Headset",
                "Trusted: yes",
                "Blocked: no",
            ]
        );
        // Origin FromPaired: back goes to the paired list.
        assert_eq!(items[0].on_enter, Binding::SetQuery("paired".to_string()));
        let disconnect = action_of(&items[3].on_enter);
        assert_eq!(
            disconnect.kind,
            ActionKind::Disconnect {
                address: ADDR.to_string(),
                origin: Origin::FromPaired,
            }
        );
        assert_eq!(
            items[4].on_enter,
            Binding::SetQuery("device_p AA_BB_CC_DD_EE_FF alias ".to_string())
        );
        let untrust = action_of(&items[5].on_enter);
        assert_eq!(
            untrust.kind,
            ActionKind::ChangeDeviceTrusted {
                address: ADDR.to_string(),
                origin: Origin::FromPaired,
                trusted: false,
            }
        );
    }

    #[tokio::test]
    async fn test_device_detail_unknown_address_is_empty() {
        let gateway = FakeGateway::with_adapter();
        let items = router(&gateway).render("device AA_BB_CC_DD_EE_FF").await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_device_alias_cancel_returns_to_detail_with_origin() {
        let gateway = FakeGateway::with_adapter();
        let mut device = device_info(ADDR, "Headset");
        device.paired = true;
        gateway.add_device(device);

        let items = router(&gateway)
            .render("device_p AA_BB_CC_DD_EE_FF alias Kitchen")
            .await;
        assert_eq!(items.len(), 2);
        let change = action_of(&items[0].on_enter);
        assert_eq!(
            change.kind,
            ActionKind::ChangeDeviceAlias {
                address: ADDR.to_string(),
                origin: Origin::FromPaired,
                alias: "Kitchen".to_string(),
            }
        );
        assert_eq!(items[1].title, "Cancel");
        assert_eq!(
            items[1].on_enter,
            Binding::SetQuery("device_p AA_BB_CC_DD_EE_FF".to_string())
        );
    }

    #[tokio::test]
    async fn test_render_is_idempotent_for_unchanged_snapshot() {
        let gateway = FakeGateway::with_adapter();
        let mut device = device_info(ADDR, "Headset");
        device.paired = true;
        device.connected = true;
        gateway.add_device(device);

        let first = router(&gateway).render("").await;
        let second = router(&gateway).render("").await;
        assert_eq!(first, second);

        // Rendering must not have issued any mutator call.
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_render_is_unaffected_by_failing_mutators() {
        let gateway = FakeGateway::with_adapter();
        gateway.update(|state| state.fail_mutations = Some(GatewayError::Unavailable));
        let items = router(&gateway).render("settings").await;
        assert!(!items.is_empty());
    }
}
