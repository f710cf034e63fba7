//! Navigation state encoded in the query argument string.
//!
//! The host keeps no state between invocations: the whole position in the
//! menu tree lives in the space-tokenized argument of the query. This module
//! decodes that string into [`NavState`] at the boundary and re-encodes it
//! when producing a redirect, so the router and executor only ever work on
//! the typed form.
//!
//! Device addresses use `:` externally and `_` inside query tokens;
//! [`encode_address`]/[`decode_address`] convert between the two forms.

/// How a device detail view was reached, encoded in the branch token
/// (`device` vs `device_p`). Decides the "go back" target on every redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Direct,
    FromPaired,
}

impl Origin {
    pub fn from_paired(from_paired: bool) -> Self {
        if from_paired {
            Self::FromPaired
        } else {
            Self::Direct
        }
    }

    /// Branch token selecting the device detail view with this origin.
    pub fn branch(&self) -> &'static str {
        match self {
            Self::Direct => "device",
            Self::FromPaired => "device_p",
        }
    }

    /// Argument of the list view this origin goes back to.
    pub fn back_argument(&self) -> &'static str {
        match self {
            Self::Direct => "",
            Self::FromPaired => "paired",
        }
    }
}

/// Adapter setting addressed by a `settings <field>` sub-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Alias,
    Discoverable,
    Pairable,
}

impl SettingsField {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "alias" => Some(Self::Alias),
            "discoverable" => Some(Self::Discoverable),
            "pairable" => Some(Self::Pairable),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::Alias => "alias",
            Self::Discoverable => "discoverable",
            Self::Pairable => "pairable",
        }
    }
}

/// Typed navigation state, derived purely from the argument string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavState {
    Home,
    Settings,
    AdapterField {
        field: SettingsField,
        /// Pending user input; `None` while still awaiting a value.
        value: Option<String>,
    },
    Paired,
    Scanned,
    Device {
        address: String,
        origin: Origin,
    },
    DeviceAlias {
        address: String,
        origin: Origin,
        value: Option<String>,
    },
}

impl NavState {
    /// Decode an argument string. An unknown or malformed branch yields
    /// `None`, which the router renders as an empty list.
    pub fn parse(argument: &str) -> Option<Self> {
        let tokens: Vec<&str> = argument.split_whitespace().collect();
        let Some(&branch) = tokens.first() else {
            return Some(Self::Home);
        };

        match branch {
            "settings" => match tokens.get(1) {
                None => Some(Self::Settings),
                Some(token) => {
                    let field = SettingsField::parse(token)?;
                    Some(Self::AdapterField {
                        field,
                        value: join_rest(&tokens, 2),
                    })
                }
            },
            "paired" => Some(Self::Paired),
            "scanned" => Some(Self::Scanned),
            "device" | "device_p" => {
                let origin = Origin::from_paired(branch == "device_p");
                let address = decode_address(tokens.get(1)?);
                match tokens.get(2) {
                    None => Some(Self::Device { address, origin }),
                    Some(&"alias") => Some(Self::DeviceAlias {
                        address,
                        origin,
                        value: join_rest(&tokens, 3),
                    }),
                    Some(_) => None,
                }
            }
            _ => None,
        }
    }

    /// Inverse of [`NavState::parse`] for all reachable states.
    pub fn encode(&self) -> String {
        match self {
            Self::Home => String::new(),
            Self::Settings => "settings".to_string(),
            Self::AdapterField { field, value } => match value {
                None => format!("settings {}", field.token()),
                Some(value) => format!("settings {} {}", field.token(), value),
            },
            Self::Paired => "paired".to_string(),
            Self::Scanned => "scanned".to_string(),
            Self::Device { address, origin } => {
                format!("{} {}", origin.branch(), encode_address(address))
            }
            Self::DeviceAlias {
                address,
                origin,
                value,
            } => {
                let base = format!("{} {} alias", origin.branch(), encode_address(address));
                match value {
                    None => base,
                    Some(value) => format!("{base} {value}"),
                }
            }
        }
    }
}

fn join_rest(tokens: &[&str], from: usize) -> Option<String> {
    if tokens.len() > from {
        Some(tokens[from..].join(" "))
    } else {
        None
    }
}

/// Colon form to token-safe underscore form.
pub fn encode_address(address: &str) -> String {
    address.replace(':', "_")
}

/// Token-safe underscore form back to colon form.
pub fn decode_address(token: &str) -> String {
    token.replace('_', ":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_argument_is_home() {
        assert_eq!(NavState::parse(""), Some(NavState::Home));
        assert_eq!(NavState::parse("   "), Some(NavState::Home));
    }

    #[test]
    fn test_unknown_branch_is_none() {
        assert_eq!(NavState::parse("bogus"), None);
        assert_eq!(NavState::parse("settings bogus"), None);
        assert_eq!(NavState::parse("device"), None);
        assert_eq!(NavState::parse("device_p"), None);
        assert_eq!(NavState::parse("device AA_BB_CC_DD_EE_FF trusted"), None);
    }

    #[test]
    fn test_settings_field_with_value() {
        assert_eq!(
            NavState::parse("settings discoverable 1h 30m"),
            Some(NavState::AdapterField {
                field: SettingsField::Discoverable,
                value: Some("1h 30m".to_string()),
            })
        );
        // Trailing space means the user is still typing: no value yet.
        assert_eq!(
            NavState::parse("settings alias "),
            Some(NavState::AdapterField {
                field: SettingsField::Alias,
                value: None,
            })
        );
    }

    #[test]
    fn test_device_branch_carries_origin() {
        assert_eq!(
            NavState::parse("device_p AA_BB_CC_DD_EE_FF"),
            Some(NavState::Device {
                address: "AA:BB:CC:DD:EE:FF".to_string(),
                origin: Origin::FromPaired,
            })
        );
        assert_eq!(
            NavState::parse("device AA_BB_CC_DD_EE_FF alias My Headset"),
            Some(NavState::DeviceAlias {
                address: "AA:BB:CC:DD:EE:FF".to_string(),
                origin: Origin::Direct,
                value: Some("My Headset".to_string()),
            })
        );
    }

    #[test]
    fn test_round_trip_all_reachable_states() {
        let states = [
            NavState::Home,
            NavState::Settings,
            NavState::AdapterField {
                field: SettingsField::Alias,
                value: None,
            },
            NavState::AdapterField {
                field: SettingsField::Discoverable,
                value: Some("1h 30m".to_string()),
            },
            NavState::AdapterField {
                field: SettingsField::Pairable,
                value: Some("45s".to_string()),
            },
            NavState::Paired,
            NavState::Scanned,
            NavState::Device {
                address: "AA:BB:CC:DD:EE:FF".to_string(),
                origin: Origin::Direct,
            },
            NavState::Device {
                address: "AA:BB:CC:DD:EE:FF".to_string(),
                origin: Origin::FromPaired,
            },
            NavState::DeviceAlias {
                address: "AA:BB:CC:DD:EE:FF".to_string(),
                origin: Origin::FromPaired,
                value: Some("Kitchen Speaker".to_string()),
            },
        ];
        for state in states {
            assert_eq!(NavState::parse(&state.encode()), Some(state));
        }
    }

    #[test]
    fn test_address_codec_is_a_bijection() {
        let address = "AA:BB:CC:DD:EE:FF";
        let token = "AA_BB_CC_DD_EE_FF";
        assert_eq!(encode_address(address), token);
        assert_eq!(decode_address(token), address);
        assert_eq!(decode_address(&encode_address(address)), address);
        assert_eq!(encode_address(&decode_address(token)), token);
    }
}
