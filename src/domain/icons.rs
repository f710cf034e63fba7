//! Icon selection for list items. Pure lookup, no state.
//!
//! Device icons combine the BlueZ icon class stem with a status suffix:
//! `2` connected, `1` paired, `0` otherwise. Unknown classes fall back to
//! the default icon of the matching status.

use crate::domain::models::DeviceInfo;

/// Generic extension icon, used for non-device entries.
pub const GENERIC: &str = "images/icon.png";

/// Back/cancel arrow.
pub const BACK: &str = "images/back.png";

/// Icon class stems shipped with the extension images.
const SHIPPED_STEMS: &[&str] = &["audio", "computer", "input", "network", "phone", "video"];

pub fn device_icon(device: &DeviceInfo) -> String {
    let status = if device.connected {
        '2'
    } else if device.paired {
        '1'
    } else {
        '0'
    };

    let stem = device
        .icon
        .as_deref()
        .map(|icon| icon.split('-').next().unwrap_or(icon))
        .filter(|stem| SHIPPED_STEMS.contains(stem));

    match stem {
        Some(stem) => format!("images/{stem}_{status}.png"),
        None => format!("images/default_{status}.png"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(icon: Option<&str>, paired: bool, connected: bool) -> DeviceInfo {
        DeviceInfo {
            address: "AA:BB:CC:DD:EE:FF".to_string(),
            alias: "Test".to_string(),
            name: None,
            icon: icon.map(str::to_string),
            paired,
            connected,
            trusted: false,
            blocked: false,
            rssi: None,
        }
    }

    #[test]
    fn test_status_suffix() {
        assert_eq!(
            device_icon(&device(Some("audio-headset"), true, true)),
            "images/audio_2.png"
        );
        assert_eq!(
            device_icon(&device(Some("audio-headset"), true, false)),
            "images/audio_1.png"
        );
        assert_eq!(
            device_icon(&device(Some("audio-headset"), false, false)),
            "images/audio_0.png"
        );
    }

    #[test]
    fn test_unknown_class_falls_back_to_default() {
        assert_eq!(
            device_icon(&device(Some("scanner"), false, true)),
            "images/default_2.png"
        );
        assert_eq!(device_icon(&device(None, true, false)), "images/default_1.png");
    }

    #[test]
    fn test_stem_without_dash() {
        assert_eq!(
            device_icon(&device(Some("phone"), false, false)),
            "images/phone_0.png"
        );
    }
}
