//! Human time strings.
//!
//! Timeout inputs like `1h 30m` are parsed into seconds and formatted back
//! for confirmation items. Units are days, hours, minutes and seconds.

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * 60;
const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Parse a space-separated list of `<integer><d|h|m|s>` tokens into a total
/// number of seconds. Any token that does not match fails the whole input.
pub fn parse_duration(text: &str) -> Option<u64> {
    let mut seconds = 0u64;
    for token in text.split(' ') {
        let (number, unit) = token.split_at(token.len().checked_sub(1)?);
        let number: u64 = number.parse().ok()?;
        let factor = match unit {
            "d" => SECS_PER_DAY,
            "h" => SECS_PER_HOUR,
            "m" => SECS_PER_MINUTE,
            "s" => 1,
            _ => return None,
        };
        seconds = seconds.checked_add(number.checked_mul(factor)?)?;
    }
    Some(seconds)
}

/// Format seconds as the shortest `d h m s` string, omitting zero
/// components. Zero formats as `"0s"`.
pub fn format_duration(seconds: u64) -> String {
    let days = seconds / SECS_PER_DAY;
    let hours = seconds % SECS_PER_DAY / SECS_PER_HOUR;
    let minutes = seconds % SECS_PER_HOUR / SECS_PER_MINUTE;
    let seconds = seconds % SECS_PER_MINUTE;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{seconds}s"));
    }
    parts.join(" ")
}
