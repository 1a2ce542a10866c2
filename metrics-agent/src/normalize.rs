//! Normalization of human-suffixed size values into byte counts.

const KIB: i64 = 1024;

/// Convert a size value as reported by the control utility into bytes.
///
/// Accepts a leading numeric portion with an optional `KB`/`MB`/`GB`
/// suffix (powers of 1024, case-insensitive). No suffix means the value
/// is already raw bytes; an unknown suffix is treated as raw numeric
/// with no multiplier. Fractional inputs truncate toward zero after
/// multiplication, and anything unparseable yields 0 — malformed
/// telemetry must never abort a run.
pub fn normalize_bytes(raw: &str) -> i64 {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(raw.len());
    let (number, suffix) = raw.split_at(split);

    let Ok(value) = number.parse::<f64>() else {
        return 0;
    };

    let multiplier = match suffix.trim().to_ascii_uppercase().as_str() {
        "KB" => KIB,
        "MB" => KIB * KIB,
        "GB" => KIB * KIB * KIB,
        _ => 1,
    };

    // `as` truncates toward zero, which is the wanted rounding.
    (value * multiplier as f64) as i64
}
