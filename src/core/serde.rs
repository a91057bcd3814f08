/*!
 * Serde Helpers
 * `skip_serializing_if` predicate and size parsing
 */

use super::types::{Size, KIB, MIB};

/// Skip serializing if Option is None
pub fn is_none<T>(value: &Option<T>) -> bool {
    value.is_none()
}

/// Parse a size such as `1048576`, `512KiB`, `1.5MiB` into bytes
///
/// Returns `None` for anything that is not a positive, finite amount
/// that resolves to at least one byte.
pub fn parse_size(input: &str) -> Option<Size> {
    let input = input.trim();
    let (number, unit) = match input.find(|c: char| c.is_ascii_alphabetic()) {
        Some(idx) => input.split_at(idx),
        None => (input, ""),
    };

    let multiplier = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" | "kib" => KIB,
        "m" | "mb" | "mib" => MIB,
        _ => return None,
    };

    let value: f64 = number.trim().parse().ok()?;
    if !value.is_finite() || value <= 0.0 {
        return None;
    }

    let bytes = (value * multiplier as f64).round();
    if bytes < 1.0 || bytes > Size::MAX as f64 {
        return None;
    }
    Some(bytes as Size)
}
