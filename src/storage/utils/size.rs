const UNITS: &[&str] = &["B", "K", "M", "G", "T"];
const THRESHOLD: u64 = 1024;

/// Format file size in human-readable format, using 1024 base and units B,K,M,G,T.
pub fn format_size(size: u64) -> String {
    if size < THRESHOLD {
        return format!("{size}B");
    }
    let mut size_f = size as f64;
    let mut unit_index = 0;
    while size_f >= THRESHOLD as f64 && unit_index < UNITS.len() - 1 {
        size_f /= THRESHOLD as f64;
        unit_index += 1;
    }
    format!("{size_f:.1}{}", UNITS[unit_index])
}

/// Parse a byte size such as `8388608`, `512K`, `32M`, `32MiB` or `1G`.
/// Units are 1024-based and case-insensitive.
pub fn parse_size(input: &str) -> Option<u64> {
    let input = input.trim();
    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (digits, unit) = input.split_at(split);
    let value: u64 = digits.parse().ok()?;

    let unit = unit.trim().to_ascii_uppercase();
    let unit = unit
        .strip_suffix("IB")
        .or_else(|| unit.strip_suffix('B').filter(|u| !u.is_empty()))
        .unwrap_or(&unit);
    let exponent = match unit {
        "" | "B" => 0,
        "K" => 1,
        "M" => 2,
        "G" => 3,
        "T" => 4,
        _ => return None,
    };
    value.checked_mul(THRESHOLD.pow(exponent))
}
