//! Compact duration token parsing for catalog metadata.

/// Parse an ISO-8601-style duration token (`PT1H2M3S`, `PT45S`, ...) into
/// total seconds. Any of the hour/minute/second designators may be absent;
/// absent designators count as zero. Returns `None` when the token does not
/// start with `PT` or contains anything other than the expected designators.
pub fn parse_duration(code: &str) -> Option<u64> {
    let rest = code.strip_prefix("PT")?;

    let mut hours: u64 = 0;
    let mut minutes: u64 = 0;
    let mut seconds: u64 = 0;
    let mut number = String::new();

    for ch in rest.chars() {
        if ch.is_ascii_digit() {
            number.push(ch);
            continue;
        }
        let value: u64 = number.parse().ok()?;
        number.clear();
        match ch {
            'H' => hours = value,
            'M' => minutes = value,
            'S' => seconds = value,
            _ => return None,
        }
    }

    // Trailing digits without a designator make the token malformed.
    if !number.is_empty() {
        return None;
    }

    Some(hours * 3600 + minutes * 60 + seconds)
}

/// Round a duration in seconds to whole minutes for display in plans.
pub fn seconds_to_minutes(seconds: u64) -> u64 {
    (seconds as f64 / 60.0).round() as u64
}
