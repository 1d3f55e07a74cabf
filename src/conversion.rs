use crate::constants::{Degree, DEG_PER_HOUR};

/// Split a sexagesimal string (`HH MM SS.ss`, `HH:MM:SS.ss`) into its three components.
fn sexagesimal_parts(value: &str) -> Option<[&str; 3]> {
    let parts: Vec<&str> = value
        .split(|c: char| c.is_whitespace() || c == ':')
        .filter(|p| !p.is_empty())
        .collect();
    match parts.as_slice() {
        [a, b, c] => Some([a, b, c]),
        _ => None,
    }
}

/// Parse a right ascension string to degrees
///
/// Arguments
/// ---------
/// * `ra`: a right ascension in the format `HH MM SS.SS` (or colon separated)
///
/// Returns
/// -------
/// * `Option<Degree>`: the right ascension in degrees, `None` if the input format is invalid
pub fn parse_ra_to_deg(ra: &str) -> Option<Degree> {
    let [h, m, s] = sexagesimal_parts(ra)?;

    let h: f64 = h.parse().ok()?;
    let m: f64 = m.parse().ok()?;
    let s: f64 = s.parse().ok()?;

    Some((h + m / 60.0 + s / 3600.0) * DEG_PER_HOUR)
}

/// Parse a declination string to degrees
///
/// Arguments
/// ---------
/// * `dec`: a declination in the format `±DD MM SS.SS` (or colon separated)
///
/// Returns
/// -------
/// * `Option<Degree>`: the declination in degrees, `None` if the input format is invalid
pub fn parse_dec_to_deg(dec: &str) -> Option<Degree> {
    let [d, m, s] = sexagesimal_parts(dec)?;

    let sign = if d.starts_with('-') { -1.0 } else { 1.0 };
    let d: f64 = d.trim_start_matches(&['-', '+'][..]).parse().ok()?;
    let m: f64 = m.parse().ok()?;
    let s: f64 = s.parse().ok()?;

    Some(sign * (d + m / 60.0 + s / 3600.0))
}

/// Parse a right ascension given either in decimal degrees or sexagesimal hours.
pub fn parse_ra(value: &str) -> Option<Degree> {
    let value = value.trim();
    value.parse::<f64>().ok().or_else(|| parse_ra_to_deg(value))
}

/// Parse a declination given either in decimal degrees or sexagesimal degrees.
pub fn parse_dec(value: &str) -> Option<Degree> {
    let value = value.trim();
    value.parse::<f64>().ok().or_else(|| parse_dec_to_deg(value))
}
