use hifitime::Epoch;
use std::str::FromStr;

use crate::constants::{Radian, DPI, T2000};
use crate::gem_errors::GemError;

/// Bring the loose date/time strings typed in the observation form to a shape
/// hifitime understands: a bare date gets midnight, a space separator becomes `T`
/// and a time without seconds gets `:00`.
fn normalize_iso(value: &str) -> String {
    let trimmed = value.trim();
    let mut normalized = if trimmed.len() == 10 {
        format!("{trimmed}T00:00:00")
    } else {
        trimmed.to_string()
    };
    if normalized.as_bytes().get(10) == Some(&b' ') {
        normalized.replace_range(10..11, "T");
    }
    if normalized.len() == 16 {
        normalized.push_str(":00");
    }
    normalized
}

/// Parse a UTC date/time string into an [`Epoch`]
///
/// Argument
/// --------
/// * `value`: a date (`YYYY-MM-DD`) or date/time (`YYYY-MM-DDTHH:MM[:SS[.fff]]`, `T` or space separated)
///
/// Return
/// ------
/// * the epoch, or [`GemError::InvalidDateTime`] if the string cannot be parsed
pub fn parse_epoch(value: &str) -> Result<Epoch, GemError> {
    let normalized = normalize_iso(value);
    Epoch::from_str(&normalized)
        .map_err(|e| GemError::InvalidDateTime(format!("{}: {e}", value.trim())))
}

/// Split a date/time string into its ISO 8601 date and time-of-day parts
///
/// The time part carries microseconds only when they are not zero.
///
/// Argument
/// --------
/// * `value`: a date/time string accepted by [`parse_epoch`]
///
/// Return
/// ------
/// * `(date, time)`, e.g. `("2024-06-01", "10:00:00")`
pub fn iso_date_time(value: &str) -> Result<(String, String), GemError> {
    let epoch = parse_epoch(value)?;
    let (year, month, day, hour, minute, second, nanos) = epoch.to_gregorian_utc();

    let date = format!("{year:04}-{month:02}-{day:02}");
    let time = if nanos == 0 {
        format!("{hour:02}:{minute:02}:{second:02}")
    } else {
        format!("{hour:02}:{minute:02}:{second:02}.{:06}", nanos / 1_000)
    };
    Ok((date, time))
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date.
///
/// Uses the IAU 1982 polynomial for the mean sidereal time at 0h UT1 plus the
/// fractional-day term due to Earth's rotation. UTC is accepted in place of UT1;
/// the difference (< 0.9 s) is irrelevant for position-angle planning.
///
/// # Arguments
/// * `tjm` - Modified Julian Date
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
pub fn gmst(tjm: f64) -> Radian {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    let itjm = tjm.floor();
    let t = (itjm - T2000) / 36525.0;

    let mut gmst0 = ((C3 * t + C2) * t + C1) * t + C0;
    gmst0 *= DPI / 86400.0;

    let h = tjm.fract() * DPI;
    let gmst = gmst0 + h * RAP;

    gmst.rem_euclid(DPI)
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_iso_date_time() {
        assert_eq!(
            iso_date_time("2024-06-01T10:00:00").unwrap(),
            ("2024-06-01".to_string(), "10:00:00".to_string())
        );
        assert_eq!(
            iso_date_time("  2021-03-14 23:59:01 ").unwrap(),
            ("2021-03-14".to_string(), "23:59:01".to_string())
        );
    }

    #[test]
    fn test_iso_date_only_and_short_time() {
        assert_eq!(
            iso_date_time("2024-06-01").unwrap(),
            ("2024-06-01".to_string(), "00:00:00".to_string())
        );
        assert_eq!(
            iso_date_time("2024-06-01T22:15").unwrap(),
            ("2024-06-01".to_string(), "22:15:00".to_string())
        );
    }

    #[test]
    fn test_iso_date_time_rejects_garbage() {
        assert!(matches!(
            iso_date_time("next tuesday"),
            Err(GemError::InvalidDateTime(_))
        ));
        assert!(iso_date_time("").is_err());
    }

    #[test]
    fn test_parse_epoch_mjd() {
        let epoch = parse_epoch("2021-01-01T00:00:00").unwrap();
        assert_eq!(epoch.to_mjd_utc_days(), 59215.0);
    }

    #[test]
    fn test_gmst() {
        let tut = 57028.478514610404;
        assert_relative_eq!(gmst(tut), 4.851925725092499, epsilon = 1e-12);

        assert_relative_eq!(gmst(T2000), 4.894961212789145, epsilon = 1e-12);
    }
}
