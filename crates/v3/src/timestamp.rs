//! The 18-byte host timestamp.

use nubridge_codec::byte_checksum;
use tracing::warn;

/// Timestamp in the `MM-DD-YYYYHH:MM:SS` form the general-state section
/// embeds, derived from the snapshot's host start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp(String);

/// Value used when the host start time cannot be parsed.
const FALLBACK: &str = "00-00-000000:00:00";

impl Timestamp {
    /// Width of the encoded field.
    pub const LEN: usize = 18;

    /// Derive the timestamp from a host start time such as
    /// `8/21/2026 9:12:30 PM`.
    pub fn from_host_start(host_start: &str) -> Self {
        match parse_host_start(host_start) {
            Some(formatted) => Self(formatted),
            None => {
                warn!(host_start, "unparseable host start time, using zero timestamp");
                Self(FALLBACK.to_string())
            }
        }
    }

    /// Wrap an already-formatted 18-byte timestamp (from a decoded file).
    pub fn from_raw(raw: &str) -> Self {
        if raw.len() == Self::LEN {
            Self(raw.to_string())
        } else {
            Self(format!("{raw:<18.18}"))
        }
    }

    /// The printable form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Additive byte sum of the printable form.
    pub fn checksum(&self) -> u16 {
        byte_checksum(self.0.as_bytes()) as u16
    }
}

fn parse_host_start(host_start: &str) -> Option<String> {
    let mut parts = host_start.split_whitespace();
    let date = parts.next()?;
    let time = parts.next()?;
    let meridiem = parts.next();

    let mut date_parts = date.split('/');
    let month: u32 = date_parts.next()?.parse().ok()?;
    let day: u32 = date_parts.next()?.parse().ok()?;
    let year: u32 = date_parts.next()?.parse().ok()?;

    let mut time_parts = time.split(':');
    let mut hour: u32 = time_parts.next()?.parse().ok()?;
    let minute: u32 = time_parts.next()?.parse().ok()?;
    let second: u32 = time_parts.next().unwrap_or("0").parse().ok()?;

    match meridiem {
        Some("PM") if hour != 12 => hour += 12,
        Some("AM") if hour == 12 => hour = 0,
        _ => {}
    }

    if month > 12 || day > 31 || hour > 23 || minute > 59 || second > 59 {
        return None;
    }

    Some(format!(
        "{month:02}-{day:02}-{year:04}{hour:02}:{minute:02}:{second:02}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_host_start() {
        let ts = Timestamp::from_host_start("8/21/2026 9:12:30 PM");
        assert_eq!(ts.as_str(), "08-21-202621:12:30");
        assert_eq!(ts.as_str().len(), Timestamp::LEN);
    }

    #[test]
    fn handles_noon_and_midnight() {
        assert_eq!(
            Timestamp::from_host_start("1/2/2026 12:00:00 AM").as_str(),
            "01-02-202600:00:00"
        );
        assert_eq!(
            Timestamp::from_host_start("1/2/2026 12:30:00 PM").as_str(),
            "01-02-202612:30:00"
        );
    }

    #[test]
    fn garbage_falls_back_to_zero() {
        let ts = Timestamp::from_host_start("whenever");
        assert_eq!(ts.as_str(), FALLBACK);
        assert_eq!(ts.as_str().len(), Timestamp::LEN);
    }

    #[test]
    fn checksum_is_byte_sum() {
        let ts = Timestamp::from_raw("08-21-202621:12:30");
        let expected: u32 = ts.as_str().bytes().map(u32::from).sum();
        assert_eq!(u32::from(ts.checksum()), expected);
    }
}
