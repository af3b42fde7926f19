use std::fmt::{self, Display};
use time::{
    OffsetDateTime, PrimitiveDateTime, Time as TimeOfDay, format_description::BorrowedFormatItem,
    macros::format_description,
};

/// Milliseconds in one calendar day; date subtraction divides by this.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

const NANOS_PER_MILLI: i128 = 1_000_000;
const MAX_SUB_MILLI_NANOS: u32 = 999_999;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const DATE_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const DATE_TIME_FRACTION_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]");
const DISPLAY_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]");

/// Parse `YYYY-MM-DD[ HH:MM:SS[.fraction]]` (UTC) into epoch nanoseconds.
fn parse_epoch_nanos(text: &str) -> Option<i128> {
    let text = text.trim();

    let date_time = if text.len() <= 10 {
        time::Date::parse(text, DATE_FORMAT)
            .ok()
            .map(|date| PrimitiveDateTime::new(date, TimeOfDay::MIDNIGHT))
    } else if text.contains('.') {
        PrimitiveDateTime::parse(text, DATE_TIME_FRACTION_FORMAT).ok()
    } else {
        PrimitiveDateTime::parse(text, DATE_TIME_FORMAT).ok()
    }?;

    Some(date_time.assume_utc().unix_timestamp_nanos())
}

fn split_nanos(nanos: i128) -> Option<(i64, u32)> {
    let millis = i64::try_from(nanos.div_euclid(NANOS_PER_MILLI)).ok()?;
    let sub = u32::try_from(nanos.rem_euclid(NANOS_PER_MILLI)).ok()?;

    Some((millis, sub))
}

fn fmt_millis(f: &mut fmt::Formatter<'_>, millis: i64) -> fmt::Result {
    let formatted = OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * NANOS_PER_MILLI)
        .ok()
        .and_then(|instant| instant.format(DISPLAY_FORMAT).ok());

    match formatted {
        Some(text) => f.write_str(&text),
        None => write!(f, "{millis}ms"),
    }
}

///
/// Date
///
/// Instant with millisecond precision, measured from the Unix epoch (UTC).
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Date(i64);

impl Date {
    pub const EPOCH: Self = Self(0);

    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    #[must_use]
    pub const fn millis(self) -> i64 {
        self.0
    }

    /// Parse an ISO `YYYY-MM-DD` (optionally with a time of day) string.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let (millis, _) = split_nanos(parse_epoch_nanos(text)?)?;

        Some(Self(millis))
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_millis(f, self.0)
    }
}

///
/// Time
///
/// Time-of-day instant; stored like `Date` as epoch milliseconds.
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Time(i64);

impl Time {
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    #[must_use]
    pub const fn millis(self) -> i64 {
        self.0
    }

    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        Date::parse(text).map(|date| Self(date.millis()))
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_millis(f, self.0)
    }
}

///
/// Timestamp
///
/// Epoch milliseconds plus the sub-millisecond nanosecond remainder.
/// Field order gives the natural ordering.
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Timestamp {
    millis: i64,
    nanos: u32,
}

impl Timestamp {
    /// Build a timestamp; `nanos` must be below one millisecond.
    #[must_use]
    pub const fn new(millis: i64, nanos: u32) -> Option<Self> {
        if nanos > MAX_SUB_MILLI_NANOS {
            return None;
        }

        Some(Self { millis, nanos })
    }

    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self { millis, nanos: 0 }
    }

    #[must_use]
    pub const fn millis(self) -> i64 {
        self.millis
    }

    #[must_use]
    pub const fn nanos(self) -> u32 {
        self.nanos
    }

    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let (millis, nanos) = split_nanos(parse_epoch_nanos(text)?)?;

        Some(Self { millis, nanos })
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_millis(f, self.millis)?;
        if self.nanos > 0 {
            write!(f, "{:06}", self.nanos)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_parse_accepts_plain_and_timed_forms() {
        assert_eq!(Date::parse("1970-01-02"), Some(Date::from_millis(MILLIS_PER_DAY)));
        assert_eq!(
            Date::parse("1970-01-01 00:00:01"),
            Some(Date::from_millis(1_000))
        );
        assert_eq!(Date::parse("1969-12-31"), Some(Date::from_millis(-MILLIS_PER_DAY)));
        assert_eq!(Date::parse("not a date"), None);
    }

    #[test]
    fn timestamp_parse_keeps_sub_millisecond_nanos() {
        let ts = Timestamp::parse("1970-01-01 00:00:00.001000500").expect("timestamp parses");
        assert_eq!(ts.millis(), 1);
        assert_eq!(ts.nanos(), 500);
    }

    #[test]
    fn timestamp_rejects_out_of_range_nanos() {
        assert!(Timestamp::new(0, 1_000_000).is_none());
        assert!(Timestamp::new(0, 999_999).is_some());
    }

    #[test]
    fn display_uses_iso_layout() {
        assert_eq!(Date::from_millis(0).to_string(), "1970-01-01 00:00:00.000");
        assert_eq!(
            Timestamp::new(1, 5).expect("valid").to_string(),
            "1970-01-01 00:00:00.001000005"
        );
    }
}
