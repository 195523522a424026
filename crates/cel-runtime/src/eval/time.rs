//! Timestamp and duration parsing, formatting, and calendar access.

use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use super::error::EvalError;
use super::value::{Duration, Timestamp};

/// A resolved timezone for calendar-component extraction.
#[derive(Debug, Clone, Copy)]
pub enum TimezoneInfo {
    Utc,
    Named(Tz),
    Fixed(FixedOffset),
}

/// Parse a timezone string.
///
/// Accepts IANA names ("America/New_York"), "UTC", and fixed offsets of the
/// form "(+|-)HH:MM".
pub fn parse_timezone(tz: &str) -> Result<TimezoneInfo, EvalError> {
    if tz.is_empty() || tz == "UTC" || tz == "Z" {
        return Ok(TimezoneInfo::Utc);
    }
    if let Ok(named) = tz.parse::<Tz>() {
        return Ok(TimezoneInfo::Named(named));
    }
    if let Some(offset) = parse_fixed_offset(tz) {
        return Ok(TimezoneInfo::Fixed(offset));
    }
    Err(EvalError::invalid_argument(format!(
        "invalid timezone: {}",
        tz
    )))
}

fn parse_fixed_offset(tz: &str) -> Option<FixedOffset> {
    let (sign, rest) = match tz.as_bytes().first()? {
        b'+' => (1, &tz[1..]),
        b'-' => (-1, &tz[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 18 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

// ==================== Timestamps ====================

/// Parse an RFC 3339 timestamp string.
pub fn parse_timestamp(s: &str) -> Result<Timestamp, EvalError> {
    let dt = DateTime::parse_from_rfc3339(s)
        .map_err(|e| EvalError::invalid_argument(format!("invalid timestamp: {}", e)))?;
    let ts = Timestamp::new(dt.timestamp(), dt.timestamp_subsec_nanos() as i32);
    if !ts.is_valid() {
        return Err(EvalError::timestamp_overflow());
    }
    Ok(ts)
}

/// Format a timestamp as an RFC 3339 string in UTC.
///
/// Sub-second digits are emitted in groups of three, trailing zero groups
/// dropped.
pub fn format_timestamp(ts: &Timestamp) -> String {
    match to_datetime_utc(ts) {
        Some(dt) => dt.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true),
        None => format!("<invalid timestamp {}s>", ts.seconds),
    }
}

/// Convert a timestamp to a chrono `DateTime<Utc>`.
pub fn to_datetime_utc(ts: &Timestamp) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(ts.seconds, ts.nanos as u32).single()
}

// ==================== Durations ====================

/// Parse a duration string such as "1h30m", "2.5s", "-300ms".
///
/// Units: h, m, s, ms, us, ns. A leading sign applies to the whole value.
pub fn parse_duration(s: &str) -> Result<Duration, EvalError> {
    let invalid = || EvalError::invalid_argument(format!("invalid duration: {}", s));

    let mut rest = s;
    let mut negative = false;
    match rest.as_bytes().first() {
        Some(b'-') => {
            negative = true;
            rest = &rest[1..];
        }
        Some(b'+') => rest = &rest[1..],
        _ => {}
    }
    if rest.is_empty() {
        return Err(invalid());
    }
    // "0" is the one unit-less form allowed.
    if rest == "0" {
        return Ok(Duration::new(0, 0));
    }

    let mut total_nanos: i128 = 0;
    while !rest.is_empty() {
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .ok_or_else(invalid)?;
        if digits_end == 0 {
            return Err(invalid());
        }
        let number: f64 = rest[..digits_end].parse().map_err(|_| invalid())?;
        rest = &rest[digits_end..];

        let (unit_nanos, unit_len) = if rest.starts_with("ns") {
            (1i128, 2)
        } else if rest.starts_with("us") || rest.starts_with("µs") {
            (1_000, if rest.starts_with("µs") { 3 } else { 2 })
        } else if rest.starts_with("ms") {
            (1_000_000, 2)
        } else if rest.starts_with('s') {
            (1_000_000_000, 1)
        } else if rest.starts_with('m') {
            (60 * 1_000_000_000, 1)
        } else if rest.starts_with('h') {
            (3600 * 1_000_000_000, 1)
        } else {
            return Err(invalid());
        };
        rest = &rest[unit_len..];
        total_nanos += (number * unit_nanos as f64).round() as i128;
    }

    if negative {
        total_nanos = -total_nanos;
    }
    let seconds = total_nanos / 1_000_000_000;
    let nanos = (total_nanos % 1_000_000_000) as i32;
    let d = Duration::new(seconds as i64, nanos);
    if seconds.unsigned_abs() > super::value::MAX_DURATION_SECONDS as u128 {
        return Err(EvalError::duration_overflow());
    }
    Ok(d)
}

/// Format a duration as a seconds string, e.g. "3600s", "1.5s", "-0.000001s".
pub fn format_duration(d: &Duration) -> String {
    let total = d.to_nanos();
    let sign = if total < 0 { "-" } else { "" };
    let abs = total.unsigned_abs();
    let seconds = abs / 1_000_000_000;
    let nanos = (abs % 1_000_000_000) as u32;
    if nanos == 0 {
        return format!("{}{}s", sign, seconds);
    }
    let mut frac = format!("{:09}", nanos);
    while frac.ends_with('0') {
        frac.pop();
    }
    format!("{}{}.{}s", sign, seconds, frac)
}

// ==================== Calendar components ====================

/// A calendar field extractable from a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampComponent {
    /// Calendar year.
    Year,
    /// Month, zero-based (January is 0).
    Month,
    /// Day of month, one-based.
    Date,
    /// Day of month, zero-based.
    DayOfMonth,
    /// Day of year, zero-based.
    DayOfYear,
    /// Day of week, zero-based from Sunday.
    DayOfWeek,
    /// Hour of day (0..23).
    Hours,
    /// Minute of hour.
    Minutes,
    /// Second of minute.
    Seconds,
    /// Millisecond of second.
    Milliseconds,
}

/// Extract a calendar component of a timestamp in the given timezone.
pub fn timestamp_component(
    ts: &Timestamp,
    component: TimestampComponent,
    tz: &TimezoneInfo,
) -> Result<i64, EvalError> {
    let utc = to_datetime_utc(ts).ok_or_else(EvalError::timestamp_overflow)?;
    let local: DateTime<FixedOffset> = match tz {
        TimezoneInfo::Utc => utc.fixed_offset(),
        TimezoneInfo::Named(named) => utc.with_timezone(named).fixed_offset(),
        TimezoneInfo::Fixed(offset) => utc.with_timezone(offset),
    };
    let value = match component {
        TimestampComponent::Year => local.year() as i64,
        TimestampComponent::Month => local.month0() as i64,
        TimestampComponent::Date => local.day() as i64,
        TimestampComponent::DayOfMonth => local.day0() as i64,
        TimestampComponent::DayOfYear => local.ordinal0() as i64,
        TimestampComponent::DayOfWeek => local.weekday().num_days_from_sunday() as i64,
        TimestampComponent::Hours => local.hour() as i64,
        TimestampComponent::Minutes => local.minute() as i64,
        TimestampComponent::Seconds => local.second() as i64,
        TimestampComponent::Milliseconds => (local.nanosecond() / 1_000_000) as i64,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("1970-01-01T00:00:00Z").unwrap();
        assert_eq!(ts, Timestamp::new(0, 0));

        let ts = parse_timestamp("2023-06-15T10:30:00.5Z").unwrap();
        assert_eq!(ts.nanos, 500_000_000);

        let ts = parse_timestamp("2023-06-15T10:30:00+02:00").unwrap();
        let utc = parse_timestamp("2023-06-15T08:30:00Z").unwrap();
        assert_eq!(ts, utc);

        assert!(parse_timestamp("not a timestamp").is_err());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp(&Timestamp::new(0, 0)),
            "1970-01-01T00:00:00Z"
        );
        assert_eq!(
            format_timestamp(&Timestamp::new(0, 500_000_000)),
            "1970-01-01T00:00:00.500Z"
        );
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("1s").unwrap(), Duration::new(1, 0));
        assert_eq!(parse_duration("1h").unwrap(), Duration::new(3600, 0));
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::new(5400, 0));
        assert_eq!(
            parse_duration("1.5s").unwrap(),
            Duration::new(1, 500_000_000)
        );
        assert_eq!(
            parse_duration("-300ms").unwrap(),
            Duration::new(0, -300_000_000)
        );
        assert_eq!(parse_duration("250us").unwrap(), Duration::new(0, 250_000));
        assert_eq!(parse_duration("7ns").unwrap(), Duration::new(0, 7));
        assert_eq!(parse_duration("0").unwrap(), Duration::new(0, 0));

        assert!(parse_duration("").is_err());
        assert!(parse_duration("5").is_err());
        assert!(parse_duration("5d").is_err());
        assert!(parse_duration("abc").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(&Duration::new(3600, 0)), "3600s");
        assert_eq!(format_duration(&Duration::new(1, 500_000_000)), "1.5s");
        assert_eq!(format_duration(&Duration::new(0, -300_000_000)), "-0.3s");
        assert_eq!(format_duration(&Duration::new(0, 0)), "0s");
        assert_eq!(format_duration(&Duration::new(0, 1)), "0.000000001s");
    }

    #[test]
    fn test_parse_timezone() {
        assert!(matches!(parse_timezone("UTC").unwrap(), TimezoneInfo::Utc));
        assert!(matches!(
            parse_timezone("America/New_York").unwrap(),
            TimezoneInfo::Named(_)
        ));
        assert!(matches!(
            parse_timezone("+02:00").unwrap(),
            TimezoneInfo::Fixed(_)
        ));
        assert!(parse_timezone("Nowhere/Invalid").is_err());
    }

    #[test]
    fn test_timestamp_components_utc() {
        // 2023-06-15T10:30:45.123Z (a Thursday)
        let ts = parse_timestamp("2023-06-15T10:30:45.123Z").unwrap();
        let tz = TimezoneInfo::Utc;
        let get = |c| timestamp_component(&ts, c, &tz).unwrap();
        assert_eq!(get(TimestampComponent::Year), 2023);
        assert_eq!(get(TimestampComponent::Month), 5);
        assert_eq!(get(TimestampComponent::Date), 15);
        assert_eq!(get(TimestampComponent::DayOfMonth), 14);
        assert_eq!(get(TimestampComponent::DayOfWeek), 4);
        assert_eq!(get(TimestampComponent::Hours), 10);
        assert_eq!(get(TimestampComponent::Minutes), 30);
        assert_eq!(get(TimestampComponent::Seconds), 45);
        assert_eq!(get(TimestampComponent::Milliseconds), 123);
    }

    #[test]
    fn test_timestamp_components_with_offset() {
        let ts = parse_timestamp("2023-06-15T23:30:00Z").unwrap();
        let tz = parse_timezone("+02:00").unwrap();
        assert_eq!(
            timestamp_component(&ts, TimestampComponent::Hours, &tz).unwrap(),
            1
        );
        assert_eq!(
            timestamp_component(&ts, TimestampComponent::Date, &tz).unwrap(),
            16
        );
    }
}
