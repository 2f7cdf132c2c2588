use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::ser::Serializer;

fn parse_time_impl(h: &str, m: &str, s: &str) -> Result<(u32, u32, u32), std::num::ParseIntError> {
    let hours: u32 = h.parse()?;
    let minutes: u32 = m.parse()?;
    let seconds: u32 = s.parse()?;
    Ok((hours, minutes, seconds))
}

/// Splits a `HH:MM:SS` feed time into its components
///
/// Hours may be 24 or more: a service day can run past midnight.
pub fn parse_time(s: &str) -> Result<(u32, u32, u32), crate::Error> {
    let mk_err = || crate::Error::InvalidTime(s.to_owned());

    let s = s.trim();
    if s.len() < 7 {
        return Err(mk_err());
    }
    let mut parts = s.split(':');

    let hour = parts.next().ok_or_else(mk_err)?;
    let min = parts.next().ok_or_else(mk_err)?;
    let sec = parts.next().ok_or_else(mk_err)?;
    if parts.next().is_some() {
        return Err(mk_err());
    }

    if min.len() != 2 || sec.len() != 2 {
        return Err(mk_err());
    }

    parse_time_impl(hour, min, sec).map_err(|_| mk_err())
}

/// Resolves a feed time against the service day `base_date`
///
/// `"25:10:00"` on a given date is `01:10:00` on the next calendar day.
pub fn resolve_time(time: &str, base_date: NaiveDate) -> Result<NaiveDateTime, crate::Error> {
    let (hours, minutes, seconds) = parse_time(time)?;
    let extra_days = hours / 24;
    let wall_clock = NaiveTime::from_hms_opt(hours % 24, minutes, seconds)
        .ok_or_else(|| crate::Error::InvalidTime(time.to_owned()))?;

    base_date
        .and_time(wall_clock)
        .checked_add_signed(Duration::days(i64::from(extra_days)))
        .ok_or_else(|| crate::Error::InvalidTime(time.to_owned()))
}

/// Serializes an instant as its wall clock `HH:MM:SS`
pub fn serialize_clock_time<S>(instant: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&instant.format("%H:%M:%S").to_string())
}
