use chrono::{
    DateTime, Datelike, FixedOffset, Months, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound,
    TimeZone, Utc,
};
use std::fmt;

use crate::error::{DateSearchError, Result};

/// Precision implied by the layout of a date search value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Instant,
    Day,
    Month,
    Year,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [Self::Instant, Self::Day, Self::Month, Self::Year];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Instant => "instant",
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interval covered by a partial date. `start` is inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Result of parsing the date portion of a search value.
///
/// Either `range`, `instant`, or both are present. Both are only set for a
/// date-time that lands on midnight UTC; the range wins when building the
/// predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDate {
    pub granularity: Granularity,
    pub instant: Option<DateTime<Utc>>,
    pub range: Option<DateRange>,
}

impl ParsedDate {
    fn exact(instant: DateTime<Utc>) -> Self {
        Self {
            granularity: Granularity::Instant,
            instant: Some(instant),
            range: None,
        }
    }

    fn covering(granularity: Granularity, range: DateRange) -> Self {
        Self {
            granularity,
            instant: None,
            range: Some(range),
        }
    }
}

const DATE_TIME_LAYOUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses the date portion of a search value.
///
/// Layouts are tried in order: date-time, `yyyy-MM-dd`, `yyyy-MM`, `yyyy`.
/// Date-times are converted to UTC before the midnight check.
pub fn parse_date(raw: &str) -> Result<ParsedDate> {
    let s = raw.trim();

    if let Some(instant) = parse_date_time(s) {
        if instant.time() == NaiveTime::MIN {
            let mut parsed =
                ParsedDate::covering(Granularity::Day, day_range(instant.date_naive())?);
            parsed.instant = Some(instant);
            return Ok(parsed);
        }
        return Ok(ParsedDate::exact(instant));
    }

    if matches_layout(s, "dddd-dd-dd") {
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(ParsedDate::covering(Granularity::Day, day_range(date)?));
        }
    }

    if matches_layout(s, "dddd-dd") {
        let first = s[..4]
            .parse::<i32>()
            .ok()
            .zip(s[5..].parse::<u32>().ok())
            .and_then(|(year, month)| NaiveDate::from_ymd_opt(year, month, 1));
        if let Some(first) = first {
            return Ok(ParsedDate::covering(Granularity::Month, month_range(first)?));
        }
    }

    if matches_layout(s, "dddd") {
        if let Some(first) = s.parse::<i32>().ok().and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1)) {
            return Ok(ParsedDate::covering(Granularity::Year, year_range(first)?));
        }
    }

    Err(DateSearchError::unparseable(raw))
}

/// Parses a stored birth date: any date-time form accepted by [`parse_date`],
/// or a bare `yyyy-MM-dd` taken as UTC midnight.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if let Some(instant) = parse_date_time(s) {
        return Some(instant);
    }
    if matches_layout(s, "dddd-dd-dd") {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
        return Some(utc_midnight(date));
    }
    None
}

/// Without an offset the wall clock is taken as UTC. Fractions below a
/// microsecond are dropped, matching what `timestamptz` can store.
fn parse_date_time(s: &str) -> Option<DateTime<Utc>> {
    let (body, offset) = split_offset(s)?;
    let wall_clock = DATE_TIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(body, layout).ok())?;
    let instant = match offset {
        Some(offset) => offset
            .from_local_datetime(&wall_clock)
            .single()?
            .with_timezone(&Utc),
        None => Utc.from_utc_datetime(&wall_clock),
    };
    Some(instant.trunc_subsecs(6))
}

/// Splits a trailing `Z` or `±hh:mm` off a date-time. `None` when the string
/// has no time part or the offset is malformed.
fn split_offset(s: &str) -> Option<(&str, Option<FixedOffset>)> {
    let time_at = s.find(['T', ' '])?;
    let time = &s[time_at..];

    if let Some(body) = s.strip_suffix('Z') {
        return Some((body, FixedOffset::east_opt(0)));
    }
    match time.rfind(|c: char| c == '+' || c == '-') {
        Some(pos) => {
            let split = time_at + pos;
            Some((&s[..split], Some(parse_offset(&s[split..])?)))
        }
        None => Some((s, None)),
    }
}

fn parse_offset(tz: &str) -> Option<FixedOffset> {
    let sign = if tz.starts_with('-') { -1 } else { 1 };
    let t = &tz[1..];
    let (h, m) = match t.split_once(':') {
        Some(parts) => parts,
        None if t.len() == 4 => t.split_at(2),
        None if t.len() == 2 => (t, "00"),
        None => return None,
    };
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let hours: i32 = h.parse().ok()?;
    let mins: i32 = m.parse().ok()?;
    if hours > 14 || mins > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + mins * 60))
}

/// `d` matches one ASCII digit; every other pattern char matches itself.
fn matches_layout(s: &str, pattern: &str) -> bool {
    s.len() == pattern.len()
        && s.bytes().zip(pattern.bytes()).all(|(c, p)| match p {
            b'd' => c.is_ascii_digit(),
            _ => c == p,
        })
}

fn utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn day_range(date: NaiveDate) -> Result<DateRange> {
    let next = date
        .succ_opt()
        .ok_or_else(|| DateSearchError::Internal(format!("no day after {date}")))?;
    Ok(DateRange {
        start: utc_midnight(date),
        end: utc_midnight(next),
    })
}

fn month_range(first: NaiveDate) -> Result<DateRange> {
    let next = first
        .checked_add_months(Months::new(1))
        .ok_or_else(|| DateSearchError::Internal(format!("no month after {first}")))?;
    Ok(DateRange {
        start: utc_midnight(first),
        end: utc_midnight(next),
    })
}

// The year ceiling is Dec 31 23:59:59.999 rather than the start of the next
// year, unlike the day and month ranges.
fn year_range(first: NaiveDate) -> Result<DateRange> {
    let ceiling = NaiveDate::from_ymd_opt(first.year(), 12, 31)
        .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
        .ok_or_else(|| DateSearchError::Internal(format!("no year ceiling for {first}")))?;
    Ok(DateRange {
        start: utc_midnight(first),
        end: Utc.from_utc_datetime(&ceiling),
    })
}
