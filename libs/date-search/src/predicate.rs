use chrono::{DateTime, Utc};

use crate::approximate::approximate_range;
use crate::error::{DateSearchError, Result};
use crate::parse::{DateRange, ParsedDate};
use crate::prefix::SearchPrefix;

/// Comparison applied to a record's birth date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePredicate {
    /// `start <= field < end`
    InRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// `field < start || field >= end`
    OutsideRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// `field < t`
    Before(DateTime<Utc>),
    /// `field <= t`
    AtOrBefore(DateTime<Utc>),
    /// `field > t`
    After(DateTime<Utc>),
    /// `field >= t`
    AtOrAfter(DateTime<Utc>),
    /// `field == t`
    Exactly(DateTime<Utc>),
    /// `field != t`
    Not(DateTime<Utc>),
    /// `lower <= field <= upper`
    Within {
        lower: DateTime<Utc>,
        upper: DateTime<Utc>,
    },
}

impl DatePredicate {
    pub fn matches(&self, value: &DateTime<Utc>) -> bool {
        match *self {
            Self::InRange { start, end } => start <= *value && *value < end,
            Self::OutsideRange { start, end } => *value < start || *value >= end,
            Self::Before(t) => *value < t,
            Self::AtOrBefore(t) => *value <= t,
            Self::After(t) => *value > t,
            Self::AtOrAfter(t) => *value >= t,
            Self::Exactly(t) => *value == t,
            Self::Not(t) => *value != t,
            Self::Within { lower, upper } => lower <= *value && *value <= upper,
        }
    }
}

/// How a prefix compares against a range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRule {
    Inside,
    Outside,
    BeforeStart,
    BeforeEnd,
    FromStart,
    FromEnd,
    ApproximateStart,
}

/// How a prefix compares against an exact instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstantRule {
    Equal,
    NotEqual,
    Before,
    AtOrBefore,
    After,
    AtOrAfter,
    Approximate,
}

pub fn range_rule(prefix: SearchPrefix) -> RangeRule {
    match prefix {
        SearchPrefix::Eq => RangeRule::Inside,
        SearchPrefix::Ne => RangeRule::Outside,
        SearchPrefix::Lt => RangeRule::BeforeStart,
        SearchPrefix::Gt => RangeRule::FromEnd,
        SearchPrefix::Le => RangeRule::BeforeEnd,
        SearchPrefix::Ge => RangeRule::FromStart,
        SearchPrefix::Sa => RangeRule::FromEnd,
        SearchPrefix::Eb => RangeRule::BeforeStart,
        SearchPrefix::Ap => RangeRule::ApproximateStart,
    }
}

pub fn instant_rule(prefix: SearchPrefix) -> InstantRule {
    match prefix {
        SearchPrefix::Eq => InstantRule::Equal,
        SearchPrefix::Ne => InstantRule::NotEqual,
        SearchPrefix::Lt => InstantRule::Before,
        SearchPrefix::Gt => InstantRule::After,
        SearchPrefix::Le => InstantRule::AtOrBefore,
        SearchPrefix::Ge => InstantRule::AtOrAfter,
        SearchPrefix::Sa => InstantRule::After,
        SearchPrefix::Eb => InstantRule::Before,
        SearchPrefix::Ap => InstantRule::Approximate,
    }
}

/// Builds the predicate for a parsed date. A missing prefix means `eq`.
///
/// When the parsed date carries a range it is used even if an instant is
/// also present. `now` only matters for `ap`.
pub fn build_predicate(
    prefix: Option<SearchPrefix>,
    parsed: &ParsedDate,
    now: DateTime<Utc>,
) -> Result<DatePredicate> {
    let prefix = prefix.unwrap_or(SearchPrefix::Eq);
    match (parsed.range, parsed.instant) {
        (Some(range), _) => range_predicate(range_rule(prefix), range, now),
        (None, Some(instant)) => instant_predicate(instant_rule(prefix), instant, now),
        (None, None) => Err(DateSearchError::Internal(
            "parsed date has neither a range nor an instant".to_string(),
        )),
    }
}

fn range_predicate(
    rule: RangeRule,
    DateRange { start, end }: DateRange,
    now: DateTime<Utc>,
) -> Result<DatePredicate> {
    Ok(match rule {
        RangeRule::Inside => DatePredicate::InRange { start, end },
        RangeRule::Outside => DatePredicate::OutsideRange { start, end },
        RangeRule::BeforeStart => DatePredicate::Before(start),
        RangeRule::BeforeEnd => DatePredicate::Before(end),
        RangeRule::FromStart => DatePredicate::AtOrAfter(start),
        RangeRule::FromEnd => DatePredicate::AtOrAfter(end),
        RangeRule::ApproximateStart => approximate(start, now)?,
    })
}

fn instant_predicate(
    rule: InstantRule,
    t: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<DatePredicate> {
    Ok(match rule {
        InstantRule::Equal => DatePredicate::Exactly(t),
        InstantRule::NotEqual => DatePredicate::Not(t),
        InstantRule::Before => DatePredicate::Before(t),
        InstantRule::AtOrBefore => DatePredicate::AtOrBefore(t),
        InstantRule::After => DatePredicate::After(t),
        InstantRule::AtOrAfter => DatePredicate::AtOrAfter(t),
        InstantRule::Approximate => approximate(t, now)?,
    })
}

fn approximate(target: DateTime<Utc>, now: DateTime<Utc>) -> Result<DatePredicate> {
    let (lower, upper) = approximate_range(target, now)?;
    Ok(DatePredicate::Within { lower, upper })
}
