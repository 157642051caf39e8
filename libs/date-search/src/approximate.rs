use chrono::{DateTime, Duration, Utc};

use crate::error::{DateSearchError, Result};

/// Tolerance for `ap` searches: 10% of the distance between `target` and
/// `now`, never less than one day.
///
/// The window depends on `now`, so the same query evaluated on different days
/// matches different records.
pub fn approximate_tolerance(target: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    let distance = (now - target).abs();
    std::cmp::max(Duration::days(1), distance / 10)
}

/// Inclusive `[target - tolerance, target + tolerance]` window.
pub fn approximate_range(
    target: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let tolerance = approximate_tolerance(target, now);
    let lower = target.checked_sub_signed(tolerance);
    let upper = target.checked_add_signed(tolerance);
    match lower.zip(upper) {
        Some(bounds) => Ok(bounds),
        None => Err(DateSearchError::Internal(format!(
            "approximate window around {target} is out of range"
        ))),
    }
}
