#![forbid(unsafe_code)]
//! Birth-date search resolution.
//!
//! Turns a FHIR-style prefixed date string (`ge2020-01`, `eq1990-05-12`,
//! `ap2000`, ...) into a [`DatePredicate`] over a UTC timestamp field:
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use patient_date_search::{DatePredicate, DateSearch};
//!
//! let resolution = DateSearch::new().resolve("ge2020-01").unwrap();
//! let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
//! assert_eq!(resolution.predicate, DatePredicate::AtOrAfter(start));
//! assert!(resolution.predicate.matches(&start));
//! ```

mod approximate;
mod clock;
mod error;
mod parse;
mod predicate;
mod prefix;
mod resolver;

pub use approximate::{approximate_range, approximate_tolerance};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{DateSearchError, Result};
pub use parse::{parse_date, parse_instant, DateRange, Granularity, ParsedDate};
pub use predicate::{build_predicate, instant_rule, range_rule, DatePredicate, InstantRule, RangeRule};
pub use prefix::{extract_prefix, SearchPrefix};
pub use resolver::{resolve, DateSearch, Resolution};
