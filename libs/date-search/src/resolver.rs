use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::error::{DateSearchError, Result};
use crate::parse::{parse_date, ParsedDate};
use crate::predicate::{build_predicate, DatePredicate};
use crate::prefix::{extract_prefix, SearchPrefix};

/// Outcome of resolving one search value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Effective prefix (`eq` when none was given).
    pub prefix: SearchPrefix,
    pub parsed: ParsedDate,
    pub predicate: DatePredicate,
}

/// Resolves prefixed date search values against an injected clock.
///
/// Stateless apart from the clock; cheap to clone and safe to share across
/// requests.
#[derive(Debug, Clone)]
pub struct DateSearch {
    clock: Arc<dyn Clock>,
}

impl Default for DateSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl DateSearch {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Arc::new(clock),
        }
    }

    pub fn resolve(&self, input: &str) -> Result<Resolution> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DateSearchError::EmptyInput);
        }

        let (prefix, date) = extract_prefix(input);
        let parsed = parse_date(date)?;
        let predicate = build_predicate(prefix, &parsed, self.clock.now())?;
        let prefix = prefix.unwrap_or(SearchPrefix::Eq);

        tracing::debug!(
            input,
            prefix = %prefix,
            granularity = %parsed.granularity,
            ?predicate,
            "Resolved date search"
        );

        Ok(Resolution {
            prefix,
            parsed,
            predicate,
        })
    }
}

/// Resolves `input` against the system clock.
pub fn resolve(input: &str) -> Result<Resolution> {
    DateSearch::new().resolve(input)
}
