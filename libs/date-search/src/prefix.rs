use std::fmt;

/// Comparison prefix of a date search value (`ge2020-01`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchPrefix {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    /// Starts after.
    Sa,
    /// Ends before.
    Eb,
    /// Approximately.
    Ap,
}

impl SearchPrefix {
    pub const ALL: [SearchPrefix; 9] = [
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Lt,
        Self::Ge,
        Self::Le,
        Self::Sa,
        Self::Eb,
        Self::Ap,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Ge => "ge",
            Self::Le => "le",
            Self::Sa => "sa",
            Self::Eb => "eb",
            Self::Ap => "ap",
        }
    }

    /// Matches a two-letter token case-insensitively.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(token))
    }

    pub fn parse_prefix(value: &str) -> (Option<Self>, &str) {
        // Prefixes only apply when they are immediately at the start of the string.
        // `get` returns None when byte 2 is not a char boundary, so non-ASCII input
        // falls through untouched.
        match value.get(..2).and_then(Self::from_token) {
            Some(prefix) => (Some(prefix), &value[2..]),
            None => (None, value),
        }
    }
}

impl fmt::Display for SearchPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Splits a search value into its prefix (if any) and the date portion.
///
/// An unrecognised leading pair is not consumed: `zz2020` yields
/// `(None, "zz2020")`.
pub fn extract_prefix(input: &str) -> (Option<SearchPrefix>, &str) {
    SearchPrefix::parse_prefix(input)
}
