use thiserror::Error;

pub type Result<T> = std::result::Result<T, DateSearchError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateSearchError {
    #[error("birthDate parameter is required")]
    EmptyInput,

    #[error(
        "Invalid date format. Expected formats: yyyy-MM-ddTHH:mm:ss, yyyy-MM-dd, yyyy-MM, or yyyy"
    )]
    UnparseableDate { value: String },

    /// A parsed date carried neither a range nor an instant, or a bound fell
    /// outside the representable calendar.
    #[error("date search invariant violated: {0}")]
    Internal(String),
}

impl DateSearchError {
    /// True for errors caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::UnparseableDate { .. })
    }

    pub(crate) fn unparseable(value: &str) -> Self {
        Self::UnparseableDate {
            value: value.to_string(),
        }
    }
}
