use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid date for event slot {slot}: {value:?}")]
    InvalidDate { slot: usize, value: String },
}

pub type TypeResult<T> = Result<T, TypeError>;
