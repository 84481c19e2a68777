use thiserror::Error;

/// Errors from engine operations.
///
/// With the default lenient policy, missing references are silent no-ops and
/// only input validation and storage failures surface here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("member not found: {0}")]
    MemberNotFound(String),

    #[error("category not found: {0}")]
    CategoryNotFound(String),

    #[error("item {item:?} not found in category {category:?}")]
    ItemNotFound { category: String, item: String },

    #[error("member already exists: {0}")]
    DuplicateMember(String),

    #[error("{0} must not be empty")]
    EmptyName(&'static str),

    #[error("invalid input: {0}")]
    InvalidInput(#[from] tally_types::TypeError),

    #[error("store error: {0}")]
    Store(#[from] tally_store::StoreError),

    #[error("roster lock poisoned: {0}")]
    Lock(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
