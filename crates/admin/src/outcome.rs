use storefront_core::types::DbId;
use storefront_core::validation::ValidationResult;
use storefront_db::StoreError;

/// Why a controller mutation did not apply.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    /// The target row does not exist (locally or in the store).
    #[error("Record not found")]
    NotFound,

    /// The input failed validation; the store was not called.
    #[error("Please fix the highlighted fields")]
    Invalid(ValidationResult),

    /// The store refused or could not be reached. Carries the user-facing
    /// message.
    #[error("{0}")]
    Store(String),
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Invalid(_) => "VALIDATION_ERROR",
            ErrorKind::Store(_) => "STORE_ERROR",
        }
    }
}

impl From<StoreError> for ErrorKind {
    fn from(err: StoreError) -> Self {
        ErrorKind::Store(err.user_message())
    }
}

/// Result of one controller mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<T> {
    Success(T),
    Failure(ErrorKind),
}

impl<T> MutationOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, MutationOutcome::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            MutationOutcome::Success(value) => Some(value),
            MutationOutcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ErrorKind> {
        match self {
            MutationOutcome::Success(_) => None,
            MutationOutcome::Failure(kind) => Some(kind),
        }
    }
}

impl<T> From<Result<T, ErrorKind>> for MutationOutcome<T> {
    fn from(result: Result<T, ErrorKind>) -> Self {
        match result {
            Ok(value) => MutationOutcome::Success(value),
            Err(kind) => MutationOutcome::Failure(kind),
        }
    }
}

/// Per-id result of a bulk delete. Deletes are independent; there is no
/// rollback of the ones that succeeded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkDeleteReport {
    pub succeeded: Vec<DbId>,
    pub failed: Vec<(DbId, ErrorKind)>,
}

impl BulkDeleteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
