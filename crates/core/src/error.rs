/// Domain-level errors raised by pure logic in this crate.
///
/// Validation of user input does not use this type; it returns a
/// [`ValidationResult`](crate::validation::ValidationResult) instead.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    /// A string did not name a known enum value (category, status, ...).
    #[error("Unknown {kind} value: '{value}'")]
    UnknownValue { kind: &'static str, value: String },
}
