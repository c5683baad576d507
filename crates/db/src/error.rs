//! Persistence errors and user-facing message normalization.

/// Messages the backend returns verbatim, rewritten for end users.
const MESSAGE_REWRITES: &[(&str, &str)] = &[
    ("Invalid login credentials", "Invalid email or password"),
    ("Email not confirmed", "Please confirm your email address before signing in"),
    ("JWT expired", "Your session has expired. Please sign in again"),
];

/// Shown for transport-level failures instead of the raw error text.
pub const NETWORK_ERROR_MESSAGE: &str = "Unable to reach the server. Please try again";

/// Rewrite a raw backend message into the text shown to users.
///
/// Unknown messages pass through unchanged.
pub fn normalize_message(raw: &str) -> String {
    let trimmed = raw.trim();
    MESSAGE_REWRITES
        .iter()
        .find(|(from, _)| trimmed.eq_ignore_ascii_case(from))
        .map(|(_, to)| (*to).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Errors from any persistence client.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote API answered with a non-2xx status.
    #[error("Store API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A Postgres error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A row could not be converted to or from its entity shape.
    #[error("Malformed row: {0}")]
    Decode(#[from] serde_json::Error),

    /// The store refused the row (constraint, empty write, bad column).
    #[error("Row rejected: {0}")]
    Rejected(String),

    /// An admin-only call was made without admin credentials configured.
    #[error("Admin access is not configured")]
    AdminUnavailable,

    /// Local key/value storage could not be read or written.
    #[error("Local storage error: {0}")]
    Io(#[from] std::io::Error),

    /// The client could not be built from configuration.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

impl StoreError {
    /// A message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Request(_) => NETWORK_ERROR_MESSAGE.to_string(),
            StoreError::Api { message, .. } => normalize_message(message),
            StoreError::Rejected(message) => normalize_message(message),
            StoreError::AdminUnavailable => {
                "You do not have permission to perform this action".to_string()
            }
            StoreError::Database(_)
            | StoreError::Decode(_)
            | StoreError::Io(_)
            | StoreError::Config(_) => {
                "Something went wrong. Please try again".to_string()
            }
        }
    }
}
