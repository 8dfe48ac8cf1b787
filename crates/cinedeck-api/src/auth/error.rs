use thiserror::Error;

/// Errors from the auth backend and the session guard.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email already exists or invalid password")]
    EmailConflictOrInvalid,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("not signed in")]
    NotAuthenticated,
}

impl AuthError {
    /// Connection failures and unexpected statuses, as opposed to a
    /// rejection the backend meant to send.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Api { .. })
    }
}
