use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the Replicate HTTP API
#[derive(Debug, Error)]
pub enum ReplicateApiError {
    #[error("Invalid request (400): {message}")]
    InvalidRequest { message: String },

    #[error("Authentication error (401): {message}")]
    Authentication { message: String },

    #[error("Permission error (403): {message}")]
    Permission { message: String },

    #[error("Not found (404): {message}")]
    NotFound { message: String },

    #[error("Unprocessable input (422): {message}")]
    UnprocessableInput { message: String },

    #[error("Rate limit exceeded (429): {message}")]
    RateLimit { message: String },

    #[error("Internal API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Catch-all for unexpected status codes
    #[error("Unexpected API error ({status}): {message}")]
    Unexpected { status: u16, message: String },
}

impl ReplicateApiError {
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();

        match status.as_u16() {
            400 => Self::InvalidRequest { message },
            401 => Self::Authentication { message },
            403 => Self::Permission { message },
            404 => Self::NotFound { message },
            422 => Self::UnprocessableInput { message },
            429 => Self::RateLimit { message },
            status if (500..600).contains(&status) => Self::Api { status, message },
            status => Self::Unexpected { status, message },
        }
    }
}
