use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Google API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("token exchange failed: {0}")]
    Auth(String),

    #[error("invalid service account credentials: {0}")]
    Credentials(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, SheetsError>;
