use reqwest::StatusCode;
use thiserror::Error;

/// Plugin-level error returned from perform and cleanup.
///
/// `Display` carries only the generic message. Url, status and body stay in
/// the variant fields and go to the log.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid credentials talking to bonk")]
    Auth,

    #[error("{message}")]
    Api {
        message: &'static str,
        url: String,
        status: Option<StatusCode>,
        body: String,
    },

    #[error("Unable to find zone for domain")]
    ZoneNotFound { domain: String },

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    pub fn api(
        message: &'static str,
        url: impl Into<String>,
        status: Option<StatusCode>,
        body: impl Into<String>,
    ) -> Self {
        Error::Api {
            message,
            url: url.into(),
            status,
            body: body.into(),
        }
    }
}
