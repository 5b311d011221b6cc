use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BonkProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response from bonk on {url}: {source}")]
    Decode {
        url: String,
        status: StatusCode,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

use crate::error::Error;

pub fn map_error(e: BonkProviderError) -> Error {
    use BonkProviderError::*;
    match e {
        Http(err) => {
            let url = err.url().map(|u| u.to_string()).unwrap_or_default();
            let body = err.to_string();
            Error::api("Unable to reach bonk", url, err.status(), body)
        }
        Decode {
            url,
            status,
            body,
            source: _,
        } => Error::api("Invalid response from bonk", url, Some(status), body),
    }
}
