//! Error types for the token lifecycle.
//!
//! Everything between reading the cache file and handing out an access token
//! reports failures through [`AuthError`]. The CLI layer turns these into
//! user-facing messages and aborts the run.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Result alias used across the authentication core.
pub type AuthResult<T> = std::result::Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// The cache file exists but does not hold a token record.
    #[error("cannot decode cached token at {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The `state` echoed by the callback does not match the one we sent.
    #[error("state mismatch on authorization callback")]
    StateMismatch,

    /// The token endpoint refused the request or answered without a token.
    #[error("token endpoint rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// The callback arrived without an authorization code.
    #[error("no authorization code received{}", provider_error(.error))]
    MissingCode { error: Option<String> },

    /// A required field is absent from an otherwise successful token response.
    #[error("token response is missing `{0}`")]
    MissingField(&'static str),

    /// `expires_in` is not positive or does not fit an epoch timestamp.
    #[error("token response has an unusable `expires_in`: {0}")]
    InvalidExpiry(i64),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("cannot bind callback listener on {addr}: {source}")]
    CallbackBind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("timed out waiting for the authorization callback")]
    CallbackTimeout,

    #[error("callback server error: {0}")]
    Callback(String),
}

impl AuthError {
    /// Returns `true` for failures that indicate a forged or foreign callback.
    pub fn is_security(&self) -> bool {
        matches!(self, AuthError::StateMismatch)
    }

    /// Returns `true` when the cache file could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, AuthError::Decode { .. })
    }
}

fn provider_error(error: &Option<String>) -> String {
    match error {
        Some(e) => format!(" (provider error: {e})"),
        None => String::new(),
    }
}
