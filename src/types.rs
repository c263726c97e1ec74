use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::error::{AuthError, AuthResult};

/// Seconds subtracted from the provider TTL so a token never expires mid-request.
pub const SAFETY_MARGIN_SECS: i64 = 60;

/// The cached credential set. Exactly one of these lives in the token file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    /// Epoch seconds, with [`SAFETY_MARGIN_SECS`] already subtracted.
    pub expires_at: i64,
}

impl TokenRecord {
    /// Builds a record from a token endpoint response received at `now`.
    ///
    /// When the response carries no `refresh_token`, `fallback_refresh` is
    /// kept instead. Refreshes pass the token they were called with; code
    /// exchanges pass `None` and fail if the provider omitted it.
    pub fn from_response(
        response: TokenResponse,
        fallback_refresh: Option<&str>,
        now: i64,
    ) -> AuthResult<Self> {
        let access_token = response
            .access_token
            .ok_or(AuthError::MissingField("access_token"))?;
        let refresh_token = response
            .refresh_token
            .or_else(|| fallback_refresh.map(str::to_string))
            .ok_or(AuthError::MissingField("refresh_token"))?;
        let expires_in = response
            .expires_in
            .ok_or(AuthError::MissingField("expires_in"))?;
        if expires_in <= 0 {
            return Err(AuthError::InvalidExpiry(expires_in));
        }
        let expires_at = now
            .checked_add(expires_in)
            .and_then(|t| t.checked_sub(SAFETY_MARGIN_SECS))
            .ok_or(AuthError::InvalidExpiry(expires_in))?;

        Ok(Self {
            access_token,
            refresh_token,
            expires_at,
        })
    }

    pub fn is_valid_at(&self, now: i64) -> bool {
        now < self.expires_at
    }
}

/// Body of a token endpoint answer. Everything is optional so that a
/// malformed answer turns into a precise error instead of a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Query parameters captured from the provider redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// In-flight interactive login. Never persisted.
#[derive(Debug)]
pub struct PendingAuthorization {
    pub state: String,
    pub authorization_code: Option<String>,
}

impl PendingAuthorization {
    pub fn new(state: String) -> Self {
        Self {
            state,
            authorization_code: None,
        }
    }

    /// Checks the callback against this login attempt and returns the code.
    ///
    /// The state comparison happens first: a foreign callback is rejected
    /// even if it carries a code.
    pub fn accept(&mut self, params: CallbackParams) -> AuthResult<String> {
        if params.state.as_deref() != Some(self.state.as_str()) {
            return Err(AuthError::StateMismatch);
        }

        let Some(code) = params.code.filter(|c| !c.is_empty()) else {
            return Err(AuthError::MissingCode {
                error: params.error,
            });
        };

        self.authorization_code = Some(code.clone());
        Ok(code)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentlyPlayedResponse {
    pub items: Vec<PlayHistory>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayHistory {
    pub track: Track,
    #[serde(default)]
    pub played_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// `null` for local files in the user's history.
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Tabled)]
pub struct TokenStatusRow {
    pub field: String,
    pub value: String,
}
