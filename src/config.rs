//! Configuration management for recentfeat.
//!
//! Values come from the process environment, optionally pre-seeded from a
//! `.env` file in the local data directory. They are read once into a
//! [`Config`] which is then passed by reference to everything that needs it.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use reqwest::Url;

use crate::error::{AuthError, AuthResult};

pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888";
pub const DEFAULT_SCOPE: &str = "user-read-recently-played";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives under `recentfeat/.env` in the platform data directory:
/// - Linux: `~/.local/share/recentfeat/.env`
/// - macOS: `~/Library/Application Support/recentfeat/.env`
/// - Windows: `%LOCALAPPDATA%/recentfeat/.env`
///
/// Variables already present in the process environment are not overridden.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the `.env` file
/// cannot be read or parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok(())
}

/// Platform data directory for this application.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("recentfeat");
    path
}

/// Default location of the cached token record.
pub fn default_token_path() -> PathBuf {
    data_dir().join("cache").join("token.json")
}

/// Token cache location from the process environment.
///
/// Needs no client credentials, so `status` and `logout` work without them.
pub fn token_path_from_env() -> PathBuf {
    token_path_from_lookup(|key| env::var(key).ok())
}

/// `RECENTFEAT_TOKEN_PATH` through an arbitrary key lookup, else [`default_token_path`].
pub fn token_path_from_lookup<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup("RECENTFEAT_TOKEN_PATH")
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(default_token_path)
}

/// Everything the token lifecycle and the Web API calls need to know.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    /// Must match the redirect URI registered with the provider, byte for byte.
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub token_path: PathBuf,
    /// `None` waits for the browser callback forever.
    pub callback_timeout: Option<Duration>,
}

impl Config {
    /// Builds a config with default endpoints for the given credentials.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        token_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            token_path: token_path.into(),
            callback_timeout: None,
        }
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> AuthResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> AuthResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| AuthError::Config(format!("{key} must be set")))
        };

        let callback_timeout = match get("RECENTFEAT_CALLBACK_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    AuthError::Config(format!(
                        "RECENTFEAT_CALLBACK_TIMEOUT_SECS is not a number: {raw}"
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            client_id: require("SPOTIFY_API_AUTH_CLIENT_ID")?,
            client_secret: require("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
            redirect_uri: get("SPOTIFY_API_REDIRECT_URI")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            scope: get("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            auth_url: get("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: get("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_url: get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token_path: token_path_from_lookup(&lookup),
            callback_timeout,
        })
    }

    /// Host and port the callback listener has to bind, taken from the redirect URI.
    pub fn callback_host_port(&self) -> AuthResult<(String, u16)> {
        let url = Url::parse(&self.redirect_uri).map_err(|e| {
            AuthError::Config(format!("invalid redirect uri {}: {e}", self.redirect_uri))
        })?;
        let host = url
            .host_str()
            .ok_or_else(|| AuthError::Config(format!("redirect uri has no host: {url}")))?
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_string();
        let port = url
            .port_or_known_default()
            .ok_or_else(|| AuthError::Config(format!("redirect uri has no port: {url}")))?;
        Ok((host, port))
    }
}
