//! # Spotify Integration Module
//!
//! Talks to the two Spotify services recentfeat needs: the accounts service
//! (OAuth2 Authorization Code flow) and the Web API (play history and audio
//! features).
//!
//! ## Architecture
//!
//! ```text
//! CLI
//!  ↓
//! TokenSession ── TokenStore (cache file)
//!  ↓
//! Authenticator
//!  ├── TokenExchange   → POST /api/token (code / refresh grant)
//!  └── AuthorizationPrompt → browser + local CallbackReceiver
//!  ↓
//! tracks               → GET /me/player/recently-played, GET /audio-features
//! ```
//!
//! ## Token lifecycle
//!
//! A cached token is used as long as it has not reached `expires_at`, which
//! sits 60 seconds before the real expiry reported by Spotify. Past that
//! point it is refreshed once. Without a cache the user logs in through the
//! browser; Spotify is asked to always show the consent dialog so a stale
//! browser session is never reused silently.
//!
//! The token endpoint is called with HTTP Basic client credentials, so the
//! client secret never leaves this process except towards Spotify.
//!
//! ## Errors
//!
//! - [`auth`] and [`token`] report [`crate::error::AuthError`].
//! - [`tracks`] uses the crate-wide [`crate::Res`] alias and includes the
//!   response body of failed calls.
//!
//! Nothing here retries. Failures surface to the caller, which aborts.

pub mod auth;
pub mod token;
pub mod tracks;
