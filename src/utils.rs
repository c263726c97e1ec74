use std::collections::HashSet;

use base64::{
    Engine,
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
};
use chrono::Utc;
use rand::Rng;

use crate::types::RecentlyPlayedResponse;

/// Current time in epoch seconds.
pub fn now() -> i64 {
    Utc::now().timestamp()
}

/// Anti-forgery `state` value: 32 random bytes, URL-safe base64.
pub fn generate_state() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// `Authorization` header value for HTTP Basic client credentials.
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    let credentials = format!("{client_id}:{client_secret}");
    format!("Basic {}", STANDARD.encode(credentials.as_bytes()))
}

/// Shortens a token for display, keeping three characters at each end.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 6 {
        return "*".repeat(chars.len());
    }

    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 3..].iter().collect();
    format!("{head}...{tail}")
}

/// Track ids of a play history, first occurrence wins. Local files have no id and are skipped.
pub fn unique_track_ids(history: &RecentlyPlayedResponse) -> Vec<String> {
    let mut seen = HashSet::new();
    history
        .items
        .iter()
        .filter_map(|item| item.track.id.clone())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Human readable remaining lifetime, e.g. `"42m 10s"` or `"expired"`.
pub fn format_remaining(expires_at: i64, now: i64) -> String {
    let remaining = expires_at - now;
    if remaining <= 0 {
        return "expired".to_string();
    }

    let minutes = remaining / 60;
    let seconds = remaining % 60;
    if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
