use reqwest::Client;
use serde_json::Value;

use crate::{Res, config::Config, types::RecentlyPlayedResponse};

/// Upper bound the Web API accepts for `limit` on the play history endpoint.
pub const MAX_RECENTLY_PLAYED: u32 = 50;

/// Fetches the user's most recently played tracks.
///
/// `limit` is clamped to `1..=50`. Requires the `user-read-recently-played`
/// scope on the token.
pub async fn recently_played(
    config: &Config,
    token: &str,
    limit: u32,
) -> Res<RecentlyPlayedResponse> {
    let url = format!(
        "{uri}/me/player/recently-played",
        uri = config.api_url.trim_end_matches('/')
    );
    let limit = limit.clamp(1, MAX_RECENTLY_PLAYED).to_string();

    let res = Client::new()
        .get(&url)
        .bearer_auth(token)
        .query(&[("limit", limit.as_str())])
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(format!("Fetching recently played tracks failed ({status}): {body}").into());
    }

    Ok(res.json::<RecentlyPlayedResponse>().await?)
}

/// Fetches audio features for the given track ids, as returned by the API.
///
/// An empty id list yields `{"audio_features": []}` without a request.
pub async fn audio_features(config: &Config, token: &str, ids: &[String]) -> Res<Value> {
    if ids.is_empty() {
        return Ok(serde_json::json!({ "audio_features": [] }));
    }

    let url = format!(
        "{uri}/audio-features",
        uri = config.api_url.trim_end_matches('/')
    );
    let ids = ids.join(",");

    let res = Client::new()
        .get(&url)
        .bearer_auth(token)
        .query(&[("ids", ids.as_str())])
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(format!("Fetching audio features failed ({status}): {body}").into());
    }

    Ok(res.json::<Value>().await?)
}
