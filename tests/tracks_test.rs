use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    routing::get,
};
use recentfeat::{config::Config, spotify::tracks, utils};
use serde_json::{Value, json};
use tokio::net::TcpListener;

type Seen = Arc<Mutex<Vec<(String, Option<String>, HashMap<String, String>)>>>;

async fn recently_played(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    record(&seen, "recently-played", &headers, query);
    Json(json!({
        "items": [
            { "track": { "id": "t1", "name": "One" }, "played_at": "2025-01-01T10:00:00Z" },
            { "track": { "id": "t2", "name": "Two" }, "played_at": "2025-01-01T09:55:00Z" },
            { "track": { "id": "t1", "name": "One" }, "played_at": "2025-01-01T09:50:00Z" }
        ],
        "next": null
    }))
}

async fn audio_features(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    record(&seen, "audio-features", &headers, query);
    Json(json!({ "audio_features": [{ "id": "t1", "energy": 0.5 }, { "id": "t2", "energy": 0.9 }] }))
}

async fn unauthorized() -> (StatusCode, &'static str) {
    (StatusCode::UNAUTHORIZED, r#"{"error":{"status":401,"message":"The access token expired"}}"#)
}

fn record(seen: &Seen, endpoint: &str, headers: &HeaderMap, query: HashMap<String, String>) {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    seen.lock().unwrap().push((endpoint.to_string(), auth, query));
}

async fn start_api(app: Router) -> Config {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let mut config = Config::new("client-id", "client-secret", "unused-token.json");
    config.api_url = format!("http://{addr}/v1");
    config
}

#[tokio::test]
async fn test_recently_played_then_audio_features() {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/v1/me/player/recently-played", get(recently_played))
        .route("/v1/audio-features", get(audio_features))
        .with_state(Arc::clone(&seen));
    let config = start_api(app).await;

    let history = tracks::recently_played(&config, "A1", 80).await.unwrap();
    let ids = utils::unique_track_ids(&history);
    let features = tracks::audio_features(&config, "A1", &ids).await.unwrap();

    assert_eq!(history.items.len(), 3);
    assert_eq!(ids, vec!["t1", "t2"]);
    assert_eq!(features["audio_features"].as_array().unwrap().len(), 2);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].0, "recently-played");
    assert_eq!(seen[0].1.as_deref(), Some("Bearer A1"));
    // limit is clamped to what the API accepts
    assert_eq!(seen[0].2["limit"], "50");
    assert_eq!(seen[1].0, "audio-features");
    assert_eq!(seen[1].1.as_deref(), Some("Bearer A1"));
    assert_eq!(seen[1].2["ids"], "t1,t2");
}

#[tokio::test]
async fn test_audio_features_without_ids_skips_request() {
    let config = Config::new("client-id", "client-secret", "unused-token.json");

    let features = tracks::audio_features(&config, "A1", &[]).await.unwrap();

    assert_eq!(features, json!({ "audio_features": [] }));
}

#[tokio::test]
async fn test_failed_call_reports_status_and_body() {
    let app = Router::new().route("/v1/me/player/recently-played", get(unauthorized));
    let config = start_api(app).await;

    let err = tracks::recently_played(&config, "stale", 10)
        .await
        .unwrap_err()
        .to_string();

    assert!(err.contains("401"));
    assert!(err.contains("The access token expired"));
}
