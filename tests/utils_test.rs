use recentfeat::types::{PlayHistory, RecentlyPlayedResponse, Track};
use recentfeat::utils::*;

// Helper function to create a play history entry
fn create_test_play(id: &str, name: &str) -> PlayHistory {
    PlayHistory {
        track: Track {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            uri: Some(format!("spotify:track:{}", id)),
        },
        played_at: None,
    }
}

#[test]
fn test_generate_state() {
    let state = generate_state();

    // 32 bytes in unpadded base64
    assert_eq!(state.len(), 43);

    // Should be URL-safe
    assert!(
        state
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );

    // Two generated states should be different
    assert_ne!(state, generate_state());
}

#[test]
fn test_basic_auth_header() {
    assert_eq!(basic_auth_header("id", "secret"), "Basic aWQ6c2VjcmV0");

    // Colons in the secret are kept as-is
    assert_eq!(basic_auth_header("a", "b:c"), "Basic YTpiOmM=");
}

#[test]
fn test_mask_token() {
    assert_eq!(mask_token("BQCabcdefxyz"), "BQC...xyz");
    assert_eq!(mask_token("abcdefg"), "abc...efg");

    // Short tokens are hidden completely
    assert_eq!(mask_token("abcdef"), "******");
    assert_eq!(mask_token(""), "");
}

#[test]
fn test_unique_track_ids_keeps_first_occurrence() {
    let history = RecentlyPlayedResponse {
        items: vec![
            create_test_play("t1", "One"),
            create_test_play("t2", "Two"),
            create_test_play("t1", "One"),
            create_test_play("t3", "Three"),
            create_test_play("t2", "Two"),
        ],
        next: None,
    };

    assert_eq!(unique_track_ids(&history), vec!["t1", "t2", "t3"]);
}

// Helper function to create a local file entry, which has no track id
fn create_local_play(name: &str) -> PlayHistory {
    PlayHistory {
        track: Track {
            id: None,
            name: Some(name.to_string()),
            uri: Some(format!("spotify:local:::{}:180", name)),
        },
        played_at: None,
    }
}

#[test]
fn test_unique_track_ids_skips_local_files() {
    let history = RecentlyPlayedResponse {
        items: vec![
            create_test_play("t1", "One"),
            create_local_play("Demo"),
            create_test_play("t2", "Two"),
            create_local_play("Demo"),
        ],
        next: None,
    };

    assert_eq!(unique_track_ids(&history), vec!["t1", "t2"]);
}

#[test]
fn test_recently_played_decodes_null_track_id() {
    let history: RecentlyPlayedResponse = serde_json::from_str(
        r#"{"items":[
            {"track":{"id":"t1","name":"One","uri":"spotify:track:t1"},"played_at":"2025-01-01T10:00:00Z"},
            {"track":{"id":null,"name":"Local file","uri":"spotify:local:::Local+file:180"},"played_at":"2025-01-01T09:55:00Z"}
        ],"next":null}"#,
    )
    .unwrap();

    assert_eq!(history.items.len(), 2);
    assert_eq!(history.items[1].track.id, None);
    assert_eq!(unique_track_ids(&history), vec!["t1"]);
}

#[test]
fn test_unique_track_ids_empty_history() {
    let history = RecentlyPlayedResponse {
        items: Vec::new(),
        next: None,
    };

    assert!(unique_track_ids(&history).is_empty());
}

#[test]
fn test_format_remaining() {
    assert_eq!(format_remaining(1_000, 1_000), "expired");
    assert_eq!(format_remaining(900, 1_000), "expired");
    assert_eq!(format_remaining(1_045, 1_000), "45s");
    assert_eq!(format_remaining(1_000 + 42 * 60 + 10, 1_000), "42m 10s");
}

#[test]
fn test_now_is_current_epoch() {
    let before = chrono::Utc::now().timestamp();
    let value = now();
    let after = chrono::Utc::now().timestamp();

    assert!(before <= value && value <= after);
}
