use std::path::Path;

use chrono::DateTime;
use tabled::Table;

use crate::{
    error,
    management::TokenStore,
    success,
    types::{TokenRecord, TokenStatusRow},
    utils, warning,
};

pub async fn status(token_path: &Path) {
    let store = TokenStore::new(token_path);

    let record = match store.load().await {
        Ok(record) => record,
        Err(e) => error!(
            "{}\nRun recentfeat logout to discard the cached token and log in again.",
            e
        ),
    };

    let table = Table::new(status_rows(store.path().display().to_string(), record.as_ref()));
    println!("{}", table);
}

pub async fn logout(token_path: &Path) {
    let store = TokenStore::new(token_path);
    match store.clear().await {
        Ok(true) => success!("Removed cached token {}", store.path().display()),
        Ok(false) => warning!("No cached token at {}", store.path().display()),
        Err(e) => error!("Cannot remove cached token. Err: {}", e),
    }
}

fn status_rows(path: String, record: Option<&TokenRecord>) -> Vec<TokenStatusRow> {
    let row = |field: &str, value: String| TokenStatusRow {
        field: field.to_string(),
        value,
    };

    let mut rows = vec![row("cache", path)];
    match record {
        None => rows.push(row("token", "none".to_string())),
        Some(r) => {
            let now = utils::now();
            let expires = DateTime::from_timestamp(r.expires_at, 0)
                .map(|d| d.to_rfc3339())
                .unwrap_or_else(|| r.expires_at.to_string());
            rows.push(row("access token", utils::mask_token(&r.access_token)));
            rows.push(row("expires at", expires));
            rows.push(row("remaining", utils::format_remaining(r.expires_at, now)));
            let state = if r.is_valid_at(now) { "valid" } else { "needs refresh" };
            rows.push(row("state", state.to_string()));
        }
    }
    rows
}
