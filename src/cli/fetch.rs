use std::{path::Path, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{cli::auth::require_token, config::Config, error, info, spotify, success, utils};

pub async fn fetch(config: &Config, output: &Path, limit: u32) {
    let token = require_token(config).await;
    info!("Ready to work with token: {}", utils::mask_token(&token));

    let pb = spinner("Fetching recently played tracks...");

    let history = match spotify::tracks::recently_played(config, &token, limit).await {
        Ok(history) => history,
        Err(e) => {
            pb.finish_and_clear();
            error!("{}", e);
        }
    };

    let ids = utils::unique_track_ids(&history);
    pb.set_message(format!("Fetching audio features for {} tracks...", ids.len()));

    let features = match spotify::tracks::audio_features(config, &token, &ids).await {
        Ok(features) => features,
        Err(e) => {
            pb.finish_and_clear();
            error!("{}", e);
        }
    };
    pb.finish_and_clear();

    let json = match serde_json::to_string_pretty(&features) {
        Ok(json) => json,
        Err(e) => error!("Cannot serialize audio features. Err: {}", e),
    };

    if let Err(e) = async_fs::write(output, json).await {
        error!("Cannot write {}. Err: {}", output.display(), e);
    }

    success!(
        "Saved audio features of {} tracks to {}",
        ids.len(),
        output.display()
    );
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
