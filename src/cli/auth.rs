use crate::{
    config::Config,
    error::AuthError,
    error,
    spotify::auth::TokenSession,
    success, utils,
};

pub async fn auth(config: &Config, force: bool) {
    let session = TokenSession::spotify(config);

    let result = if force {
        session.force_login().await
    } else {
        session.access_token().await
    };

    match result {
        Ok(token) => {
            success!("Ready to work with token: {}", utils::mask_token(&token));
        }
        Err(e) => fail(e),
    }
}

/// Resolves a token for commands that need one, exiting the process on failure.
pub async fn require_token(config: &Config) -> String {
    match TokenSession::spotify(config).access_token().await {
        Ok(token) => token,
        Err(e) => fail(e),
    }
}

fn fail(e: AuthError) -> ! {
    if e.is_security() {
        error!("Authorization aborted, the callback did not belong to this login: {}", e);
    }
    if e.is_decode() {
        error!(
            "{}\nRun recentfeat logout to discard the cached token and log in again.",
            e
        );
    }
    error!("Authentication failed: {}", e)
}
