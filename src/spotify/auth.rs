use std::future::Future;

use reqwest::Url;

use crate::{
    config::Config,
    error::{AuthError, AuthResult},
    info,
    management::TokenStore,
    server::CallbackReceiver,
    spotify::token::{TokenClient, TokenExchange},
    success,
    types::{CallbackParams, PendingAuthorization, TokenRecord},
    utils, warning,
};

/// Sends the user to the authorize page and returns what the redirect carried.
pub trait AuthorizationPrompt {
    fn authorize(
        &self,
        authorize_url: &Url,
    ) -> impl Future<Output = AuthResult<CallbackParams>> + Send;
}

/// Opens the system browser and waits on the local redirect listener.
pub struct BrowserPrompt<'a> {
    config: &'a Config,
}

impl<'a> BrowserPrompt<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }
}

impl AuthorizationPrompt for BrowserPrompt<'_> {
    async fn authorize(&self, authorize_url: &Url) -> AuthResult<CallbackParams> {
        // The listener has to be up before the provider can redirect to it.
        let (host, port) = self.config.callback_host_port()?;
        let receiver = CallbackReceiver::bind(&host, port).await?;

        info!("Opening browser for Spotify login...");
        if webbrowser::open(authorize_url.as_str()).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                authorize_url
            );
        }

        info!("Waiting for authorization on {}:{}...", host, port);
        receiver.wait(self.config.callback_timeout).await
    }
}

/// Decides between the cached token, a refresh and a full login.
///
/// # Paths
///
/// 1. **Cached**: the record is still valid, it is returned as is and no
///    request is made.
/// 2. **Refresh**: the record expired, its refresh token is exchanged once.
/// 3. **Login**: nothing cached, the user goes through the browser flow. The
///    callback `state` is checked before the code is redeemed.
///
/// Every failure is final. An expired token is never handed out.
pub struct Authenticator<'a, E, P> {
    config: &'a Config,
    exchanger: E,
    prompt: P,
}

impl<'a> Authenticator<'a, TokenClient<'a>, BrowserPrompt<'a>> {
    /// Authenticator wired to the real token endpoint and the system browser.
    pub fn spotify(config: &'a Config) -> Self {
        Self::new(config, TokenClient::new(config), BrowserPrompt::new(config))
    }
}

impl<'a, E, P> Authenticator<'a, E, P>
where
    E: TokenExchange,
    P: AuthorizationPrompt,
{
    pub fn new(config: &'a Config, exchanger: E, prompt: P) -> Self {
        Self {
            config,
            exchanger,
            prompt,
        }
    }

    pub async fn get_access_token(
        &self,
        cached: Option<TokenRecord>,
    ) -> AuthResult<(String, TokenRecord)> {
        let record = match cached {
            Some(record) if record.is_valid_at(utils::now()) => {
                info!("Using cached access token");
                record
            }
            Some(record) => {
                info!("Access token expired, refreshing");
                self.exchanger.refresh(&record.refresh_token).await?
            }
            None => {
                info!("No cached token found");
                self.login().await?
            }
        };

        Ok((record.access_token.clone(), record))
    }

    /// Authorize URL for one login attempt.
    pub fn authorize_url(&self, state: &str) -> AuthResult<Url> {
        Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", self.config.scope.as_str()),
                ("state", state),
                ("show_dialog", "true"),
            ],
        )
        .map_err(|e| {
            AuthError::Config(format!(
                "invalid authorize url {}: {e}",
                self.config.auth_url
            ))
        })
    }

    async fn login(&self) -> AuthResult<TokenRecord> {
        let mut pending = PendingAuthorization::new(utils::generate_state());
        let url = self.authorize_url(&pending.state)?;

        let params = self.prompt.authorize(&url).await?;
        let code = pending.accept(params)?;
        success!("Authorization code received!");

        self.exchanger
            .exchange_code(&code, &self.config.redirect_uri)
            .await
    }
}

/// Cache-aware entry point for callers that just need a bearer token.
pub struct TokenSession<'a, E, P> {
    store: TokenStore,
    authenticator: Authenticator<'a, E, P>,
}

impl<'a> TokenSession<'a, TokenClient<'a>, BrowserPrompt<'a>> {
    pub fn spotify(config: &'a Config) -> Self {
        Self::new(
            TokenStore::new(config.token_path.clone()),
            Authenticator::spotify(config),
        )
    }
}

impl<'a, E, P> TokenSession<'a, E, P>
where
    E: TokenExchange,
    P: AuthorizationPrompt,
{
    pub fn new(store: TokenStore, authenticator: Authenticator<'a, E, P>) -> Self {
        Self {
            store,
            authenticator,
        }
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Loads the cache, resolves a token and persists the record if it changed.
    pub async fn access_token(&self) -> AuthResult<String> {
        let cached = self.store.load().await?;
        self.resolve(cached).await
    }

    /// Like [`access_token`](Self::access_token) but discards the cache first.
    pub async fn force_login(&self) -> AuthResult<String> {
        self.store.clear().await?;
        self.resolve(None).await
    }

    async fn resolve(&self, cached: Option<TokenRecord>) -> AuthResult<String> {
        let (token, record) = self
            .authenticator
            .get_access_token(cached.clone())
            .await?;

        if cached.as_ref() != Some(&record) {
            self.store.save(&record).await?;
        }

        Ok(token)
    }
}
