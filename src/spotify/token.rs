use std::future::Future;

use reqwest::{Client, header::AUTHORIZATION};

use crate::{
    config::Config,
    error::{AuthError, AuthResult},
    types::{TokenRecord, TokenResponse},
    utils,
};

/// Turns authorization codes and refresh tokens into [`TokenRecord`]s.
pub trait TokenExchange {
    /// Redeems an authorization code. `redirect_uri` must be the exact value
    /// sent with the authorize request.
    fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> impl Future<Output = AuthResult<TokenRecord>> + Send;

    /// Obtains a fresh access token. Keeps `refresh_token` when the provider
    /// does not rotate it.
    fn refresh(&self, refresh_token: &str) -> impl Future<Output = AuthResult<TokenRecord>> + Send;
}

/// Token endpoint client using HTTP Basic client credentials.
pub struct TokenClient<'a> {
    config: &'a Config,
    client: Client,
}

impl<'a> TokenClient<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    async fn request(
        &self,
        form: &[(&str, &str)],
        fallback_refresh: Option<&str>,
    ) -> AuthResult<TokenRecord> {
        let res = self
            .client
            .post(&self.config.token_url)
            .header(
                AUTHORIZATION,
                utils::basic_auth_header(&self.config.client_id, &self.config.client_secret),
            )
            .form(form)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        let received_at = utils::now();

        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let response: TokenResponse = match serde_json::from_str(&body) {
            Ok(r) => r,
            Err(_) => {
                return Err(AuthError::Rejected {
                    status: status.as_u16(),
                    body,
                });
            }
        };

        if response.access_token.is_none() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        TokenRecord::from_response(response, fallback_refresh, received_at)
    }
}

impl TokenExchange for TokenClient<'_> {
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> AuthResult<TokenRecord> {
        self.request(
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ],
            None,
        )
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenRecord> {
        self.request(
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ],
            Some(refresh_token),
        )
        .await
    }
}
