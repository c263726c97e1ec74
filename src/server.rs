use std::{net::SocketAddr, time::Duration};

use axum::{Extension, Router, routing::get};
use tokio::net::TcpListener;

use crate::{
    api::{self, CallbackSlot},
    error::{AuthError, AuthResult},
    types::CallbackParams,
};

/// Single-shot listener for the provider redirect.
///
/// Bind it before sending the user to the authorize page, then [`wait`]
/// for the one request it will ever serve.
///
/// [`wait`]: CallbackReceiver::wait
pub struct CallbackReceiver {
    listener: TcpListener,
    slot: CallbackSlot,
}

impl CallbackReceiver {
    pub async fn bind(host: &str, port: u16) -> AuthResult<Self> {
        let listener = TcpListener::bind((host, port))
            .await
            .map_err(|source| AuthError::CallbackBind {
                addr: format!("{host}:{port}"),
                source,
            })?;

        Ok(Self {
            listener,
            slot: CallbackSlot::default(),
        })
    }

    pub fn local_addr(&self) -> AuthResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves until the first request has been answered, then stops.
    ///
    /// Any path is accepted. With `timeout` set, gives up after that long
    /// without a request.
    pub async fn wait(self, timeout: Option<Duration>) -> AuthResult<CallbackParams> {
        let CallbackReceiver { listener, slot } = self;

        let app = Router::new()
            .route("/", get(api::callback))
            .route("/{*path}", get(api::callback))
            .layer(Extension(slot.clone()));

        let captured = slot.captured.clone();
        let serve = axum::serve(listener, app)
            .with_graceful_shutdown(async move { captured.notified().await });

        match timeout {
            Some(limit) => tokio::time::timeout(limit, serve)
                .await
                .map_err(|_| AuthError::CallbackTimeout)??,
            None => serve.await?,
        }

        slot.params
            .lock()
            .await
            .take()
            .ok_or_else(|| AuthError::Callback("server stopped without a request".to_string()))
    }
}
