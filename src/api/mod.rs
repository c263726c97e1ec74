//! # API Module
//!
//! HTTP handlers for the local redirect listener used during interactive
//! login. The provider sends the user's browser back to the registered
//! redirect URI with `code` and `state` (or `error`) in the query string;
//! [`callback`] records those for the waiting receiver.
//!
//! The handler answers `200` with a short HTML page when a code is present
//! and `400` with an empty body otherwise. See [`crate::server`] for the
//! single-shot server around it.

mod callback;

pub use callback::CallbackSlot;
pub use callback::callback;
