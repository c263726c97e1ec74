//! # CLI Module
//!
//! User-facing commands. Each command receives the [`Config`] built at
//! startup, delegates to [`crate::spotify`] and [`crate::management`], and
//! reports through the crate's output macros. Fatal errors end the process
//! via [`error!`](crate::error!).
//!
//! ## Commands
//!
//! - [`auth`] - Resolve a token, logging in through the browser if needed
//! - [`fetch`] - Dump audio features of recently played tracks to a file
//! - [`status`] - Show the cached token and whether it is still valid
//! - [`logout`] - Discard the cached token
//!
//! ## Usage
//!
//! ```bash
//! recentfeat auth                       # log in once
//! recentfeat fetch --output out.json    # reuses / refreshes the cached token
//! recentfeat status
//! recentfeat logout
//! ```
//!
//! [`Config`]: crate::config::Config

mod auth;
mod fetch;
mod status;

pub use auth::auth;
pub use auth::require_token;
pub use fetch::fetch;
pub use status::logout;
pub use status::status;
