//! Authentication module
//!
//! Supports: Trello key/token pairs (query parameters or OAuth header) and
//! plain bearer tokens.
//!
//! Tokens are acquired outside this crate and only ever read here; the
//! `Authenticator` attaches them to each outgoing request.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, AuthToken, Location};
