//! # Reelhub Users Crate
//!
//! Collaborator services the chat core consumes: display-profile lookup for
//! the connect-time snapshot, and bearer-token session validation. Account
//! management and credential issuance live in the surrounding application.

pub mod services;
pub mod types;

pub use services::{ProfileService, ProfileStore, SessionService, SessionStore};
pub use types::errors::{AuthError, AuthResult, UserError, UserResult};
