//! User collaborator services.

pub mod profile_service;
pub mod session_service;

pub use profile_service::{ProfileService, ProfileStore};
pub use session_service::{SessionService, SessionStore};
