//! Login session lifecycle: restore on start, establish on login, clear on logout.

/// Shared session context handed to the API client and views.
pub mod context;
/// Durable credential persistence.
pub mod store;

pub use context::Session;
pub use store::{Credential, CredentialStore};
