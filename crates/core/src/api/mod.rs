//! Typed client for the tracker REST API.

/// HTTP client with one method per endpoint.
pub mod client;
/// Uniform `{success, code, message, data}` response wrapper.
pub mod envelope;

pub use client::{requires_login, ApiClient, GameQuery};
pub use envelope::Envelope;
