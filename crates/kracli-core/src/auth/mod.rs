//! Credential resolution and the session lifecycle.

pub mod credentials;
pub mod session;

pub use credentials::{CredentialError, Credentials};
pub use session::{AuthError, Session};
