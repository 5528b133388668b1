//! Envelope client for the kra.sk storage API.
//!
//! Authentication is a session id carried in the request envelope,
//! obtained through `user/login` and persisted in the configuration
//! file between runs.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
