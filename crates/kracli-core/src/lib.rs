//! Core library for the kra.sk command-line client.
//!
//! This crate carries everything below the command surface:
//!
//! - `config`: the INI configuration file holding credentials and the
//!   persisted session
//! - `auth`: credential resolution and the session lifecycle
//! - `api`: the JSON envelope client for the storage API
//! - `models`: typed request payloads and the response envelope
//! - `transfer`: streaming downloads and TUS resumable uploads

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod transfer;

pub use api::{ApiClient, ApiError};
pub use config::Config;
