//! Session lifecycle: validate the stored session id or log in and
//! persist the fresh one.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::api::ApiClient;
use crate::config::Config;
use crate::models::Envelope;

use super::Credentials;

/// Sessions older than this skip the validation round-trip and go
/// straight to re-login.
const SESSION_STALE_DAYS: i64 = 30;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The login endpoint answered without `success` plus `session_id`.
    /// Carries the envelope so the caller can render it.
    #[error("Login rejected by the service")]
    Rejected(Envelope),
}

/// An established session plus the user info fetched while validating it.
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub created: Option<DateTime<Utc>>,
    userinfo: Option<Value>,
}

impl Session {
    /// User info payload memoized during validation, if any.
    pub fn userinfo(&self) -> Option<&Value> {
        self.userinfo.as_ref()
    }
}

fn is_stale(created: Option<DateTime<Utc>>) -> bool {
    // An entry without a stamp is honored (hand-edited files).
    match created {
        Some(created) => Utc::now() - created > Duration::days(SESSION_STALE_DAYS),
        None => false,
    }
}

/// Validate the stored session or log in with resolved credentials.
///
/// `credentials` is only invoked when a login is actually needed, which
/// lets the CLI defer its interactive prompt until then. A successful
/// login is persisted to the configuration file.
pub async fn establish<F>(
    client: &mut ApiClient,
    config: &mut Config,
    credentials: F,
) -> Result<Session>
where
    F: FnOnce(&Config) -> Result<Credentials>,
{
    if let Some(id) = config.session_id() {
        let created = config.session_created();
        if is_stale(created) {
            debug!("stored session past staleness window, logging in again");
        } else {
            client.set_session(&id);
            let ret = client.user_info().await?;
            if let Some(data) = ret.data() {
                debug!("stored session validated");
                return Ok(Session {
                    id,
                    created,
                    userinfo: Some(data.clone()),
                });
            }
            debug!("stored session no longer accepted, logging in again");
            client.clear_session();
        }
    }

    let creds = credentials(config)?;
    let ret = client.login(&creds.username, &creds.password).await?;
    if ret.has_success() {
        if let Some(id) = ret.session_id().map(str::to_owned) {
            config.set_session(&id);
            config.save()?;
            client.set_session(&id);
            return Ok(Session {
                id,
                created: Some(Utc::now()),
                userinfo: None,
            });
        }
    }
    Err(AuthError::Rejected(ret).into())
}
