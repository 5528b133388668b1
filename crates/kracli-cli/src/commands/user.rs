//! User account commands.

use anyhow::Result;
use kracli_core::api::ApiClient;
use kracli_core::auth::Session;
use serde_json::Value;

/// `userinfo` prints the payload memoized during session validation when
/// available, so a validated session costs no extra round-trip.
pub async fn userinfo(client: &ApiClient, session: &Session) -> Result<i32> {
    let info: Option<Value> = match session.userinfo() {
        Some(info) => Some(info.clone()),
        None => client.user_info().await?.data().cloned(),
    };
    match info {
        Some(info) => {
            let pretty = serde_json::to_string_pretty(&info).unwrap_or_else(|_| info.to_string());
            println!("{}", pretty);
        }
        None => println!("null"),
    }
    Ok(0)
}
