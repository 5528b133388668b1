//! Typed request payloads and the response envelope of the kra.sk API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A kra.sk API response.
///
/// The service signals outcomes through key *presence* (`success`,
/// `error`, `msg`, `data`), so the envelope keeps the raw object and
/// answers presence queries instead of deserializing into a fixed shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Envelope(serde_json::Map<String, Value>);

impl Envelope {
    pub fn data(&self) -> Option<&Value> {
        self.0.get("data")
    }

    pub fn msg(&self) -> Option<&Value> {
        self.0.get("msg")
    }

    pub fn has_success(&self) -> bool {
        self.0.contains_key("success")
    }

    pub fn has_error(&self) -> bool {
        self.0.contains_key("error")
    }

    /// Top-level session id, present on `user/login` responses.
    pub fn session_id(&self) -> Option<&str> {
        self.0.get("session_id").and_then(Value::as_str)
    }

    /// String field of the `data` object, e.g. `ident` or `link`.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data()?.get(key)?.as_str()
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `file/list`. `ident` carries the parent folder to list.
#[derive(Debug, Default, Serialize)]
pub struct ListRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ident: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// `file/info` and `file/download`.
#[derive(Debug, Serialize)]
pub struct IdentRequest {
    pub ident: String,
}

/// `file/create`. With `folder: false` this makes a fileslot that a TUS
/// upload later attaches content to.
#[derive(Debug, Serialize)]
pub struct CreateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub folder: bool,
    pub shared: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// `file/copy`. `password` opens the source, `newpassword` protects the
/// copy.
#[derive(Debug, Serialize)]
pub struct CopyRequest {
    pub ident: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub shared: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newpassword: Option<String>,
}

/// `file/delete`.
#[derive(Debug, Serialize)]
pub struct DeleteRequest {
    pub ident: String,
    pub recursive: bool,
}

/// `file/update`. `password` is tri-state: `None` leaves it unchanged,
/// `Some(None)` serializes as `null` and unsets it, `Some(Some(_))`
/// sets it.
#[derive(Debug, Serialize)]
pub struct UpdateRequest {
    pub ident: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_probes_key_presence() {
        let envelope: Envelope =
            serde_json::from_value(json!({"success": 1, "session_id": "abc"})).unwrap();
        assert!(envelope.has_success());
        assert!(!envelope.has_error());
        assert_eq!(envelope.session_id(), Some("abc"));
        assert_eq!(envelope.data(), None);
    }

    #[test]
    fn envelope_data_str() {
        let envelope: Envelope =
            serde_json::from_value(json!({"data": {"ident": "x1", "size": 5}})).unwrap();
        assert_eq!(envelope.data_str("ident"), Some("x1"));
        assert_eq!(envelope.data_str("size"), None);
        assert_eq!(envelope.data_str("link"), None);
    }

    #[test]
    fn list_request_skips_absent_fields() {
        let request = ListRequest {
            ident: Some("folder1".into()),
            filter: None,
            kind: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"ident": "folder1"})
        );
    }

    #[test]
    fn update_password_tristate() {
        let unchanged = UpdateRequest {
            ident: "i".into(),
            name: None,
            parent: None,
            shared: None,
            password: None,
        };
        assert_eq!(serde_json::to_value(&unchanged).unwrap(), json!({"ident": "i"}));

        let unset = UpdateRequest {
            ident: "i".into(),
            name: None,
            parent: None,
            shared: None,
            password: Some(None),
        };
        assert_eq!(
            serde_json::to_value(&unset).unwrap(),
            json!({"ident": "i", "password": null})
        );

        let set = UpdateRequest {
            ident: "i".into(),
            name: None,
            parent: None,
            shared: Some(false),
            password: Some(Some("secret".into())),
        };
        assert_eq!(
            serde_json::to_value(&set).unwrap(),
            json!({"ident": "i", "shared": false, "password": "secret"})
        );
    }

    #[test]
    fn create_request_shape() {
        let request = CreateRequest {
            name: "docs".into(),
            parent: None,
            folder: true,
            shared: false,
            password: Some("p".into()),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"name": "docs", "folder": true, "shared": false, "password": "p"})
        );
    }
}
