use thiserror::Error;

/// Maximum length for response bodies carried in error messages
const MAX_ERROR_BODY_LEN: usize = 500;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to serialize request payload: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The body was not a JSON object. The service signals errors inside
    /// the envelope, so anything unparsable is reported with its HTTP
    /// status and (truncated) text.
    #[error("Invalid response (status {status}): {body}")]
    InvalidResponse {
        status: reqwest::StatusCode,
        body: String,
    },
}

impl ApiError {
    pub(crate) fn invalid_response(status: reqwest::StatusCode, body: &str) -> Self {
        ApiError::InvalidResponse {
            status,
            body: truncate_body(body),
        }
    }
}

/// Truncate a response body to avoid carrying excessive data in errors.
/// The cut backs up to a char boundary so multibyte text cannot panic.
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LEN {
        return body.to_string();
    }
    let mut cut = MAX_ERROR_BODY_LEN;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    format!(
        "{}... (truncated, {} total bytes)",
        &body[..cut],
        body.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_pass_through() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(600);
        let truncated = truncate_body(&body);
        assert!(truncated.starts_with(&"x".repeat(500)));
        assert!(truncated.ends_with("(truncated, 600 total bytes)"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // "é" is two bytes, so the limit lands mid-character.
        let body = format!("{}{}", "x".repeat(499), "é".repeat(20));
        let truncated = truncate_body(&body);
        assert!(truncated.starts_with(&"x".repeat(499)));
        assert!(truncated.ends_with("(truncated, 539 total bytes)"));
    }
}
