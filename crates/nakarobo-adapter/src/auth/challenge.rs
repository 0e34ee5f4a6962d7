/*
[INPUT]:  Raw nonce/verify payloads and wallet signing failures
[OUTPUT]: Message to sign, session token, classified auth errors
[POS]:    Auth layer - response normalization for the login pipeline
[UPDATE]: When the backend changes nonce/verify response shapes
*/

use serde_json::Value;

use super::error::AuthError;
use super::wallet::WalletError;

/// One-time challenge issued by `/auth/nonce`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub nonce: String,
    pub message: Option<String>,
}

impl Challenge {
    /// Read `{nonce, message?}` at the top level, then inside `data`
    pub fn from_response(payload: &Value) -> Result<Self, AuthError> {
        let candidates = [Some(payload), payload.get("data")];

        for candidate in candidates.into_iter().flatten() {
            let Some(nonce) = non_empty_str(candidate.get("nonce")) else {
                continue;
            };
            return Ok(Self {
                nonce: nonce.to_string(),
                message: non_empty_str(candidate.get("message")).map(str::to_string),
            });
        }

        Err(AuthError::NonceUnavailable(
            "response did not contain a nonce".to_string(),
        ))
    }

    /// Backend message when provided, otherwise the fallback text
    pub fn message_to_sign(&self) -> String {
        match &self.message {
            Some(message) => message.clone(),
            None => fallback_message(&self.nonce),
        }
    }
}

/// Deterministic message used when the backend does not supply one
pub fn fallback_message(nonce: &str) -> String {
    format!(
        "Welcome to Nakarobo!\n\nPlease sign this message to verify your identity.\n\nNonce: {nonce}"
    )
}

/// Token from `{token}` or `{data:{token}}`, in that order
pub fn extract_token(payload: &Value) -> Option<String> {
    non_empty_str(payload.get("token"))
        .or_else(|| non_empty_str(payload.get("data").and_then(|data| data.get("token"))))
        .map(str::to_string)
}

/// Rejections mention "reject" in the provider's reason
pub fn classify_signing_failure(error: &WalletError) -> AuthError {
    if error.reason().to_lowercase().contains("reject") {
        AuthError::UserRejected
    } else {
        AuthError::SigningFailed(error.reason().to_string())
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({"nonce": "n1"}), "n1", None)]
    #[case(json!({"nonce": "n1", "message": "Sign n1"}), "n1", Some("Sign n1"))]
    #[case(json!({"data": {"nonce": "n2", "message": "Sign n2"}}), "n2", Some("Sign n2"))]
    #[case(json!({"nonce": "n3", "message": ""}), "n3", None)]
    fn test_challenge_shapes(
        #[case] payload: Value,
        #[case] nonce: &str,
        #[case] message: Option<&str>,
    ) {
        let challenge = Challenge::from_response(&payload).unwrap();
        assert_eq!(challenge.nonce, nonce);
        assert_eq!(challenge.message.as_deref(), message);
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({"nonce": ""}))]
    #[case(json!({"nonce": 42}))]
    #[case(json!({"data": {}}))]
    #[case(Value::Null)]
    fn test_missing_nonce(#[case] payload: Value) {
        let err = Challenge::from_response(&payload).unwrap_err();
        assert!(matches!(err, AuthError::NonceUnavailable(_)));
    }

    #[test]
    fn test_fallback_message_embeds_nonce() {
        let challenge = Challenge::from_response(&json!({"nonce": "n1"})).unwrap();
        let message = challenge.message_to_sign();
        assert!(message.starts_with("Welcome to Nakarobo!"));
        assert!(message.ends_with("Nonce: n1"));
    }

    #[test]
    fn test_backend_message_is_used_verbatim() {
        let challenge =
            Challenge::from_response(&json!({"nonce": "n1", "message": "exact text"})).unwrap();
        assert_eq!(challenge.message_to_sign(), "exact text");
    }

    #[rstest]
    #[case(json!({"token": "t"}), Some("t"))]
    #[case(json!({"data": {"token": "t"}}), Some("t"))]
    #[case(json!({"token": "top", "data": {"token": "nested"}}), Some("top"))]
    #[case(json!({"token": ""}), None)]
    #[case(json!({"data": {}}), None)]
    #[case(json!({}), None)]
    fn test_extract_token(#[case] payload: Value, #[case] expected: Option<&str>) {
        assert_eq!(extract_token(&payload).as_deref(), expected);
    }

    #[rstest]
    #[case("User rejected the request", true)]
    #[case("USER REJECTED", true)]
    #[case("Request was Rejected by user", true)]
    #[case("Ledger device locked", false)]
    #[case("", false)]
    fn test_classify_signing_failure(#[case] reason: &str, #[case] rejected: bool) {
        let err = classify_signing_failure(&WalletError::new(reason));
        if rejected {
            assert_eq!(err, AuthError::UserRejected);
        } else {
            assert_eq!(err, AuthError::SigningFailed(reason.to_string()));
        }
    }
}
