/*
[INPUT]:  Raw JSON response bodies
[OUTPUT]: Unwrapped payloads or typed envelope errors
[POS]:    HTTP layer - `{code, data, error}` response normalization
[UPDATE]: When the backend envelope format changes
*/

use serde_json::Value;

use crate::http::NakaroboError;

/// Envelope code the backend uses for an expired or missing session
pub const UNAUTHORIZED_CODE: i64 = 401;

/// Outcome of inspecting a response body
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// `code == 0`, or no `code` field at all (legacy responses)
    Success(Value),
    /// `code == 401`
    Unauthorized { message: String },
    /// Any other non-zero code
    Failure { code: i64, message: String },
}

impl Envelope {
    /// Classify a response body.
    ///
    /// Only objects carrying a `code` key are treated as envelopes; everything
    /// else is passed through untouched.
    pub fn parse(payload: Value) -> Self {
        let Value::Object(mut map) = payload else {
            return Envelope::Success(payload);
        };
        let Some(code) = map.get("code").cloned() else {
            return Envelope::Success(Value::Object(map));
        };

        match code.as_i64() {
            Some(0) => Envelope::Success(map.remove("data").unwrap_or(Value::Null)),
            Some(UNAUTHORIZED_CODE) => Envelope::Unauthorized {
                message: error_message(&map),
            },
            Some(code) => Envelope::Failure {
                code,
                message: error_message(&map),
            },
            // A non-numeric code is still an error envelope.
            None => Envelope::Failure {
                code: -1,
                message: error_message(&map),
            },
        }
    }

    /// Convert into the payload, or the matching client error
    pub fn into_result(self) -> Result<Value, NakaroboError> {
        match self {
            Envelope::Success(data) => Ok(data),
            Envelope::Unauthorized { .. } => Err(NakaroboError::AuthorizationExpired),
            Envelope::Failure { code, message } => Err(NakaroboError::Api { code, message }),
        }
    }
}

fn error_message(map: &serde_json::Map<String, Value>) -> String {
    match map.get("error") {
        Some(Value::String(message)) if !message.is_empty() => message.clone(),
        Some(Value::Object(inner)) => inner
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Request failed")
            .to_string(),
        _ => "Request failed".to_string(),
    }
}

/// Pull a human-readable message out of an error body that may or may not be an envelope
pub(crate) fn message_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let map = value.as_object()?;
    ["error", "message"].iter().find_map(|key| match map.get(*key) {
        Some(Value::String(message)) if !message.is_empty() => Some(message.clone()),
        Some(Value::Object(inner)) => inner
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    })
}

/// Envelope code carried by an error body, if any
pub(crate) fn code_from_body(body: &str) -> Option<i64> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("code").and_then(Value::as_i64)
}
