use serde::Deserialize;

use super::error::AuthError;
use crate::traits::AuthResponse;

/// Success body of `/login` (`{token}`) and `/register` (`{token, id}`).
#[derive(Debug, Deserialize)]
pub struct TokenBody {
    pub token: Option<String>,
    pub id: Option<serde_json::Value>,
}

/// Rejection body, e.g. `{"error": "user not found"}`.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}

impl TokenBody {
    pub fn into_auth_response(self) -> Result<AuthResponse, AuthError> {
        let token = self
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::MalformedResponse("no token received".into()))?;

        // Some mock backends return the id as a string.
        let id = self.id.and_then(|v| match v {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => s.parse().ok(),
            _ => None,
        });

        Ok(AuthResponse { token, id })
    }
}

/// Pull the `error` field out of a rejection body, falling back to the raw text.
pub fn rejection_reason(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| body.to_owned())
}
