// src/auth.rs

use axum::http::HeaderMap;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ApiError;

/// An authenticated caller.
#[derive(Clone, Debug)]
pub struct Session {
    pub user_id: String,
}

/// Verifies bearer tokens against the map handed over at startup. Session
/// issuance lives elsewhere; this server only checks membership.
#[derive(Clone, Default)]
pub struct SessionVerifier {
    tokens: Arc<HashMap<String, String>>,
}

impl SessionVerifier {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self {
            tokens: Arc::new(tokens),
        }
    }

    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Session, ApiError> {
        let token = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized)?;

        match self.tokens.get(token) {
            Some(user_id) => Ok(Session {
                user_id: user_id.clone(),
            }),
            None => Err(ApiError::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn verifier() -> SessionVerifier {
        SessionVerifier::new(HashMap::from([(
            "secret-token".to_string(),
            "user-1".to_string(),
        )]))
    }

    #[test]
    fn valid_bearer_token_authenticates() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer secret-token"),
        );
        let session = verifier().authenticate(&headers).unwrap();
        assert_eq!(session.user_id, "user-1");
    }

    #[test]
    fn missing_or_unknown_token_is_unauthorized() {
        let headers = HeaderMap::new();
        assert!(verifier().authenticate(&headers).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer wrong"),
        );
        assert!(verifier().authenticate(&headers).is_err());
    }
}
