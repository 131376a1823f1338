//! JWT verification.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AuthError, AuthResult};

/// Claims carried by the backend's session tokens.
///
/// `role` and `name` are advisory only; the directory is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The user's directory ID.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

impl Claims {
    /// Claims for a token expiring `ttl_secs` from now.
    pub fn new(id: impl Into<String>, ttl_secs: i64) -> Self {
        Self {
            id: id.into(),
            role: None,
            name: None,
            exp: chrono::Utc::now().timestamp() + ttl_secs,
        }
    }
}

/// Verifies HS256 session tokens against the shared backend secret.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Verifies a token and returns its claims.
    ///
    /// A blank token is refused outright; any verification failure
    /// (signature, shape, expiry) collapses to [`AuthError::InvalidToken`]
    /// so the close reason never leaks which check failed.
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        if token.trim().is_empty() {
            return Err(AuthError::MissingToken);
        }
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|err| {
            debug!(error = %err, "token verification failed");
            AuthError::InvalidToken
        })?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn mint(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn verifies_valid_token() {
        let verifier = TokenVerifier::new(SECRET);
        let token = mint(&Claims::new("u-1", 3600), SECRET);

        let claims = verifier.verify(&token).unwrap();
        assert_eq!(claims.id, "u-1");
    }

    #[test]
    fn rejects_blank_token() {
        let verifier = TokenVerifier::new(SECRET);
        assert_eq!(verifier.verify("").unwrap_err(), AuthError::MissingToken);
        assert_eq!(verifier.verify("   ").unwrap_err(), AuthError::MissingToken);
    }

    #[test]
    fn rejects_wrong_secret() {
        let verifier = TokenVerifier::new(SECRET);
        let token = mint(&Claims::new("u-1", 3600), "other-secret");
        assert_eq!(verifier.verify(&token).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn rejects_expired_token() {
        let verifier = TokenVerifier::new(SECRET);
        let token = mint(&Claims::new("u-1", -3600), SECRET);
        assert_eq!(verifier.verify(&token).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn rejects_garbage() {
        let verifier = TokenVerifier::new(SECRET);
        assert_eq!(
            verifier.verify("not.a.token").unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn carries_optional_role_and_name() {
        let mut claims = Claims::new("u-2", 3600);
        claims.role = Some("Admin".to_string());
        claims.name = Some("Avery".to_string());
        let verifier = TokenVerifier::new(SECRET);

        let back = verifier.verify(&mint(&claims, SECRET)).unwrap();
        assert_eq!(back.role.as_deref(), Some("Admin"));
        assert_eq!(back.name.as_deref(), Some("Avery"));
    }
}
