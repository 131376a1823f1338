//! The handshake's identity resolution step.

use tracing::debug;

use tracker_core::{Role, UserId};

use crate::directory::UserDirectory;
use crate::error::{AuthError, AuthResult};
use crate::token::TokenVerifier;

/// The trusted identity a successful handshake yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub user_id: UserId,
    pub role: Role,
    pub display_name: String,
}

/// Verifies `token` and resolves the subject against the directory.
///
/// Role and display name come from the directory profile, never from the
/// token; a profile with a blank name falls back to the token's `name`
/// claim and then to `"User"`.
pub async fn resolve_identity(
    verifier: &TokenVerifier,
    directory: &dyn UserDirectory,
    token: &str,
) -> AuthResult<ResolvedIdentity> {
    let claims = verifier.verify(token)?;
    let user_id = UserId::from_string(&claims.id);

    let profile = directory
        .find(&user_id)
        .await
        .ok_or(AuthError::UserNotFound)?;

    let display_name = if profile.name.trim().is_empty() {
        claims.name.clone().unwrap_or_else(|| "User".to_string())
    } else {
        profile.name.clone()
    };

    debug!(user_id = %user_id, role = %profile.role, "identity resolved");
    Ok(ResolvedIdentity {
        user_id,
        role: profile.role,
        display_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::InMemoryUserDirectory;
    use crate::token::Claims;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use tracker_core::UserSnapshot;

    const SECRET: &str = "test-secret";

    fn mint(claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn resolves_profile_from_directory() {
        let verifier = TokenVerifier::new(SECRET);
        let directory = InMemoryUserDirectory::new();
        directory
            .upsert(UserSnapshot::new("u-1", "Avery", Role::Manager))
            .await;

        // Token claims a stale role; the directory wins.
        let mut claims = Claims::new("u-1", 3600);
        claims.role = Some("member".to_string());
        claims.name = Some("Old Name".to_string());

        let identity = resolve_identity(&verifier, &directory, &mint(&claims))
            .await
            .unwrap();
        assert_eq!(identity.user_id, UserId::from_string("u-1"));
        assert_eq!(identity.role, Role::Manager);
        assert_eq!(identity.display_name, "Avery");
    }

    #[tokio::test]
    async fn unknown_subject_is_refused() {
        let verifier = TokenVerifier::new(SECRET);
        let directory = InMemoryUserDirectory::new();

        let err = resolve_identity(&verifier, &directory, &mint(&Claims::new("ghost", 3600)))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::UserNotFound);
        assert_eq!(err.to_string(), "User not found");
    }

    #[tokio::test]
    async fn blank_profile_name_falls_back_to_claims() {
        let verifier = TokenVerifier::new(SECRET);
        let directory = InMemoryUserDirectory::new();
        directory
            .upsert(UserSnapshot::new("u-1", "  ", Role::Member))
            .await;

        let mut claims = Claims::new("u-1", 3600);
        claims.name = Some("Kai".to_string());

        let identity = resolve_identity(&verifier, &directory, &mint(&claims))
            .await
            .unwrap();
        assert_eq!(identity.display_name, "Kai");
    }

    #[tokio::test]
    async fn missing_token_uses_authentication_error_message() {
        let verifier = TokenVerifier::new(SECRET);
        let directory = InMemoryUserDirectory::new();

        let err = resolve_identity(&verifier, &directory, "").await.unwrap_err();
        assert_eq!(err.to_string(), "Authentication error");
    }
}
