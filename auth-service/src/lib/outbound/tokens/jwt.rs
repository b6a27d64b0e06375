use auth::Claims;
use auth::JwtHandler;

use crate::domain::user::models::SessionToken;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::TokenSigner;
use crate::user::errors::AuthError;

/// HS256 session tokens backed by the shared `auth` library.
pub struct JwtTokenSigner {
    handler: JwtHandler,
    expiration_hours: i64,
}

impl JwtTokenSigner {
    /// # Arguments
    /// * `secret` - Server-held signing secret
    /// * `expiration_hours` - Token lifetime
    pub fn new(secret: &[u8], expiration_hours: i64) -> Self {
        Self {
            handler: JwtHandler::new(secret),
            expiration_hours,
        }
    }
}

impl TokenSigner for JwtTokenSigner {
    fn issue(&self, user: &User) -> Result<SessionToken, AuthError> {
        let claims = Claims::for_user(
            user.id,
            user.name.as_str(),
            user.email.as_str(),
            self.expiration_hours,
        )?;

        Ok(SessionToken(self.handler.encode(&claims)?))
    }

    fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        let claims: Claims = self.handler.decode(token)?;
        Ok(UserId::from_string(&claims.sub)?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::UserName;

    const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

    fn user() -> User {
        let now = Utc::now();
        User {
            id: UserId::new(),
            name: UserName::new("Jo Doe".to_string()).unwrap(),
            email: EmailAddress::new("jo@x.com".to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_issue_then_verify() {
        let signer = JwtTokenSigner::new(SECRET, 24);
        let user = user();

        let token = signer.issue(&user).unwrap();
        assert_eq!(signer.verify(token.as_str()).unwrap(), user.id);
    }

    #[test]
    fn test_token_carries_identity_claims() {
        let signer = JwtTokenSigner::new(SECRET, 24);
        let user = user();
        let token = signer.issue(&user).unwrap();

        let claims: Claims = JwtHandler::new(SECRET).decode(token.as_str()).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.name, "Jo Doe");
        assert_eq!(claims.email, "jo@x.com");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_rejects_foreign_secret() {
        let issuer = JwtTokenSigner::new(b"another-secret-key-also-at-least-32-bytes", 24);
        let verifier = JwtTokenSigner::new(SECRET, 24);

        let token = issuer.issue(&user()).unwrap();
        assert!(matches!(
            verifier.verify(token.as_str()),
            Err(AuthError::Token(auth::JwtError::InvalidToken(_)))
        ));
    }

    #[test]
    fn test_rejects_expired() {
        let signer = JwtTokenSigner::new(SECRET, -1);

        let token = signer.issue(&user()).unwrap();
        assert!(matches!(
            signer.verify(token.as_str()),
            Err(AuthError::Token(auth::JwtError::TokenExpired))
        ));
    }

    #[test]
    fn test_issue_with_unrepresentable_lifetime_fails() {
        let signer = JwtTokenSigner::new(SECRET, 10_000_000_000);

        assert!(matches!(
            signer.issue(&user()),
            Err(AuthError::Token(auth::JwtError::InvalidExpiration(_)))
        ));
    }

    #[test]
    fn test_rejects_non_uuid_subject() {
        let handler = JwtHandler::new(SECRET);
        let token = handler
            .encode(&Claims::for_user("not-a-uuid", "Jo Doe", "jo@x.com", 1).unwrap())
            .unwrap();

        let result = JwtTokenSigner::new(SECRET, 24).verify(&token);
        assert!(matches!(result, Err(AuthError::InvalidUserId(_))));
    }
}
