use async_trait::async_trait;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::SessionToken;
use crate::domain::user::models::SignUpCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::AuthError;

/// Port for authentication domain service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user and issue a session token.
    ///
    /// # Arguments
    /// * `command` - Validated command containing name, email, and password
    ///
    /// # Returns
    /// Session token for the new user
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered (including a lost insert race)
    /// * `Password` - Hashing failed
    /// * `Token` - Token signing failed
    /// * `DatabaseError` - Database operation failed
    async fn sign_up(&self, command: SignUpCommand) -> Result<SessionToken, AuthError>;

    /// Verify credentials and issue a session token.
    ///
    /// # Arguments
    /// * `command` - Validated email and password
    ///
    /// # Returns
    /// Session token for the matching user
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<SessionToken, AuthError>;

    /// Resolve a bearer token to the user it was issued for.
    ///
    /// # Arguments
    /// * `token` - Raw token string from the Authorization header
    ///
    /// # Returns
    /// The current user record
    ///
    /// # Errors
    /// * `Unauthorized` - Token malformed, expired, foreign, or subject gone
    /// * `DatabaseError` - Database operation failed
    async fn get_profile(&self, token: &str) -> Result<User, AuthError>;

    /// Acknowledge a logout. Tokens are stateless, so nothing changes server-side.
    async fn logout(&self) -> Result<(), AuthError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// The uniqueness check and the insert are one atomic step.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, AuthError>;

    /// Retrieve user by identifier.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError>;

    /// Retrieve user by email address.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AuthError>;
}

/// Session token issuance and verification.
pub trait TokenSigner: Send + Sync + 'static {
    /// Sign a token carrying the user's id, name and email.
    ///
    /// # Errors
    /// * `Token` - Signing failed
    fn issue(&self, user: &User) -> Result<SessionToken, AuthError>;

    /// Check signature and expiry, returning the subject.
    ///
    /// # Errors
    /// * `Token` - Signature, algorithm, or expiry check failed
    /// * `InvalidUserId` - Subject is not a user identifier
    fn verify(&self, token: &str) -> Result<UserId, AuthError>;
}
