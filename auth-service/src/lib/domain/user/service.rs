use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::OnceCell;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::Password;
use crate::domain::user::models::SessionToken;
use crate::domain::user::models::SignUpCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::AuthError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::TokenSigner;
use crate::user::ports::UserRepository;

/// Domain service implementation for authentication.
///
/// Concrete implementation of AuthServicePort; the store and the token
/// signer are injected through the constructor.
pub struct AuthService<UR, TS>
where
    UR: UserRepository,
    TS: TokenSigner,
{
    repository: Arc<UR>,
    token_signer: Arc<TS>,
    password_hasher: auth::PasswordHasher,
    // Verified against when the email is unknown, so both login failures cost one Argon2 verify.
    dummy_hash: OnceCell<String>,
}

const DUMMY_PASSWORD: &str = "placeholder-password-never-assigned";

impl<UR, TS> AuthService<UR, TS>
where
    UR: UserRepository,
    TS: TokenSigner,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `token_signer` - Session token issuance implementation
    pub fn new(repository: Arc<UR>, token_signer: Arc<TS>) -> Self {
        Self {
            repository,
            token_signer,
            password_hasher: auth::PasswordHasher::new(),
            dummy_hash: OnceCell::new(),
        }
    }

    /// Replace the default Argon2 cost parameters.
    pub fn with_password_hasher(mut self, password_hasher: auth::PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self.dummy_hash = OnceCell::new();
        self
    }

    async fn hash_password(&self, password: &Password) -> Result<String, AuthError> {
        self.hash_blocking(password.expose().to_owned()).await
    }

    // Argon2 is CPU-bound; keep it off the async workers.
    async fn hash_blocking(&self, password: String) -> Result<String, AuthError> {
        let hasher = self.password_hasher.clone();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(AuthError::from)
    }

    async fn verify_password(&self, password: &Password, hash: &str) -> Result<bool, AuthError> {
        let hasher = self.password_hasher.clone();
        let password = password.expose().to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| {
                AuthError::Unknown(format!("Password verification task failed: {}", e))
            })?
            .map_err(AuthError::from)
    }
}

#[async_trait]
impl<UR, TS> AuthServicePort for AuthService<UR, TS>
where
    UR: UserRepository,
    TS: TokenSigner,
{
    async fn sign_up(&self, command: SignUpCommand) -> Result<SessionToken, AuthError> {
        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            tracing::warn!(email = %command.email, "Sign-up rejected: email already registered");
            return Err(AuthError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self.hash_password(&command.password).await?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            name: command.name,
            email: command.email,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        // A concurrent sign-up may win between the lookup and the insert;
        // the store reports that as EmailAlreadyExists too.
        let created_user = self.repository.create(user).await.map_err(|e| {
            if let AuthError::EmailAlreadyExists(email) = &e {
                tracing::warn!(email = %email, "Sign-up lost insert race on email");
            }
            e
        })?;

        let token = self.token_signer.issue(&created_user)?;

        tracing::info!(
            user_id = %created_user.id,
            email = %created_user.email,
            "User registration successful"
        );

        Ok(token)
    }

    async fn login(&self, command: LoginCommand) -> Result<SessionToken, AuthError> {
        let user = match self.repository.find_by_email(&command.email).await? {
            Some(user) => user,
            None => {
                let dummy_hash = self
                    .dummy_hash
                    .get_or_try_init(|| self.hash_blocking(DUMMY_PASSWORD.to_owned()))
                    .await?;
                self.verify_password(&command.password, dummy_hash).await?;

                tracing::warn!(email = %command.email, reason = "unknown_email", "Login failed");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self
            .verify_password(&command.password, &user.password_hash)
            .await?
        {
            tracing::warn!(email = %command.email, reason = "wrong_password", "Login failed");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.token_signer.issue(&user)?;

        tracing::info!(user_id = %user.id, email = %user.email, "User login successful");

        Ok(token)
    }

    async fn get_profile(&self, token: &str) -> Result<User, AuthError> {
        let user_id = self.token_signer.verify(token).map_err(|e| {
            tracing::warn!(error = %e, "Token verification failed");
            AuthError::Unauthorized
        })?;

        self.repository
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(user_id = %user_id, "Token subject no longer exists");
                AuthError::Unauthorized
            })
    }

    async fn logout(&self) -> Result<(), AuthError> {
        tracing::debug!("Logout acknowledged; token discarded client-side");
        Ok(())
    }
}
