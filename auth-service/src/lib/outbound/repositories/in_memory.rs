use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::AuthError;

/// Process-local user store.
///
/// Used when no database is configured and by the integration tests.
/// Records live in a map keyed by id plus an email index; both are only
/// touched under the same write lock.
#[derive(Default)]
pub struct InMemoryUserRepository {
    inner: RwLock<Store>,
}

#[derive(Default)]
struct Store {
    users: HashMap<UserId, User>,
    by_email: HashMap<EmailAddress, UserId>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, AuthError> {
        let mut store = self.inner.write().await;

        if store.by_email.contains_key(&user.email) {
            return Err(AuthError::EmailAlreadyExists(user.email.to_string()));
        }

        store.by_email.insert(user.email.clone(), user.id);
        store.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError> {
        Ok(self.inner.read().await.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AuthError> {
        let store = self.inner.read().await;

        Ok(store
            .by_email
            .get(email)
            .and_then(|id| store.users.get(id))
            .cloned())
    }
}
