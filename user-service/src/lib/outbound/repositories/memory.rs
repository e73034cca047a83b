use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// User directory kept in process memory.
///
/// Ids are never reused, even after the user holding one is deleted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<Directory>>,
}

#[derive(Debug, Default)]
struct Directory {
    users: BTreeMap<UserId, User>,
    last_id: i64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory pre-populated with `users`, keyed by their own ids.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users: BTreeMap<UserId, User> =
            users.into_iter().map(|user| (user.id, user)).collect();
        let last_id = users.keys().next_back().map_or(0, |id| id.0.max(0));
        Self {
            state: Arc::new(RwLock::new(Directory { users, last_id })),
        }
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.users.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut state = self.state.write().await;

        let next_id = state
            .last_id
            .checked_add(1)
            .ok_or_else(|| UserError::DatabaseError("User id space exhausted".to_string()))?;

        let user = user.with_id(UserId(next_id));
        state.last_id = next_id;
        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.state.read().await.users.get(id).cloned())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.state.write().await.users.remove(id);
        Ok(())
    }
}
