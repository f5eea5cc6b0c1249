use async_trait::async_trait;

use super::{NewUser, User};
use crate::errors::Result;

/// User directory contract.
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    async fn create(&self, new_user: NewUser) -> Result<User>;

    /// Ids of every known user, in a stable order.
    fn list_user_ids(&self) -> Result<Vec<String>>;

    fn exists(&self, user_id: &str) -> Result<bool>;

    fn get_by_id(&self, user_id: &str) -> Result<User>;

    /// Overwrites the user's primary public key.
    async fn set_primary_public_key(&self, user_id: &str, public_key: &str) -> Result<()>;
}
