use async_trait::async_trait;

use super::{NewUser, User};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Fails with `Conflict` if the username is taken.
    async fn create(&self, user: NewUser) -> DomainResult<User>;

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;
    async fn count(&self) -> DomainResult<u64>;
}
