use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{Exercise, User, UserSummary};

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
///
/// Every mutation must be visible to subsequent reads on the same repository
/// once the returned future resolves.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Insert a fully-formed domain user.
    ///
    /// Service computes id/timestamps/validation; repo persists.
    async fn insert(&self, user: User) -> anyhow::Result<()>;
    /// All users in creation order, without their logs.
    async fn list(&self) -> anyhow::Result<Vec<UserSummary>>;
    /// Load a user by id, including the full log in insertion order.
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Append to the end of the user's log and return the updated user.
    /// `None` if the user does not exist.
    async fn append_exercise(&self, user_id: Uuid, exercise: Exercise)
        -> anyhow::Result<Option<User>>;
}
