//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait`, so it can be built from a
//! `DatabaseConnection` or a transaction handle.

use anyhow::Context;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, Order, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::contract::model::{Exercise, User, UserSummary};
use crate::domain::repo::UsersRepository;
use crate::infra::storage::entity::{exercise, user};
use crate::infra::storage::mapper;

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    async fn load_log(&self, user_id: Uuid) -> anyhow::Result<Vec<exercise::Model>> {
        exercise::Entity::find()
            .filter(exercise::Column::UserId.eq(user_id))
            .order_by_asc(exercise::Column::Id)
            .all(&self.conn)
            .await
            .context("load_log failed")
    }
}

#[async_trait::async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, u: User) -> anyhow::Result<()> {
        let m = user::ActiveModel {
            id: Set(u.id),
            username: Set(u.username),
            created_at: Set(u.created_at),
        };
        let _ = m.insert(&self.conn).await.context("insert failed")?;
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<UserSummary>> {
        // rowid follows insertion order, created_at may tie
        let rows = user::Entity::find()
            .order_by(Expr::cust("rowid"), Order::Asc)
            .all(&self.conn)
            .await
            .context("list failed")?;
        Ok(rows.into_iter().map(mapper::user_to_summary).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let Some(found) = user::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?
        else {
            return Ok(None);
        };
        let log = self.load_log(id).await?;
        Ok(Some(mapper::user_to_contract(found, log)))
    }

    async fn append_exercise(
        &self,
        user_id: Uuid,
        exercise: Exercise,
    ) -> anyhow::Result<Option<User>> {
        let Some(owner) = user::Entity::find_by_id(user_id)
            .one(&self.conn)
            .await
            .context("append_exercise lookup failed")?
        else {
            return Ok(None);
        };

        let m = exercise::ActiveModel {
            user_id: Set(user_id),
            description: Set(exercise.description),
            duration: Set(exercise.duration),
            date: Set(exercise.date),
            ..Default::default()
        };
        let _ = m
            .insert(&self.conn)
            .await
            .context("append_exercise insert failed")?;

        let log = self.load_log(user_id).await?;
        Ok(Some(mapper::user_to_contract(owner, log)))
    }
}
