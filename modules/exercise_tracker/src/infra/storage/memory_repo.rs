//! Transient repository: users live as long as the owning service.

use std::collections::HashMap;

use anyhow::bail;
use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::contract::model::{Exercise, User, UserSummary};
use crate::domain::repo::UsersRepository;

#[derive(Default)]
struct State {
    users: Vec<User>,
    // id -> position in `users`
    index: HashMap<Uuid, usize>,
}

#[derive(Default)]
pub struct InMemoryUsersRepository {
    state: RwLock<State>,
}

impl InMemoryUsersRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsersRepository for InMemoryUsersRepository {
    async fn insert(&self, user: User) -> anyhow::Result<()> {
        let mut state = self.state.write();
        if state.index.contains_key(&user.id) {
            bail!("user {} already exists", user.id);
        }
        let pos = state.users.len();
        state.index.insert(user.id, pos);
        state.users.push(user);
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<UserSummary>> {
        Ok(self.state.read().users.iter().map(User::summary).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let state = self.state.read();
        Ok(state.index.get(&id).map(|&pos| state.users[pos].clone()))
    }

    async fn append_exercise(
        &self,
        user_id: Uuid,
        exercise: Exercise,
    ) -> anyhow::Result<Option<User>> {
        let mut state = self.state.write();
        let Some(&pos) = state.index.get(&user_id) else {
            return Ok(None);
        };
        let user = &mut state.users[pos];
        user.log.push(exercise);
        Ok(Some(user.clone()))
    }
}
