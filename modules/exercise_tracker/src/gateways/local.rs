use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::ExerciseTrackerApi,
    error::ExerciseTrackerError,
    model::{Exercise, LogQuery, NewExercise, NewUser, User, UserLog, UserSummary},
};
use crate::domain::service::Service;

/// Local implementation of the ExerciseTrackerApi trait that delegates to the domain service
pub struct ExerciseTrackerLocalClient {
    service: Arc<Service>,
}

impl ExerciseTrackerLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ExerciseTrackerApi for ExerciseTrackerLocalClient {
    async fn create_user(&self, new_user: NewUser) -> Result<User, ExerciseTrackerError> {
        self.service.create_user(new_user).await.map_err(Into::into)
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, ExerciseTrackerError> {
        self.service.list_users().await.map_err(Into::into)
    }

    async fn get_user(&self, id: Uuid) -> Result<User, ExerciseTrackerError> {
        self.service.get_user(id).await.map_err(Into::into)
    }

    async fn add_exercise(
        &self,
        user_id: Uuid,
        new_exercise: NewExercise,
    ) -> Result<(User, Exercise), ExerciseTrackerError> {
        self.service
            .add_exercise(user_id, new_exercise)
            .await
            .map_err(Into::into)
    }

    async fn user_log(
        &self,
        user_id: Uuid,
        query: LogQuery,
    ) -> Result<UserLog, ExerciseTrackerError> {
        self.service
            .user_log(user_id, &query)
            .await
            .map_err(Into::into)
    }
}
