use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::{
    error::ExerciseTrackerError,
    model::{Exercise, LogQuery, NewExercise, NewUser, User, UserLog, UserSummary},
};

/// Public API trait for the exercise_tracker module that other modules can use
#[async_trait]
pub trait ExerciseTrackerApi: Send + Sync {
    /// Create a new user with an empty log
    async fn create_user(&self, new_user: NewUser) -> Result<User, ExerciseTrackerError>;

    /// List all users in creation order
    async fn list_users(&self) -> Result<Vec<UserSummary>, ExerciseTrackerError>;

    /// Get a user together with the full log
    async fn get_user(&self, id: Uuid) -> Result<User, ExerciseTrackerError>;

    /// Append an exercise to the user's log
    async fn add_exercise(
        &self,
        user_id: Uuid,
        new_exercise: NewExercise,
    ) -> Result<(User, Exercise), ExerciseTrackerError>;

    /// Fetch the filtered, formatted log of a user
    async fn user_log(&self, user_id: Uuid, query: LogQuery)
        -> Result<UserLog, ExerciseTrackerError>;
}
