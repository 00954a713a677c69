use crate::contract::model::{Exercise, User, UserSummary};
use crate::infra::storage::entity::{exercise, user};

/// Convert a database row to a contract exercise
pub fn exercise_to_contract(row: exercise::Model) -> Exercise {
    Exercise {
        description: row.description,
        duration: row.duration,
        date: row.date,
    }
}

/// Convert a user row and its exercise rows (already in insertion order)
pub fn user_to_contract(row: user::Model, log: Vec<exercise::Model>) -> User {
    User {
        id: row.id,
        username: row.username,
        created_at: row.created_at,
        log: log.into_iter().map(exercise_to_contract).collect(),
    }
}

pub fn user_to_summary(row: user::Model) -> UserSummary {
    UserSummary {
        id: row.id,
        username: row.username,
    }
}
