pub mod client;
pub mod error;
pub mod model;

pub use model::{
    Exercise, FormattedExercise, LogQuery, NewExercise, NewUser, User, UserLog, UserSummary,
};
