use serde::{Deserialize, Serialize};

/// Configuration for the exercise_tracker module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExerciseTrackerConfig {
    #[serde(default = "default_max_username_length")]
    pub max_username_length: usize,
}

impl Default for ExerciseTrackerConfig {
    fn default() -> Self {
        Self {
            max_username_length: default_max_username_length(),
        }
    }
}

fn default_max_username_length() -> usize {
    100
}
