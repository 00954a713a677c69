pub mod exercise;
pub mod user;
