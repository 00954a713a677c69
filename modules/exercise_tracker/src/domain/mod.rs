pub mod dates;
pub mod error;
pub mod log_query;
pub mod repo;
pub mod service;
