pub mod lead;
pub mod project;
pub mod service;
pub mod sqlx_repo;
