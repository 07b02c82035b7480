pub mod auth;
pub mod extractors;
pub mod leads;
pub mod projects;
pub mod services;
