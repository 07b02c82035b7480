pub mod admin_leads;
pub mod admin_projects;
pub mod admin_services;
pub mod auth;
pub mod home;
pub mod leads;
pub mod projects;
pub mod services;
pub mod system;
