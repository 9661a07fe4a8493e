pub mod auth_service;
pub mod profile_service;

pub use auth_service::AuthService;
pub use profile_service::ProfileService;
