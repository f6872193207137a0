// Users module: system users of a tenant organization

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{EditUserRequest, SystemUser};
pub use repositories::{MySqlUserRepository, UserRepository};
pub use services::UserService;
