// Settings module: per-tenant options stored by group and key

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{OrganizationProfile, Setting, SettingsRequest};
pub use repositories::{MySqlSettingRepository, SettingRepository};
pub use services::SettingsService;
