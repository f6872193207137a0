mod contact_controller;

pub use contact_controller::configure;
