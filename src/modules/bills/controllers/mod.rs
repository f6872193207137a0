mod bill_controller;

pub use bill_controller::configure;
