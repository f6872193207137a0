mod payment_receive_controller;

pub use payment_receive_controller::configure;
