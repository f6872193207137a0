mod ar_aging_summary_controller;

pub use ar_aging_summary_controller::configure;
