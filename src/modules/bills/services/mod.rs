mod bill_service;

pub use bill_service::BillService;
