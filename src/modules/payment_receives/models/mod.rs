mod payment_receive;

pub use payment_receive::{
    PaymentReceive, PaymentReceiveDetails, PaymentReceiveEntry, PaymentReceiveEntryRequest,
    PaymentReceiveRequest,
};
