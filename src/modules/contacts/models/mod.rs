mod contact;

pub use contact::{Contact, ContactDetails, ContactRequest, ContactService};
