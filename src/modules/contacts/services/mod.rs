mod contacts_service;
mod display_name;

pub use contacts_service::ContactsService;
pub use display_name::{
    default_display_name, display_name_options, DisplayNameOption, DisplayNameParts,
};
