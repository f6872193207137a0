mod system_user;

pub use system_user::{EditUserRequest, SystemUser, UserDetails};
