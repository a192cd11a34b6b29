pub mod principal;

pub use principal::{CurrentUser, Principal, Role};
