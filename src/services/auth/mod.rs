pub mod authenticate;
pub mod password;
pub mod store;
pub mod token;
