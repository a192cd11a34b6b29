pub mod auth;
pub mod dishes;
pub mod health;
pub mod restaurants;
pub mod subscriptions;
pub mod users;
