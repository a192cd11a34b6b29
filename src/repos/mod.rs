pub mod credential_store;
pub mod dish_repo;
pub mod error;
pub mod owner_lookup;
pub mod restaurant_repo;
pub mod subscription_repo;
pub mod user_repo;
