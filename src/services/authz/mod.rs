pub mod owner;
pub mod policy;
