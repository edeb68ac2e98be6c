pub mod inventory;
pub mod publisher;
