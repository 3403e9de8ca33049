pub mod client;
pub mod manager;
