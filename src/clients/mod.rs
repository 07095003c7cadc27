#[macro_use]
mod macros;

pub mod manager_client;

pub use manager_client::UserManagerClient;
