pub mod config;
pub mod failure;
pub mod fetch;
pub mod inventory;
pub mod logging;
pub mod process;
pub mod schema;
pub mod server;
