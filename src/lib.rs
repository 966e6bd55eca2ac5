//! Contact Store — contact-form backend over libSQL.

pub mod config;
pub mod contacts;
pub mod error;
pub mod server;
pub mod store;
