//! Profile Server Library

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod profile;
pub mod security;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use profile::ProfileStore;
