//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, body extraction)
//!     → handlers.rs / assets.rs
//!     → response.rs (JSON error mapping)
//!     → Send to client
//! ```

pub mod assets;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{ProfileInput, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, HttpServer};
