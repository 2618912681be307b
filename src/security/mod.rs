//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (check per-IP window)
//!     → limits.rs (body size, request timeout)
//!     → handler
//! Outgoing response:
//!     → headers.rs (nosniff, frame denial, CSP)
//! ```
//!
//! # Design Decisions
//! - Defense in depth: multiple layers of protection
//! - Fail closed: reject on any security check failure
//! - No trust in client input

pub mod headers;
pub mod limits;
pub mod rate_limit;

pub use headers::with_security_headers;
pub use limits::with_limits;
pub use rate_limit::{rate_limit_middleware, RateLimiterState};
