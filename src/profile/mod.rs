//! Profile subsystem.
//!
//! # Data Flow
//! ```text
//! untrusted request body
//!     → sanitize.rs (allow-list name/email/interests, truncate)
//!     → store.rs (upsert / point lookup on userid = 1)
//!     → types.rs (Profile document, fixed acknowledgement)
//! ```

pub mod sanitize;
pub mod store;
pub mod types;

pub use sanitize::{sanitize, MAX_FIELD_CHARS};
pub use store::{ProfileStore, StoreError, StoreResult};
pub use types::{Profile, ProfileFields, UpdateAck, PROFILE_USER_ID};
