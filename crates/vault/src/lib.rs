//! vault - Single-user credential vault
//!
//! "One account, one file, your properties."
//!
//! Registers and authenticates a user, then stores arbitrary key/value
//! properties for that account in plain JSON collections on disk
//! (users.json and properties.json, whole-file rewritten on every save).
//! Passwords are hashed with Argon2id before they reach disk.

pub mod auth;
pub mod error;
pub mod paths;
pub mod properties;
pub mod store;

pub use auth::AuthService;
pub use error::VaultError;
pub use paths::Paths;
pub use properties::PropertyManager;
pub use store::{PropertyRecord, RecordStore, User};
