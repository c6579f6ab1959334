//! Keysign Core Library
//!
//! Resolution of Android release signing credentials from `key.properties`,
//! plus helpers for authoring that file.

pub mod error;
pub mod properties;
pub mod signing;

pub use error::{Result, SigningError};
pub use properties::Properties;
pub use signing::{resolve, resolve_default, KeystoreType, SigningConfig, DEFAULT_KEY_PROPERTIES};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
