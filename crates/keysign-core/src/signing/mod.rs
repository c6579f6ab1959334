//! Android release signing.
//!
//! This module provides functionality for:
//! - resolving the release signing config from key.properties
//! - generating, writing and removing key.properties
//! - detecting keystore container types

pub mod android;
pub mod resolver;

pub use android::*;
pub use resolver::*;
