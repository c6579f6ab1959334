//! Release signing configuration resolution.
//!
//! Reads `key.properties` from the Android project root and turns it into a
//! [`SigningConfig`] for the release build variant. A missing file is not an
//! error: it means the release build is left unsigned.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::error::{Result, SigningError};
use crate::properties::Properties;

/// File name Gradle reads signing credentials from, relative to the root project.
pub const DEFAULT_KEY_PROPERTIES: &str = "key.properties";

pub const KEY_ALIAS: &str = "keyAlias";
pub const KEY_PASSWORD: &str = "keyPassword";
pub const STORE_FILE: &str = "storeFile";
pub const STORE_PASSWORD: &str = "storePassword";

/// Signing credentials for the release build variant.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningConfig {
    pub key_alias: String,
    pub key_password: Zeroizing<String>,
    /// Keystore location, joined onto the project root. Existence is not checked.
    pub store_file: Option<PathBuf>,
    pub store_password: Zeroizing<String>,
}

impl SigningConfig {
    /// Builds a signing config from already parsed properties.
    ///
    /// `keyAlias`, `keyPassword` and `storePassword` must be present and
    /// non-blank. A blank `storeFile` is treated the same as a missing one.
    pub fn from_properties(project_root: &Path, props: &Properties) -> Result<Self> {
        let key_alias = required(props, KEY_ALIAS)?;
        let key_password = Zeroizing::new(required(props, KEY_PASSWORD)?);
        let store_password = Zeroizing::new(required(props, STORE_PASSWORD)?);

        let store_file = props
            .get(STORE_FILE)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| project_root.join(value));

        Ok(Self {
            key_alias,
            key_password,
            store_file,
            store_password,
        })
    }
}

impl fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningConfig")
            .field("key_alias", &self.key_alias)
            .field("key_password", &"<redacted>")
            .field("store_file", &self.store_file)
            .field("store_password", &"<redacted>")
            .finish()
    }
}

fn required(props: &Properties, field: &'static str) -> Result<String> {
    props
        .get(field)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .ok_or(SigningError::MissingRequiredField(field))
}

/// Resolves the release signing config from `project_root/relative_file_name`.
///
/// Returns `Ok(None)` when the file does not exist. A file that exists but
/// cannot be read is an error, never an unsigned build.
pub fn resolve(project_root: &Path, relative_file_name: &str) -> Result<Option<SigningConfig>> {
    let path = project_root.join(relative_file_name);

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => Zeroizing::new(content),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(SigningError::FileUnreadable { path, source }),
    };

    let props = Properties::parse(&content);
    SigningConfig::from_properties(project_root, &props).map(Some)
}

/// Resolves using the conventional `key.properties` file name.
pub fn resolve_default(project_root: &Path) -> Result<Option<SigningConfig>> {
    resolve(project_root, DEFAULT_KEY_PROPERTIES)
}
