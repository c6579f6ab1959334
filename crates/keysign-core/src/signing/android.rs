//! Android keystore detection and key.properties generation.
//!
//! This is the producer side of the file [`resolve`](super::resolve) reads:
//! it writes the key.properties consumed by the Gradle build script.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use zeroize::Zeroizing;

use super::resolver::{KEY_ALIAS, KEY_PASSWORD, STORE_FILE, STORE_PASSWORD};
use crate::error::{Result, SigningError};

/// Keystore container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeystoreType {
    Jks,
    Pkcs12,
}

impl KeystoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeystoreType::Jks => "jks",
            KeystoreType::Pkcs12 => "pkcs12",
        }
    }

    /// Conventional file extension for this keystore type.
    pub fn extension(&self) -> &'static str {
        match self {
            KeystoreType::Jks => "jks",
            KeystoreType::Pkcs12 => "keystore",
        }
    }
}

impl FromStr for KeystoreType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jks" => Ok(KeystoreType::Jks),
            "pkcs12" | "p12" => Ok(KeystoreType::Pkcs12),
            _ => Err(format!("Unknown keystore type: {}", s)),
        }
    }
}

impl fmt::Display for KeystoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Detects the keystore type from its magic bytes.
pub fn detect_keystore_type(data: &[u8]) -> KeystoreType {
    // JKS files start with 0xFEEDFEED; PKCS12 is an ASN.1 SEQUENCE (0x30)
    if data.starts_with(&[0xFE, 0xED, 0xFE, 0xED]) {
        return KeystoreType::Jks;
    }

    KeystoreType::Pkcs12
}

/// Generates key.properties content for Flutter/Gradle.
///
/// Values are escaped so that reading the file back yields the same
/// credentials, including Windows paths with backslashes. Blank credentials
/// and non-UTF-8 keystore paths are rejected, since the resolver could not
/// read them back.
pub fn generate_key_properties(
    store_file: &Path,
    store_password: &str,
    key_alias: &str,
    key_password: &str,
) -> Result<Zeroizing<String>> {
    ensure_not_blank(KEY_ALIAS, key_alias)?;
    ensure_not_blank(KEY_PASSWORD, key_password)?;
    ensure_not_blank(STORE_PASSWORD, store_password)?;

    let store_file_str = store_file
        .to_str()
        .ok_or_else(|| SigningError::NonUtf8Path(store_file.to_path_buf()))?;

    Ok(Zeroizing::new(format!(
        "{}={}\n{}={}\n{}={}\n{}={}\n",
        STORE_PASSWORD,
        escape_value(store_password),
        KEY_PASSWORD,
        escape_value(key_password),
        KEY_ALIAS,
        escape_value(key_alias),
        STORE_FILE,
        escape_value(store_file_str),
    )))
}

/// Same rule the resolver applies to required fields.
fn ensure_not_blank(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SigningError::MissingRequiredField(field));
    }
    Ok(())
}

fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}

/// Writes key.properties into the Android project directory under `file_name`.
///
/// Returns the path of the written file. On Unix the file is only readable
/// by its owner.
pub fn write_key_properties(
    android_dir: &Path,
    file_name: &str,
    store_file: &Path,
    store_password: &str,
    key_alias: &str,
    key_password: &str,
) -> Result<PathBuf> {
    if !android_dir.is_dir() {
        return Err(SigningError::AndroidDirNotFound(android_dir.to_path_buf()));
    }

    let content = generate_key_properties(store_file, store_password, key_alias, key_password)?;
    let key_properties_path = android_dir.join(file_name);

    fs::write(&key_properties_path, content.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&key_properties_path, fs::Permissions::from_mode(0o600))?;
    }

    tracing::debug!("Wrote key.properties to {}", key_properties_path.display());

    Ok(key_properties_path)
}

/// Removes key.properties (named `file_name`) from the Android project directory.
///
/// Returns `true` if a file was removed.
pub fn cleanup_key_properties(android_dir: &Path, file_name: &str) -> Result<bool> {
    let key_properties_path = android_dir.join(file_name);

    if !key_properties_path.exists() {
        return Ok(false);
    }

    fs::remove_file(&key_properties_path)?;
    tracing::debug!("Removed key.properties from {}", key_properties_path.display());

    Ok(true)
}
