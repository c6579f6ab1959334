//! `keysign resolve` and `keysign check` commands.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use keysign_core::signing::detect_keystore_type;
use keysign_core::{resolve, KeystoreType, SigningConfig};

use crate::config::Settings;

const MASK: &str = "********";

/// Summary of a resolution, safe to print: never carries passwords.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResolveReport {
    pub signed: bool,
    pub properties_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keystore_type: Option<String>,
}

impl ResolveReport {
    pub fn new(properties_path: &Path, config: Option<&SigningConfig>) -> Self {
        let store_file = config.and_then(|c| c.store_file.as_deref());

        Self {
            signed: config.is_some(),
            properties_file: properties_path.display().to_string(),
            key_alias: config.map(|c| c.key_alias.clone()),
            store_file: store_file.map(|p| p.display().to_string()),
            keystore_type: store_file
                .and_then(sniff_keystore_type)
                .map(|t| t.to_string()),
        }
    }
}

/// Reads the keystore header if the file is there. Absence is not an error:
/// existence is the build system's concern.
fn sniff_keystore_type(path: &Path) -> Option<KeystoreType> {
    let mut header = [0u8; 4];
    let mut file = File::open(path).ok()?;
    file.read_exact(&mut header).ok()?;
    Some(detect_keystore_type(&header))
}

fn load(settings: &Settings) -> Result<Option<SigningConfig>> {
    tracing::debug!(
        project_root = %settings.project_root.display(),
        file = %settings.properties_file,
        "resolving signing config"
    );

    resolve(&settings.project_root, &settings.properties_file).with_context(|| {
        format!(
            "Failed to resolve signing config from {}",
            settings.properties_path().display()
        )
    })
}

pub fn handle_resolve(settings: &Settings, json: bool) -> Result<()> {
    let config = load(settings)?;
    let report = ResolveReport::new(&settings.properties_path(), config.as_ref());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match &config {
        Some(config) => {
            println!("Release signing: configured");
            println!("  Properties:     {}", report.properties_file);
            println!("  Key alias:      {}", config.key_alias);
            println!("  Key password:   {}", MASK);
            println!(
                "  Store file:     {}",
                report.store_file.as_deref().unwrap_or("(not set)")
            );
            if let Some(keystore_type) = &report.keystore_type {
                println!("  Keystore type:  {}", keystore_type);
            }
            println!("  Store password: {}", MASK);
        }
        None => {
            println!("Release signing: unsigned");
            println!("  {} not found", report.properties_file);
        }
    }

    Ok(())
}

pub fn handle_check(settings: &Settings, require: bool) -> Result<()> {
    let config = load(settings)?;

    match config {
        Some(config) => {
            if config.store_file.is_none() {
                tracing::warn!("storeFile is not set; the build will rely on its own keystore default");
            }
            println!("OK: release signing configured (alias '{}')", config.key_alias);
        }
        None if require => {
            bail!(
                "{} not found but release signing is required",
                settings.properties_path().display()
            );
        }
        None => println!("OK: no {}, release build will be unsigned", settings.properties_file),
    }

    Ok(())
}
