//! `keysign generate` and `keysign clean` commands.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use zeroize::Zeroizing;

use keysign_core::signing::{cleanup_key_properties, write_key_properties};

use crate::config::Settings;

#[derive(Args)]
pub struct GenerateArgs {
    /// Path to the keystore, absolute or relative to the project root
    #[arg(long)]
    pub store_file: PathBuf,

    /// Keystore password
    #[arg(long, env = "KEYSIGN_STORE_PASSWORD", hide_env_values = true)]
    pub store_password: String,

    /// Key alias
    #[arg(long)]
    pub key_alias: String,

    /// Key password
    #[arg(long, env = "KEYSIGN_KEY_PASSWORD", hide_env_values = true)]
    pub key_password: String,

    /// Overwrite an existing properties file
    #[arg(long)]
    pub force: bool,
}

pub fn handle_generate(settings: &Settings, args: GenerateArgs) -> Result<()> {
    let target = settings.properties_path();

    if target.exists() && !args.force {
        bail!(
            "{} already exists. Use --force to overwrite.",
            target.display()
        );
    }

    for (field, value) in [
        ("--store-password", &args.store_password),
        ("--key-alias", &args.key_alias),
        ("--key-password", &args.key_password),
    ] {
        if value.trim().is_empty() {
            bail!("{} must not be blank", field);
        }
    }

    let store_password = Zeroizing::new(args.store_password);
    let key_password = Zeroizing::new(args.key_password);

    let written = write_key_properties(
        &settings.project_root,
        &settings.properties_file,
        &args.store_file,
        &store_password,
        &args.key_alias,
        &key_password,
    )
    .with_context(|| format!("Failed to write {}", target.display()))?;

    if !settings.project_root.join(&args.store_file).exists() {
        tracing::warn!(
            store_file = %args.store_file.display(),
            "keystore not found; the release build will fail until it exists"
        );
    }

    println!("Wrote {}", written.display());
    Ok(())
}

pub fn handle_clean(settings: &Settings) -> Result<()> {
    let removed = cleanup_key_properties(&settings.project_root, &settings.properties_file)
        .with_context(|| format!("Failed to remove {}", settings.properties_path().display()))?;

    if removed {
        println!("Removed {}", settings.properties_path().display());
    } else {
        println!("Nothing to remove: {} not found", settings.properties_path().display());
    }

    Ok(())
}
