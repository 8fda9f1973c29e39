use std::path::PathBuf;

use crate::config::Config;
use color_eyre::Result;
use dirs::data_dir;
use keyseal_storage::file_vault::FileVault;
use tracing::debug;

/// Resolve the default vault root directory.
pub fn default_data_dir() -> Result<PathBuf> {
    let base = data_dir().ok_or_else(|| color_eyre::eyre::eyre!("no data dir available"))?;
    Ok(base.join("keyseal"))
}

/// Build a file vault honoring config overrides.
pub fn vault_from_config(config: &Config) -> Result<FileVault> {
    if let Some(root) = &config.data_dir {
        debug!(?root, "initializing vault (config override)");
        return Ok(FileVault::new(root.clone()));
    }

    let root = default_data_dir()?;
    debug!(?root, "initializing vault");
    Ok(FileVault::new(root))
}
