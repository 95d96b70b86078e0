use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use super::service::ConfigRegistry;

const CONFIG_FILE: &str = "pickers.toml";

/// `pickers.toml` in the platform config directory, or the current
/// directory when no home directory can be resolved.
pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("com", "KenBoyle", "DateRangePicker") {
        dirs.config_dir().join(CONFIG_FILE)
    } else {
        log::warn!("Unable to resolve project directory; using current dir for {}", CONFIG_FILE);
        PathBuf::from(CONFIG_FILE)
    }
}

/// Load a registry. A missing file is an empty registry.
pub fn load_registry(path: &Path) -> Result<ConfigRegistry> {
    if !path.exists() {
        log::debug!("No picker config at {}, using defaults", path.display());
        return Ok(ConfigRegistry::default());
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read picker config from {}", path.display()))?;
    let registry = ConfigRegistry::from_toml_str(&data)
        .with_context(|| format!("failed to parse picker config from {}", path.display()))?;
    log::info!(
        "Loaded {} named picker configs from {}",
        registry.names().count(),
        path.display()
    );
    Ok(registry)
}

pub fn save_registry(path: &Path, registry: &ConfigRegistry) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create dir {}", parent.display()))?;
    }

    let data = registry.to_toml_string()?;
    fs::write(path, data)
        .with_context(|| format!("failed to write picker config to {}", path.display()))?;
    Ok(())
}
