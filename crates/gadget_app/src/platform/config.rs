use std::fs;
use std::path::{Path, PathBuf};

use gadget_core::GadgetConfig;
use gadget_logging::gadget_info;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Loads a gadget configuration from a RON file. Omitted fields take their
/// defaults.
pub fn load_config(path: &Path) -> Result<GadgetConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: GadgetConfig = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    gadget_info!(
        "Loaded config from {:?} with {} sources",
        path,
        config.feeds.len()
    );
    Ok(config)
}
