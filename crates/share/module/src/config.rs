//! Share configuration for TOML persistence.

use std::{fs, path::Path};

use eyre::Result;
use serde::{Deserialize, Serialize};

use crate::{AvailabilityArgs, ShareArgs};

/// Persisted share configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Retrieval settings
    #[serde(default)]
    pub share: ShareArgs,

    /// Sampling settings
    #[serde(default)]
    pub availability: AvailabilityArgs,
}

impl ShareConfig {
    /// Load the configuration from the given path, or create a default one if it doesn't exist.
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save(path)?;
            Ok(config)
        }
    }

    /// Save the configuration to the given path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    /// Replace the stored settings with command line values.
    ///
    /// Command line values always win, including defaults the user did not
    /// type.
    pub fn apply_cli_args(&mut self, share: &ShareArgs, availability: &AvailabilityArgs) {
        self.share = share.clone();
        self.availability = availability.clone();
    }
}
