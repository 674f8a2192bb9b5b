use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::errors::{DropError, Result};

/// Listing page size used when a directory reader is not told otherwise.
///
/// Browsers historically hand out directory listings 100 entries at a time.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// What a drop gesture delivers when some of its top-level entries fail
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPolicy {
    /// Any failed entry fails the whole gesture and nothing is delivered
    #[default]
    Strict,
    /// Failed entries are reported one by one and the rest is delivered
    Partial,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DropConfig {
    pub policy: DropPolicy,
    /// Maximum number of children returned by one listing call of the
    /// local file-system backend
    pub page_size: usize,
}

impl Default for DropConfig {
    fn default() -> Self {
        DropConfig {
            policy: DropPolicy::Strict,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl DropConfig {
    /// Load the configuration from a JSON file.
    ///
    /// Missing keys fall back to their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        log::debug!("Loading drop config from {:?}", path.as_ref());

        let contents = fs::read_to_string(path.as_ref())?;
        let config: DropConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(DropError::Config(
                "page size must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}
