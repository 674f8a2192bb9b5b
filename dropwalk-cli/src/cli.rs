use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use dropwalk::{DropConfig, DropPolicy};

use crate::error::AppError;

#[derive(Parser, Debug)]
#[command(name = "dropwalk")]
#[command(
    about = "List the files of dropped files and folders with their relative paths",
    long_about = None
)]
pub struct Cli {
    #[arg(value_parser, help = "Files and folders dropped in one gesture")]
    pub paths: Vec<PathBuf>,

    #[arg(long, value_enum, help = "What to do when some entries fail")]
    pub policy: Option<Policy>,

    #[arg(long, help = "Maximum number of entries per directory listing")]
    pub page_size: Option<usize>,

    #[arg(long, short, help = "JSON file with the drop configuration")]
    pub config: Option<PathBuf>,

    #[arg(long, short, action, help = "Print the files as JSON")]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Policy {
    /// Fail the whole drop when any entry fails
    Strict,
    /// Print the entries that could be read
    Partial,
}

impl From<Policy> for DropPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Strict => DropPolicy::Strict,
            Policy::Partial => DropPolicy::Partial,
        }
    }
}

impl Cli {
    /// Build the drop configuration, flags taking precedence over the
    /// config file
    pub fn drop_config(&self) -> Result<DropConfig, AppError> {
        let mut config = match &self.config {
            Some(path) => DropConfig::load(path)
                .map_err(|e| AppError::ConfigLoadError(e.to_string()))?,
            None => DropConfig::default(),
        };
        if let Some(policy) = self.policy {
            config.policy = policy.into();
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        config
            .validate()
            .map_err(|e| AppError::ConfigLoadError(e.to_string()))?;
        Ok(config)
    }
}
