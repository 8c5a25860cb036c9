//! JSON configuration for pairing jobs

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::scanner::file_scanner::SuffixFilter;
use crate::scanner::pairing::{MatchMode, PairOptions, PairingPolicy};

/// A pairing job as read from a config file
///
/// ```json
/// {
///   "folders": ["data/lq", "data/gt"],
///   "keys": ["lq", "gt"],
///   "suffix": [".png", ".jpg"],
///   "match_mode": "basename",
///   "policy": "strict"
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PairConfig {
    #[serde(default)]
    pub folders: Vec<PathBuf>,
    #[serde(default)]
    pub keys: Vec<String>,
    /// Kept untyped so a wrong shape is reported as a suffix error
    #[serde(default)]
    pub suffix: Option<Value>,
    #[serde(default)]
    pub match_mode: MatchMode,
    #[serde(default)]
    pub policy: PairingPolicy,
}

impl PairConfig {
    /// Load a config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file {}", path.display()))?;
        let config: PairConfig = serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse config")
    }

    /// The validated suffix filter, if one was configured
    pub fn suffix_filter(&self) -> Result<Option<SuffixFilter>> {
        match &self.suffix {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(SuffixFilter::from_value(value)?)),
        }
    }

    pub fn pair_options(&self) -> Result<PairOptions> {
        Ok(PairOptions {
            match_mode: self.match_mode,
            policy: self.policy,
            suffix: self.suffix_filter()?,
        })
    }
}
