//! Club and resolver configuration
//!
//! Parsers never embed the club's identity; it is passed in through
//! [`ClubConfig`] so the same engine can serve other clubs.

use crate::error::{Error, Result};
use crate::resolver::StoreLayout;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Identity of the club whose exports are being parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClubConfig {
    /// Full club name, matched case-insensitively in legacy print titles
    pub club_name: String,
    /// Short club code used when a legacy event row has no club
    pub club_code: String,
    /// Field delimiter
    pub delimiter: char,
}

impl ClubConfig {
    /// Create a config for a club with the default comma delimiter
    pub fn new(club_name: impl Into<String>, club_code: impl Into<String>) -> Self {
        Self {
            club_name: club_name.into(),
            club_code: club_code.into(),
            delimiter: ',',
        }
    }

    /// Delimiter as a single byte, falling back to a comma for non-ASCII
    pub(crate) fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }
}

impl Default for ClubConfig {
    fn default() -> Self {
        Self::new("Kingsmead Archers", "KA")
    }
}

/// Where to look for data and how long to wait for it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub club: ClubConfig,
    /// Base URL of the remote object store, tried first
    pub remote_base_url: Option<String>,
    /// Directory of bundled static files, tried second
    pub static_dir: Option<PathBuf>,
    /// Per-request timeout for remote fetches, in seconds
    pub timeout_secs: u64,
    pub layout: StoreLayout,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            club: ClubConfig::default(),
            remote_base_url: None,
            static_dir: None,
            timeout_secs: 15,
            layout: StoreLayout::default(),
        }
    }
}

impl ResolverConfig {
    /// Load a resolver config from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: ResolverConfig = serde_json::from_str(&content)?;

        if config.remote_base_url.is_none() && config.static_dir.is_none() {
            return Err(Error::Config {
                path: path.to_path_buf(),
                message: "neither remote_base_url nor static_dir is set".to_string(),
            });
        }
        if config.timeout_secs == 0 {
            return Err(Error::Config {
                path: path.to_path_buf(),
                message: "timeout_secs must be greater than zero".to_string(),
            });
        }

        Ok(config)
    }
}
