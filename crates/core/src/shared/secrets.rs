use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::shared::constants::{CONFIG_DIR_NAME, SECRETS_FILE_NAME};

#[derive(Error, Debug)]
pub enum SecretsError {
    #[error("failed to read secrets file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed secrets file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no secrets file found (searched: {})", format_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },
    #[error("secrets file has no value for {0}")]
    Missing(&'static str),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Credentials for the three remote services, keyed by their names in
/// `secrets.json`.
///
/// Every key is optional on disk; a stage asks only for the ones it uses.
#[derive(Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(rename = "COGNITIVE_KEY")]
    cognitive_key: Option<String>,
    #[serde(rename = "VIDEO_INDEXER_KEY")]
    video_indexer_key: Option<String>,
    #[serde(rename = "STORAGE_ACCOUNT_NAME")]
    storage_account_name: Option<String>,
    #[serde(rename = "STORAGE_SAS_TOKEN")]
    storage_sas_token: Option<String>,
}

impl Secrets {
    pub fn load(path: &Path) -> Result<Self, SecretsError> {
        let json = fs::read_to_string(path).map_err(|source| SecretsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| SecretsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Locate and load the secrets file.
    ///
    /// Resolution order:
    /// 1. Explicit path (must exist)
    /// 2. `./secrets.json`
    /// 3. Platform config directory (`<config>/FaceLabeller/secrets.json`)
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, SecretsError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        Self::load_first(&default_locations())
    }

    fn load_first(candidates: &[PathBuf]) -> Result<Self, SecretsError> {
        match candidates.iter().find(|p| p.exists()) {
            Some(path) => {
                log::debug!("Using secrets from {}", path.display());
                Self::load(path)
            }
            None => Err(SecretsError::NotFound {
                searched: candidates.to_vec(),
            }),
        }
    }

    pub fn cognitive_key(&self) -> Result<&str, SecretsError> {
        required(&self.cognitive_key, "COGNITIVE_KEY")
    }

    pub fn video_indexer_key(&self) -> Result<&str, SecretsError> {
        required(&self.video_indexer_key, "VIDEO_INDEXER_KEY")
    }

    pub fn storage_account_name(&self) -> Result<&str, SecretsError> {
        required(&self.storage_account_name, "STORAGE_ACCOUNT_NAME")
    }

    pub fn storage_sas_token(&self) -> Result<&str, SecretsError> {
        required(&self.storage_sas_token, "STORAGE_SAS_TOKEN")
    }
}

fn required<'a>(value: &'a Option<String>, key: &'static str) -> Result<&'a str, SecretsError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or(SecretsError::Missing(key))
}

fn default_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(SECRETS_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join(CONFIG_DIR_NAME).join(SECRETS_FILE_NAME));
    }
    locations
}
