//! Configuration loading and data directory resolution

use crate::{Error, Result};
use std::path::PathBuf;

/// Settings for the object storage collaborator.
///
/// Bucket names are `{prefix}-{bucket}` (e.g. `whitecube-exhibitions`), so one
/// deployment's buckets never collide with another's.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub bucket_prefix: String,
    /// Base URL for public objects. When unset the S3 backend derives a
    /// virtual-hosted-style URL from the bucket and region.
    pub public_url_base: Option<String>,
}

impl StorageSettings {
    pub fn from_env() -> Self {
        Self {
            bucket_prefix: std::env::var("WHITECUBE_BUCKET_PREFIX")
                .unwrap_or_else(|_| "whitecube".to_string()),
            public_url_base: std::env::var("WHITECUBE_PUBLIC_URL_BASE").ok(),
        }
    }
}

/// Data directory resolution, in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file (`data_dir` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_dir(cli_arg: Option<&str>, env_var_name: &str) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = config_file_path() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(data_dir) = config.get("data_dir").and_then(|v| v.as_str()) {
                    return PathBuf::from(data_dir);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_data_dir()
}

/// Locate the configuration file for the platform.
fn config_file_path() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("whitecube").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/whitecube/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// OS-dependent default data directory.
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("whitecube"))
        .unwrap_or_else(|| PathBuf::from("./whitecube_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_argument_wins() {
        let dir = resolve_data_dir(Some("/tmp/wc-test"), "WHITECUBE_TEST_UNSET_VAR");
        assert_eq!(dir, PathBuf::from("/tmp/wc-test"));
    }

    #[test]
    fn falls_back_to_default_when_nothing_set() {
        let dir = resolve_data_dir(None, "WHITECUBE_TEST_UNSET_VAR");
        assert!(dir.to_string_lossy().contains("whitecube"));
    }
}
