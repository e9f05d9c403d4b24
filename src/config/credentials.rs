use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::error::{ApiError, ApiResult};

/// Base URL used when the store has none configured.
pub const DEFAULT_API_URL: &str = "https://api.flotiq.com/api";

/// Version prefix shared by all content endpoints (media is exempt).
pub const API_VERSION_PREFIX: &str = "/v1";

/// Environment override for the API token.
pub const ENV_API_KEY: &str = "FLOTIQ_API_KEY";

/// Environment override for the base URL.
pub const ENV_API_URL: &str = "FLOTIQ_API_URL";

/// What every outbound request needs to authenticate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    pub api_url: String,
}

/// Trait for stores that can produce current credentials.
///
/// Fails with [`ApiError::MissingCredentials`] when no token is stored;
/// reads have no side effects.
pub trait CredentialProvider: Send + Sync {
    fn get(&self) -> ApiResult<Credentials>;
}

/// On-disk representation under fixed keys.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct CredentialsFile {
    api_key: Option<String>,
    api_url: Option<String>,
}

/// Credential store backed by a toml file in the user config directory,
/// with environment overrides. The file is re-read on every lookup so a
/// token change takes effect without restarting anything.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: Self::default_path()?,
        })
    }

    /// Store reading from an explicit file instead of the default location.
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default credentials file path.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("flotiq-cli").join("credentials.toml"))
    }

    /// Write the given values to the backing file, creating parent
    /// directories as needed.
    pub fn save(&self, api_key: &str, api_url: Option<&str>) -> Result<()> {
        let contents = toml::to_string_pretty(&CredentialsFile {
            api_key: Some(api_key.to_string()),
            api_url: api_url.map(str::to_string),
        })?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, contents)?;
        Ok(())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read_file(&self) -> CredentialsFile {
        if !self.path.exists() {
            return CredentialsFile::default();
        }
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(target: "config", "Cannot read {}: {}", self.path.display(), e);
                return CredentialsFile::default();
            }
        };
        match toml::from_str(&contents) {
            Ok(file) => file,
            Err(e) => {
                warn!(target: "config", "Cannot parse {}: {}", self.path.display(), e);
                CredentialsFile::default()
            }
        }
    }
}

/// Combine file contents with environment overrides; overrides win.
fn resolve(
    file: CredentialsFile,
    env_key: Option<String>,
    env_url: Option<String>,
) -> ApiResult<Credentials> {
    let api_key = env_key
        .or(file.api_key)
        .filter(|key| !key.trim().is_empty())
        .ok_or(ApiError::MissingCredentials)?;
    let api_url = env_url
        .or(file.api_url)
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    Ok(Credentials { api_key, api_url })
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

impl CredentialProvider for FileCredentialStore {
    fn get(&self) -> ApiResult<Credentials> {
        resolve(self.read_file(), env_var(ENV_API_KEY), env_var(ENV_API_URL))
    }
}

/// Fixed credentials, for tests and embedding.
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    pub fn new(api_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            credentials: Credentials {
                api_key: api_key.into(),
                api_url: api_url.into(),
            },
        }
    }
}

impl CredentialProvider for StaticCredentials {
    fn get(&self) -> ApiResult<Credentials> {
        Ok(self.credentials.clone())
    }
}
