use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

const DEFAULT_CATALOG_URL: &str = "https://www.swapi.tech/api";
const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub catalog: CatalogConfig,
  #[serde(default)]
  pub backend: BackendConfig,
  #[serde(default)]
  pub storage: StorageConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
  /// Base URL of the read-only catalog API
  #[serde(default)]
  url: Option<Url>,
}

impl CatalogConfig {
  pub fn url(&self) -> &str {
    self.url.as_ref().map_or(DEFAULT_CATALOG_URL, Url::as_str)
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
  /// Base URL of the favorites backend
  #[serde(default)]
  url: Option<Url>,
  /// Numeric id sent with every backend request
  #[serde(default = "default_user_id")]
  pub user_id: u64,
}

impl BackendConfig {
  pub fn url(&self) -> &str {
    self.url.as_ref().map_or(DEFAULT_BACKEND_URL, Url::as_str)
  }
}

impl Default for BackendConfig {
  fn default() -> Self {
    Self {
      url: None,
      user_id: default_user_id(),
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
  /// State database location (defaults to the platform data directory)
  pub path: Option<PathBuf>,
}

fn default_user_id() -> u64 {
  1
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./datapad.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/datapad/config.yaml
  ///
  /// Built-in defaults are used when no file is found. Environment
  /// overrides are applied last.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Self::default(),
    };

    config.with_env_overrides()
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("datapad.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("datapad").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    // An empty file is a valid, all-defaults config
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    Ok(serde_yaml::from_str(contents)?)
  }

  /// Apply DATAPAD_BACKEND_URL and DATAPAD_USER_ID, when set.
  fn with_env_overrides(self) -> Result<Self> {
    self.apply_overrides(
      std::env::var("DATAPAD_BACKEND_URL").ok(),
      std::env::var("DATAPAD_USER_ID").ok(),
    )
  }

  fn apply_overrides(mut self, backend_url: Option<String>, user_id: Option<String>) -> Result<Self> {
    if let Some(url) = backend_url {
      let parsed =
        Url::parse(&url).map_err(|e| eyre!("Invalid DATAPAD_BACKEND_URL '{}': {}", url, e))?;
      self.backend.url = Some(parsed);
    }
    if let Some(id) = user_id {
      self.backend.user_id = id
        .trim()
        .parse()
        .map_err(|e| eyre!("Invalid DATAPAD_USER_ID '{}': {}", id, e))?;
    }
    Ok(self)
  }
}
