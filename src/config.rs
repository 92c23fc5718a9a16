//! Configuration management for causelist.
//!
//! Settings come from a TOML file (explicit `--config`, else the user config
//! directory), then environment variables, with built-in defaults for every
//! field. A missing default-location file is not an error.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scrapers::portal::{FormConfig, HarvestConfig};
use crate::scrapers::BrowserEngineConfig;
use crate::services::DownloadConfig;

/// eCourts cause list page.
pub const DEFAULT_PORTAL_URL: &str = "https://services.ecourts.gov.in/ecourtindia_v6/?p=cause_list/";

/// Default destination for downloaded documents, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "downloads";

/// Config file name inside the user config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable names.
pub const ENV_PORTAL_URL: &str = "CAUSELIST_PORTAL_URL";
pub const ENV_OUTPUT_DIR: &str = "CAUSELIST_OUTPUT_DIR";
pub const ENV_BROWSER_URL: &str = "CAUSELIST_BROWSER_URL";
pub const ENV_CHROME: &str = "CAUSELIST_CHROME";

/// Application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Page holding the cause list form.
    #[serde(default = "default_portal_url")]
    pub portal_url: String,

    /// Where documents are written when no destination is given.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub browser: BrowserEngineConfig,

    #[serde(default)]
    pub form: FormConfig,

    #[serde(default)]
    pub harvest: HarvestConfig,

    #[serde(default)]
    pub download: DownloadConfig,
}

fn default_portal_url() -> String {
    DEFAULT_PORTAL_URL.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            portal_url: default_portal_url(),
            output_dir: default_output_dir(),
            browser: BrowserEngineConfig::default(),
            form: FormConfig::default(),
            harvest: HarvestConfig::default(),
            download: DownloadConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings.
    ///
    /// An explicit path must exist. Without one, the default location is used
    /// if present. Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let mut settings = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        settings.apply_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply overrides from a variable lookup (the process environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_PORTAL_URL) {
            self.portal_url = url;
        }
        if let Some(dir) = non_empty(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(remote) = non_empty(ENV_BROWSER_URL) {
            self.browser.remote_url = Some(remote);
        }
        if let Some(chrome) = non_empty(ENV_CHROME) {
            self.browser.chrome_path = Some(PathBuf::from(chrome));
        }
    }

    /// Output directory with `~` and environment variables expanded.
    pub fn resolved_output_dir(&self) -> PathBuf {
        expand_path(&self.output_dir)
    }
}

/// Default config file location (`$XDG_CONFIG_HOME/causelist/config.toml` on Linux).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("causelist").join(CONFIG_FILE_NAME))
}

/// Expand `~` and `$VARS` in a path, leaving it untouched if expansion fails.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => path.to_path_buf(),
    }
}
