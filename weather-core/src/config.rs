use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    io::Write,
    path::{Path, PathBuf},
};

use crate::model::Location;

/// Persisted settings: the OpenWeather API key and the target city.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
///
/// [location]
/// city_name = "Caxias do Sul"
/// country_code = "BR"
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    pub api_key: Option<String>,
    pub location: Option<Location>,
}

impl Settings {
    /// API key, if set and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    /// Location, if both city and country are present.
    pub fn complete_location(&self) -> Option<&Location> {
        self.location.as_ref().filter(|loc| loc.is_complete())
    }

    pub fn is_complete(&self) -> bool {
        self.api_key().is_some() && self.complete_location().is_some()
    }

    /// Human-readable list of what is still missing, for hints and logs.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.complete_location().is_none() {
            missing.push("location");
        }
        if self.api_key().is_none() {
            missing.push("api_key");
        }
        missing
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("location", &self.location)
            .finish()
    }
}

/// Where settings live between runs.
pub trait SettingsStore {
    fn load(&self) -> Result<Settings>;
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// TOML file in the user's config directory.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform default location.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Path to the config file.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "simple-weather", "simple-weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

impl SettingsStore for FileSettingsStore {
    /// Load settings from disk, or return empty settings if the file doesn't exist yet.
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config file: {}", self.path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", self.path.display()))?;

        Ok(settings)
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(settings).context("Failed to serialize settings to TOML")?;

        write_private(&self.path, &toml)
            .with_context(|| format!("Failed to write config file: {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

/// The file holds the API key, so on unix it is readable by the owner only.
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?;
        // `mode` only applies to newly created files
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        file.write_all(contents.as_bytes())
    }
    #[cfg(not(unix))]
    {
        fs::File::create(path)?.write_all(contents.as_bytes())
    }
}
