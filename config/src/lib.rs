//! Configuration for Skillpath.
//!
//! Read from `~/.skillpath/config.toml`. Every section is optional; missing
//! values fall back to defaults. String values may reference environment
//! variables as `${NAME}`.
//!
//! ```toml
//! [app]
//! ascii_only = false
//! high_contrast = false
//! reduced_motion = false
//!
//! [backend]
//! mode = "remote"
//! base_url = "http://localhost:8000"
//! timeout_seconds = 30
//! access_token = "${SKILLPATH_TOKEN}"
//!
//! [practice]
//! xp_per_practice = 50
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;
use skillpath_types::DEFAULT_PRACTICE_XP;
use skillpath_types::ui::UiOptions;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Overrides `[backend] base_url`.
pub const BASE_URL_ENV: &str = "SKILLPATH_BASE_URL";
/// Overrides `[backend] mode` (`remote` or `local`).
pub const BACKEND_MODE_ENV: &str = "SKILLPATH_BACKEND";

#[derive(Debug, Default, Deserialize)]
pub struct SkillpathConfig {
    pub app: Option<AppConfig>,
    pub backend: Option<BackendConfig>,
    pub practice: Option<PracticeConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs for icons and gauges.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Disable celebration animations.
    #[serde(default)]
    pub reduced_motion: bool,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Talk to the REST backend.
    #[default]
    Remote,
    /// Keep everything in memory for this process.
    Local,
}

impl BackendMode {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "remote" => Some(Self::Remote),
            "local" => Some(Self::Local),
            _ => None,
        }
    }
}

#[derive(Default, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub mode: BackendMode,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub access_token: Option<String>,
}

// Manual Debug impl to keep the session token out of logs.
impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("mode", &self.mode)
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field(
                "access_token",
                &if self.access_token.is_some() {
                    "[REDACTED]"
                } else {
                    "None"
                },
            )
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PracticeConfig {
    pub xp_per_practice: Option<u32>,
}

pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let var = &after[..end];
        if var.is_empty() {
            out.push_str("${}");
        } else {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

impl SkillpathConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    /// Load from an explicit path. A missing file is `Ok(None)`.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {}: {source}", path.display());
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        toml::from_str(&content).map(Some).map_err(|source| {
            tracing::warn!("Failed to parse config at {}: {source}", path.display());
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.app
            .as_ref()
            .map(|app| UiOptions {
                ascii_only: app.ascii_only,
                high_contrast: app.high_contrast,
                reduced_motion: app.reduced_motion,
            })
            .unwrap_or_default()
    }

    /// `SKILLPATH_BACKEND` wins over the file.
    #[must_use]
    pub fn backend_mode(&self) -> BackendMode {
        if let Ok(raw) = env::var(BACKEND_MODE_ENV) {
            match BackendMode::parse(&raw) {
                Some(mode) => return mode,
                None => tracing::warn!("Ignoring unknown {BACKEND_MODE_ENV}={raw:?}"),
            }
        }
        self.backend.as_ref().map(|b| b.mode).unwrap_or_default()
    }

    /// `SKILLPATH_BASE_URL` wins over the file. Trailing slashes are trimmed.
    #[must_use]
    pub fn base_url(&self) -> String {
        let configured = env::var(BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| {
                self.backend
                    .as_ref()
                    .and_then(|b| b.base_url.as_deref())
                    .map(expand_env_vars)
                    .filter(|v| !v.trim().is_empty())
            })
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        configured.trim().trim_end_matches('/').to_string()
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        let secs = self
            .backend
            .as_ref()
            .and_then(|b| b.timeout_seconds)
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Stored session token, with `${VAR}` references expanded.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.backend
            .as_ref()
            .and_then(|b| b.access_token.as_deref())
            .map(expand_env_vars)
            .filter(|token| !token.trim().is_empty())
    }

    #[must_use]
    pub fn xp_per_practice(&self) -> u32 {
        self.practice
            .as_ref()
            .and_then(|p| p.xp_per_practice)
            .filter(|xp| *xp > 0)
            .unwrap_or(DEFAULT_PRACTICE_XP)
    }

    /// Store the session token in `[backend] access_token`.
    ///
    /// Uses `toml_edit` to preserve comments and formatting.
    /// Creates the config file and parent directory if they don't exist.
    pub fn persist_access_token(token: &str) -> std::io::Result<()> {
        let Some(path) = config_path() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config path",
            ));
        };
        persist_access_token_at(&path, token)
    }
}

pub fn persist_access_token_at(path: &Path, token: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
        restrict_dir_permissions(parent)?;
    }

    let content = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    if !doc.contains_key("backend") {
        doc["backend"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["backend"]["access_token"] = toml_edit::value(token);

    skillpath_utils::atomic_write(path, doc.to_string().as_bytes())?;
    tracing::info!(path = %path.display(), "Stored session token");
    Ok(())
}

#[cfg(unix)]
fn restrict_dir_permissions(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::{MetadataExt, PermissionsExt};

    let metadata = fs::metadata(dir)?;
    // Only modify permissions if we own the directory
    // SAFETY: getuid has no preconditions and cannot fail.
    let our_uid = unsafe { libc::getuid() };
    if metadata.uid() == our_uid {
        let mode = metadata.permissions().mode() & 0o777;
        if mode & 0o077 != 0 {
            fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
        }
    }
    Ok(())
}

#[cfg(not(unix))]
fn restrict_dir_permissions(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".skillpath").join("config.toml"))
}
