//! Configuration file management for quickplan.
//!
//! Provides a TOML-based config file at `~/.config/quickplan/config.toml`
//! and a resolution chain: CLI flag > env var > config file > default.
//! The provider credential is never stored here; the file only names the
//! environment variable it is read from.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quickplan_core::client::ENDPOINT_PATH;
use quickplan_core::plan::ApiKeySource;
use quickplan_core::provider::GeminiProvider;

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8787;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub provider: ProviderSection,
    #[serde(default)]
    pub client: ClientSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_owned(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSection {
    pub model: String,
    pub base_url: String,
    /// Name of the environment variable holding the provider credential.
    pub api_key_env: String,
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            model: GeminiProvider::DEFAULT_MODEL.to_owned(),
            base_url: GeminiProvider::DEFAULT_BASE_URL.to_owned(),
            api_key_env: ApiKeySource::DEFAULT_VAR.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSection {
    pub endpoint_url: String,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
        }
    }
}

fn default_endpoint_url() -> String {
    format!("http://{DEFAULT_BIND}:{DEFAULT_PORT}{ENDPOINT_PATH}")
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the quickplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/quickplan` or
/// `~/.config/quickplan`, on every platform.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("quickplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("quickplan")
}

/// Return the path to the quickplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Where the terminal app writes its log.
pub fn log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("quickplan")
        .join("quickplan.log")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns `Ok(None)` if it does not
/// exist; a file that exists but does not parse is an error.
pub fn load_config() -> Result<Option<ConfigFile>> {
    let path = config_path();
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(Some(config))
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(path)
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub endpoint_url: Option<String>,
    pub model: Option<String>,
    pub provider_url: Option<String>,
    pub bind: Option<String>,
    pub port: Option<u16>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickplanConfig {
    pub bind: String,
    pub port: u16,
    pub model: String,
    pub provider_url: String,
    pub api_key_env: String,
    pub endpoint_url: String,
}

impl QuickplanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config
    /// file > default.
    ///
    /// - Endpoint URL: `--endpoint-url` > `QUICKPLAN_ENDPOINT_URL` > `client.endpoint_url`
    /// - Model: `--model` > `QUICKPLAN_MODEL` > `provider.model`
    /// - Provider URL: `--provider-url` > `QUICKPLAN_PROVIDER_URL` > `provider.base_url`
    /// - Bind and port: CLI flag > `server.*`
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let file = load_config()?.unwrap_or_default();
        Ok(Self::resolve_with(cli, file))
    }

    /// Resolve against an already loaded config file.
    pub fn resolve_with(cli: &CliOverrides, file: ConfigFile) -> Self {
        let pick = |flag: &Option<String>, var: &str, fallback: String| {
            flag.clone()
                .or_else(|| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
                .unwrap_or(fallback)
        };

        Self {
            endpoint_url: pick(
                &cli.endpoint_url,
                "QUICKPLAN_ENDPOINT_URL",
                file.client.endpoint_url,
            ),
            model: pick(&cli.model, "QUICKPLAN_MODEL", file.provider.model),
            provider_url: pick(
                &cli.provider_url,
                "QUICKPLAN_PROVIDER_URL",
                file.provider.base_url,
            ),
            bind: cli.bind.clone().unwrap_or(file.server.bind),
            port: cli.port.unwrap_or(file.server.port),
            api_key_env: file.provider.api_key_env,
        }
    }

    /// Where the endpoint reads its credential from, on every request.
    pub fn api_key_source(&self) -> ApiKeySource {
        ApiKeySource::Env(self.api_key_env.clone())
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
