//! Configuration resolution from CLI args, environment and config file
//!
//! Precedence, highest first: command-line flags, environment variables,
//! the TOML config file, built-in defaults.

use crate::cli::Args;
use crate::error::{CliError, SESSION_ENV};
use aoc_http_client::{AocClient, DEFAULT_TIMEOUT};
use aoc_puzzle::RefreshPolicy;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Environment variable overriding the cache directory
pub const CACHE_DIR_ENV: &str = "AOC_CACHE_DIR";

/// Resolved runtime configuration
pub struct Config {
    /// Session cookie (zeroized on drop)
    pub session: Zeroizing<String>,
    /// Cache directory path
    pub cache_dir: PathBuf,
    /// Network timeout per request
    pub timeout: Duration,
    /// Re-scrape policy after solving part 1
    pub refresh: RefreshPolicy,
    /// Alternative service location
    pub base_url: Option<String>,
    /// Custom `User-Agent`
    pub user_agent: Option<String>,
    /// Quiet mode
    pub quiet: bool,
}

/// Recognized config file keys; anything else is reported and ignored
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    cache_dir: Option<PathBuf>,
    timeout: Option<String>,
    refresh_attempts: Option<u32>,
    refresh_backoff: Option<String>,
    base_url: Option<String>,
    user_agent: Option<String>,
    #[serde(flatten)]
    unknown: BTreeMap<String, toml::Value>,
}

impl FileConfig {
    fn read(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let file = Self::parse(&text)
            .map_err(|e| CliError::Config(format!("Invalid config {}: {}", path.display(), e)))?;
        for key in file.unknown.keys() {
            warn!(%key, path = %path.display(), "ignoring unknown config key");
        }
        debug!(path = %path.display(), "loaded config file");
        Ok(file)
    }

    fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

impl Config {
    /// Build config from CLI args, the environment and the config file
    ///
    /// Fails before any command runs when no session is available.
    pub fn load(args: &Args) -> Result<Self, CliError> {
        let session = session_from(std::env::var(SESSION_ENV).ok())?;

        let file = match &args.config {
            Some(path) => FileConfig::read(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => FileConfig::read(&path)?,
                _ => FileConfig::default(),
            },
        };

        let env_cache_dir = std::env::var_os(CACHE_DIR_ENV).map(PathBuf::from);
        Self::resolve(args, session, env_cache_dir, file)
    }

    fn resolve(
        args: &Args,
        session: Zeroizing<String>,
        env_cache_dir: Option<PathBuf>,
        file: FileConfig,
    ) -> Result<Self, CliError> {
        let cache_dir = args
            .cache_dir
            .clone()
            .or(env_cache_dir)
            .or(file.cache_dir)
            .or_else(default_cache_dir)
            .ok_or_else(|| {
                CliError::Config("No cache directory: pass --cache-dir".to_string())
            })?;
        // Resolve cache directory (expand ~)
        let cache_dir = expand_tilde(&cache_dir);

        let timeout = match &file.timeout {
            Some(value) => parse_duration("timeout", value)?,
            None => DEFAULT_TIMEOUT,
        };

        let defaults = RefreshPolicy::default();
        let refresh = RefreshPolicy {
            attempts: file.refresh_attempts.unwrap_or(defaults.attempts),
            initial_backoff: match &file.refresh_backoff {
                Some(value) => parse_duration("refresh_backoff", value)?,
                None => defaults.initial_backoff,
            },
        };

        Ok(Config {
            session,
            cache_dir,
            timeout,
            refresh,
            base_url: file.base_url,
            user_agent: file.user_agent,
            quiet: args.quiet,
        })
    }

    /// HTTP client carrying the session, timeout and endpoint settings
    pub fn http_client(&self) -> Result<AocClient, CliError> {
        let mut builder = AocClient::builder()
            .session(self.session.as_str())
            .timeout(self.timeout);
        if let Some(url) = &self.base_url {
            builder = builder.base_url(url.as_str())?;
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        Ok(builder.build()?)
    }
}

/// Validate the credential from the environment
fn session_from(value: Option<String>) -> Result<Zeroizing<String>, CliError> {
    let session = Zeroizing::new(value.ok_or(CliError::MissingSession)?);
    if session.trim().is_empty() {
        return Err(CliError::MissingSession);
    }
    Ok(session)
}

fn parse_duration(key: &str, value: &str) -> Result<Duration, CliError> {
    humantime::parse_duration(value)
        .map_err(|e| CliError::Config(format!("Invalid duration for `{}`: {}", key, e)))
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("aoc").join("config.toml"))
}

fn default_cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("aoc"))
}

/// Expand ~ to home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str()
        && let Some(rest) = path_str
            .strip_prefix("~/")
            .or_else(|| (path_str == "~").then_some(""))
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}
