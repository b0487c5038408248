//! Client configuration.
//!
//! Values are layered, highest precedence first: command-line flags, their
//! environment variables (clap `env`), the TOML file, built-in defaults.
//! The file is `~/.config/taskboard/config.toml` unless `--config` names
//! another one. Only an explicitly named file has to exist.
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000"
//! channel_capacity = 256
//!
//! [board]
//! collision = "closest-corners"   # or "closest-center", "pointer-within"
//! start_view = "dashboard"        # or "board"
//!
//! [ui]
//! poll_timeout_ms = 50
//! timestamp_format = "%Y-%m-%d %H:%M"
//! recent_tasks = 5
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app::View;
use crate::board::CollisionKind;
use crate::net::{DEFAULT_CHANNEL_CAPACITY, NetConfig};

/// Collaborator used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

const DEFAULT_POLL_TIMEOUT_MS: u64 = 50;
const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
const DEFAULT_RECENT_TASKS: usize = 5;

/// Why a config file could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists, or was named explicitly, but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    ReadFile {
        /// File that was tried.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// The file is not valid TOML for the config layout.
    #[error("invalid config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

/// On-disk layout. Every key is optional.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    api: ApiSection,
    board: BoardSection,
    ui: UiSection,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ApiSection {
    base_url: Option<String>,
    channel_capacity: Option<usize>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct BoardSection {
    collision: Option<CollisionKind>,
    start_view: Option<View>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiSection {
    poll_timeout_ms: Option<u64>,
    timestamp_format: Option<String>,
    recent_tasks: Option<usize>,
}

/// Settings after all layers have been merged.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every API path is resolved against.
    pub api_url: String,
    /// Capacity of the worker's command and event channels.
    pub channel_capacity: usize,
    /// How a drag picks its drop column.
    pub collision: CollisionKind,
    /// View shown at startup.
    pub start_view: View,
    /// How long the event loop waits for input before redrawing.
    pub poll_timeout: Duration,
    /// chrono format for task timestamps.
    pub timestamp_format: String,
    /// Tasks listed on the dashboard.
    pub recent_tasks: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            collision: CollisionKind::default(),
            start_view: View::default(),
            poll_timeout: Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            recent_tasks: DEFAULT_RECENT_TASKS,
        }
    }
}

impl ClientConfig {
    /// Reads the config file and merges it under `cli`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `--config` names a file that cannot be
    /// read, or when any config file found is not valid TOML for this layout.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let fallback = Self::default();
        let ConfigFile { api, board, ui } = file;

        Self {
            api_url: cli
                .api_url
                .clone()
                .or_else(|| api.base_url.clone())
                .unwrap_or(fallback.api_url),
            channel_capacity: api.channel_capacity.unwrap_or(fallback.channel_capacity),
            collision: board.collision.unwrap_or(fallback.collision),
            start_view: cli
                .view
                .or(board.start_view)
                .unwrap_or(fallback.start_view),
            poll_timeout: ui
                .poll_timeout_ms
                .map_or(fallback.poll_timeout, Duration::from_millis),
            timestamp_format: cli
                .timestamp_format
                .clone()
                .or_else(|| ui.timestamp_format.clone())
                .unwrap_or(fallback.timestamp_format),
            recent_tasks: ui.recent_tasks.unwrap_or(fallback.recent_tasks),
        }
    }

    /// Worker settings derived from this config.
    #[must_use]
    pub const fn to_net_config(&self) -> NetConfig {
        NetConfig {
            channel_capacity: self.channel_capacity,
        }
    }
}

/// Command-line interface.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Terminal task board")]
pub struct CliArgs {
    /// Base URL of the task API.
    #[arg(long, env = "TASKBOARD_API_URL")]
    pub api_url: Option<String>,

    /// Config file to use instead of `~/.config/taskboard/config.toml`.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// View to open at startup.
    #[arg(long, value_enum)]
    pub view: Option<View>,

    /// chrono format for task timestamps.
    #[arg(long)]
    pub timestamp_format: Option<String>,

    /// Default log filter; `RUST_LOG` takes precedence.
    #[arg(long, default_value = "info", env = "TASKBOARD_LOG")]
    pub log_level: String,

    /// Log file (default: `$TMPDIR/taskboard.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("taskboard").join("config.toml"))
}

/// Parses the config file, or returns an empty one when the default file
/// does not exist.
fn load_config_file(explicit: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return Ok(ConfigFile::default()),
        },
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if !required && e.kind() == io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(source) => Err(ConfigError::ReadFile { path, source }),
    }
}
