// ABOUTME: Configuration types and parsing for berth.yml.
// ABOUTME: Tool location, helper socket and deadlines, system start and terminal launcher.

mod deserialize;
mod init;

pub use init::init_config;

use crate::backend::{DEFAULT_ACTION_TIMEOUT, DEFAULT_LISTING_TIMEOUT, Deadlines, LocalBackend};
use crate::error::{Error, Result};
use crate::ipc::{HelperClient, default_socket_path};
use crate::sync::DEFAULT_SETTLE_DELAY;
use crate::tool::{DEFAULT_TOOL_NAME, Executor, default_candidates, default_search_dirs, locate};
use deserialize::{deserialize_candidates, deserialize_launcher};
use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "berth.yml";
pub const CONFIG_FILENAME_ALT: &str = "berth.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".berth/config.yml";

/// Overrides the helper socket path.
pub const ENV_SOCKET: &str = "BERTH_SOCKET";
/// Overrides the tool: a path replaces the candidates, a bare name replaces the name.
pub const ENV_TOOL: &str = "BERTH_TOOL";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub tool: ToolConfig,

    #[serde(default)]
    pub helper: HelperConfig,

    #[serde(default)]
    pub system: SystemConfig,

    #[serde(default)]
    pub terminal: TerminalConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    #[serde(default = "default_tool_name")]
    pub name: String,

    #[serde(
        default = "default_candidate_list",
        deserialize_with = "deserialize_candidates"
    )]
    pub candidates: NonEmpty<PathBuf>,

    #[serde(default = "default_search_dirs")]
    pub search_dirs: Vec<PathBuf>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            name: default_tool_name(),
            candidates: default_candidate_list(),
            search_dirs: default_search_dirs(),
        }
    }
}

fn default_tool_name() -> String {
    DEFAULT_TOOL_NAME.to_string()
}

fn default_candidate_list() -> NonEmpty<PathBuf> {
    NonEmpty::from_vec(default_candidates())
        .unwrap_or_else(|| NonEmpty::new(PathBuf::from(DEFAULT_TOOL_NAME)))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HelperConfig {
    #[serde(default = "default_socket_path")]
    pub socket: PathBuf,

    #[serde(default = "default_listing_timeout", with = "humantime_serde")]
    pub listing_timeout: Duration,

    #[serde(default = "default_action_timeout", with = "humantime_serde")]
    pub action_timeout: Duration,
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            socket: default_socket_path(),
            listing_timeout: DEFAULT_LISTING_TIMEOUT,
            action_timeout: DEFAULT_ACTION_TIMEOUT,
        }
    }
}

fn default_listing_timeout() -> Duration {
    DEFAULT_LISTING_TIMEOUT
}

fn default_action_timeout() -> Duration {
    DEFAULT_ACTION_TIMEOUT
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemConfig {
    /// Start the container system before the first command if it is down.
    #[serde(default)]
    pub auto_start: bool,

    #[serde(default = "default_settle_delay", with = "humantime_serde")]
    pub settle_delay: Duration,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            auto_start: false,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

fn default_settle_delay() -> Duration {
    DEFAULT_SETTLE_DELAY
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerminalConfig {
    /// Command prefix that opens a terminal running the remaining arguments.
    #[serde(default = "default_launcher", deserialize_with = "deserialize_launcher")]
    pub launcher: NonEmpty<String>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            launcher: default_launcher(),
        }
    }
}

fn default_launcher() -> NonEmpty<String> {
    let (head, tail): (&str, &[&str]) = if cfg!(target_os = "macos") {
        ("open", &["-a", "Terminal", "--args"])
    } else {
        ("x-terminal-emulator", &["-e"])
    };
    NonEmpty {
        head: head.to_string(),
        tail: tail.iter().map(|s| s.to_string()).collect(),
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Explicit file if given, else a discovered one, else defaults.
    /// Environment overrides are applied last.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::load(path)?,
            None => match Self::discover(dir) {
                Ok(config) => config,
                Err(Error::ConfigNotFound(_)) => Self::default(),
                Err(e) => return Err(e),
            },
        };
        Ok(config.with_env_overrides())
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(socket) = std::env::var_os(ENV_SOCKET).filter(|v| !v.is_empty()) {
            self.helper.socket = PathBuf::from(socket);
        }
        if let Some(tool) = std::env::var(ENV_TOOL).ok().filter(|v| !v.is_empty()) {
            if tool.contains('/') {
                self.tool.candidates = NonEmpty::new(PathBuf::from(tool));
            } else {
                self.tool.name = tool;
            }
        }
        self
    }

    pub fn deadlines(&self) -> Deadlines {
        Deadlines {
            listing: self.helper.listing_timeout,
            action: self.helper.action_timeout,
        }
    }

    /// Executor for whichever tool binary the locator finds.
    pub fn executor(&self) -> Executor {
        let candidates: Vec<PathBuf> = self.tool.candidates.iter().cloned().collect();
        Executor::new(
            locate(&candidates, &self.tool.name),
            self.tool.search_dirs.clone(),
        )
    }

    pub fn local_backend(&self) -> LocalBackend {
        LocalBackend::new(
            self.executor(),
            self.deadlines(),
            self.terminal.launcher.iter().cloned().collect(),
        )
    }

    pub fn helper_client(&self) -> HelperClient {
        HelperClient::new(self.helper.socket.clone(), self.deadlines())
    }
}
