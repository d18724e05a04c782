//! Application configuration
//!
//! Configuration loaded from .ci-light.toml file.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// What the poll loop watches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Open pull requests of every repository of a user, one slot per PR
    #[default]
    PullRequests,
    /// Recent workflow runs of a single repository, one slot per run
    WorkflowRuns,
}

/// Colors the indicator can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedColor {
    Green,
    Yellow,
    Orange,
    Red,
    Blue,
    Purple,
    White,
    Black,
}

impl LedColor {
    /// RGB components for hardware bindings
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            LedColor::Green => (0, 255, 0),
            LedColor::Yellow => (255, 255, 0),
            LedColor::Orange => (255, 200, 0),
            LedColor::Red => (255, 0, 0),
            LedColor::Blue => (0, 0, 255),
            LedColor::Purple => (128, 0, 128),
            LedColor::White => (255, 255, 255),
            LedColor::Black => (0, 0, 0),
        }
    }
}

/// Application configuration loaded from .ci-light.toml
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    /// Pipeline to run on every tick
    #[serde(default)]
    pub mode: Mode,

    /// GitHub user whose repositories are scanned (pull-requests mode)
    #[serde(default)]
    pub username: String,

    /// "owner/name" of the repository to watch (workflow-runs mode)
    #[serde(default)]
    pub repository: Option<String>,

    /// REST API root
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Seconds to wait between poll cycles
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Run a single poll cycle and exit
    #[serde(default)]
    pub once: bool,

    /// Items requested per page when listing repositories
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Upper bound on pages fetched from a paged listing
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Number of recent workflow runs inspected (workflow-runs mode)
    #[serde(default = "default_workflow_run_limit")]
    pub workflow_run_limit: u32,

    /// Maximum number of repositories (and PRs per repository) checked at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Overall timeout for one request, including reading the body
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Retries for network failures and 5xx responses
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry, doubled on each further retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    #[serde(default)]
    pub ribbon: RibbonConfig,

    #[serde(default)]
    pub palette: PaletteConfig,
}

/// Indicator geometry and brightness
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RibbonConfig {
    /// Number of LEDs on the device
    #[serde(default = "default_slot_count")]
    pub slot_count: usize,

    #[serde(default)]
    pub brightness: BrightnessConfig,
}

/// Brightness levels for the three ribbon states
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessConfig {
    /// Used right after start, before the first poll finished
    #[serde(default = "default_startup_brightness")]
    pub startup: u8,

    /// Used when nothing is being watched
    #[serde(default = "default_idle_brightness")]
    pub idle: u8,

    /// Used while at least one status is shown
    #[serde(default = "default_active_brightness")]
    pub active: u8,
}

/// Color for every status and pseudo status
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PaletteConfig {
    #[serde(default = "default_completed_color")]
    pub completed: LedColor,

    #[serde(default = "default_in_progress_color")]
    pub in_progress: LedColor,

    #[serde(default = "default_queued_color")]
    pub queued: LedColor,

    #[serde(default = "default_unknown_color")]
    pub unknown: LedColor,

    /// Slots past the end of a non-empty status list
    #[serde(default = "default_idle_color")]
    pub idle: LedColor,

    /// Every slot at startup and when the status list is empty
    #[serde(default = "default_standby_color")]
    pub standby: LedColor,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_page_size() -> u32 {
    100
}

fn default_max_pages() -> u32 {
    1000
}

fn default_workflow_run_limit() -> u32 {
    10
}

fn default_concurrency() -> usize {
    4
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    20
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_slot_count() -> usize {
    9
}

fn default_startup_brightness() -> u8 {
    3
}

fn default_idle_brightness() -> u8 {
    2
}

fn default_active_brightness() -> u8 {
    20
}

fn default_completed_color() -> LedColor {
    LedColor::Green
}

fn default_in_progress_color() -> LedColor {
    LedColor::Yellow
}

fn default_queued_color() -> LedColor {
    LedColor::Orange
}

fn default_unknown_color() -> LedColor {
    LedColor::Red
}

fn default_idle_color() -> LedColor {
    LedColor::Black
}

fn default_standby_color() -> LedColor {
    LedColor::Blue
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            username: String::new(),
            repository: None,
            api_url: default_api_url(),
            poll_interval_secs: default_poll_interval_secs(),
            once: false,
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            workflow_run_limit: default_workflow_run_limit(),
            concurrency: default_concurrency(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            ribbon: RibbonConfig::default(),
            palette: PaletteConfig::default(),
        }
    }
}

impl Default for RibbonConfig {
    fn default() -> Self {
        Self {
            slot_count: default_slot_count(),
            brightness: BrightnessConfig::default(),
        }
    }
}

impl Default for BrightnessConfig {
    fn default() -> Self {
        Self {
            startup: default_startup_brightness(),
            idle: default_idle_brightness(),
            active: default_active_brightness(),
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            completed: default_completed_color(),
            in_progress: default_in_progress_color(),
            queued: default_queued_color(),
            unknown: default_unknown_color(),
            idle: default_idle_color(),
            standby: default_standby_color(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults
    ///
    /// Environment overrides are applied on top of whatever was loaded.
    pub fn load() -> Self {
        let mut config = Self::load_file();
        config.apply_env_overrides();
        config
    }

    fn load_file() -> Self {
        if let Some(content) = crate::load_config_file() {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Apply `CI_LIGHT_USER` and `CI_LIGHT_REPOSITORY` if set
    pub fn apply_env_overrides(&mut self) {
        if let Ok(user) = env::var("CI_LIGHT_USER") {
            log::debug!("Username overridden by CI_LIGHT_USER");
            self.username = user;
        }
        if let Ok(repository) = env::var("CI_LIGHT_REPOSITORY") {
            log::debug!("Repository overridden by CI_LIGHT_REPOSITORY");
            self.repository = Some(repository);
        }
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        match self.mode {
            Mode::PullRequests if self.username.trim().is_empty() => {
                bail!("`username` is required in pull-requests mode (or set CI_LIGHT_USER)")
            }
            Mode::WorkflowRuns => match self.repository.as_deref() {
                None => bail!(
                    "`repository` is required in workflow-runs mode (or set CI_LIGHT_REPOSITORY)"
                ),
                Some(repo) if !is_repository_id(repo) => {
                    bail!("`repository` must look like owner/name, got '{}'", repo)
                }
                Some(_) => {}
            },
            Mode::PullRequests => {}
        }

        if !(1..=100).contains(&self.page_size) {
            bail!("`page_size` must be between 1 and 100, got {}", self.page_size);
        }
        if self.max_pages == 0 {
            bail!("`max_pages` must be at least 1");
        }
        if self.concurrency == 0 {
            bail!("`concurrency` must be at least 1");
        }
        if self.ribbon.slot_count == 0 {
            bail!("`ribbon.slot_count` must be at least 1");
        }

        Ok(())
    }
}

fn is_repository_id(value: &str) -> bool {
    matches!(value.split_once('/'), Some((owner, name))
        if !owner.is_empty() && !name.is_empty() && !name.contains('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pull_request_config() -> AppConfig {
        AppConfig {
            username: "octocat".to_string(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.mode, Mode::PullRequests);
        assert_eq!(config.api_url, "https://api.github.com");
        assert_eq!(config.page_size, 100);
        assert_eq!(config.max_pages, 1000);
        assert_eq!(config.ribbon.slot_count, 9);
        assert_eq!(config.ribbon.brightness.active, 20);
        assert_eq!(config.palette.completed, LedColor::Green);
        assert_eq!(config.palette.standby, LedColor::Blue);
        assert!(!config.once);
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            mode = "workflow-runs"
            repository = "octocat/hello-world"
            once = true

            [ribbon]
            slot_count = 12

            [palette]
            unknown = "purple"
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.mode, Mode::WorkflowRuns);
        assert_eq!(config.repository.as_deref(), Some("octocat/hello-world"));
        assert!(config.once);
        assert_eq!(config.ribbon.slot_count, 12);
        assert_eq!(config.palette.unknown, LedColor::Purple);
        // untouched fields use defaults
        assert_eq!(config.ribbon.brightness.idle, 2);
        assert_eq!(config.palette.in_progress, LedColor::Yellow);
        assert_eq!(config.poll_interval_secs, 60);
    }

    #[test]
    fn test_config_deserialize_rejects_unknown_color() {
        let toml = r#"
            [palette]
            completed = "teal"
        "#;
        assert!(toml::from_str::<AppConfig>(toml).is_err());
    }

    #[test]
    fn test_validate_requires_username_for_pull_requests() {
        assert!(AppConfig::default().validate().is_err());
        assert!(pull_request_config().validate().is_ok());
    }

    #[test]
    fn test_validate_requires_repository_for_workflow_runs() {
        let mut config = AppConfig {
            mode: Mode::WorkflowRuns,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        config.repository = Some("not-a-repo".to_string());
        assert!(config.validate().is_err());

        config.repository = Some("octocat/hello-world".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_limits() {
        let mut config = pull_request_config();
        config.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = pull_request_config();
        config.page_size = 101;
        assert!(config.validate().is_err());

        let mut config = pull_request_config();
        config.concurrency = 0;
        assert!(config.validate().is_err());

        let mut config = pull_request_config();
        config.ribbon.slot_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_led_color_rgb() {
        assert_eq!(LedColor::Black.rgb(), (0, 0, 0));
        assert_eq!(LedColor::Blue.rgb(), (0, 0, 255));
    }
}
