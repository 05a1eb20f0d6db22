use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_ENV_PREFIX: &str = "REELS";
const APP_DIR: &str = "reels-tui";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub ui: UIConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_latency", with = "humantime_serde")]
    pub latency: Duration,
    #[serde(default = "default_snap_tolerance_rows")]
    pub snap_tolerance_rows: i32,
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: f32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            latency: default_latency(),
            snap_tolerance_rows: default_snap_tolerance_rows(),
            visibility_threshold: default_visibility_threshold(),
        }
    }
}

fn default_page_size() -> usize {
    3
}

fn default_latency() -> Duration {
    Duration::from_millis(500)
}

fn default_snap_tolerance_rows() -> i32 {
    1
}

fn default_visibility_threshold() -> f32 {
    crate::visibility::DEFAULT_THRESHOLD
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    #[serde(default = "default_idle_timeout", with = "humantime_serde")]
    pub idle_timeout: Duration,
    #[serde(default = "default_redirect_url")]
    pub redirect_url: String,
    #[serde(default)]
    pub open_redirect: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout: default_idle_timeout(),
            redirect_url: default_redirect_url(),
            open_redirect: false,
        }
    }
}

fn default_idle_timeout() -> Duration {
    Duration::from_secs(5 * 60)
}

fn default_redirect_url() -> String {
    "https://www.google.com".into()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerConfig {
    #[serde(default = "default_video_command")]
    pub video_command: Vec<String>,
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            video_command: default_video_command(),
            autoplay: default_autoplay(),
        }
    }
}

fn default_video_command() -> Vec<String> {
    vec![
        "mpv".into(),
        "--really-quiet".into(),
        "--loop-file=inf".into(),
        "--force-media-title=%TITLE%".into(),
        "%URL%".into(),
    ]
}

fn default_autoplay() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UIConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
        }
    }
}

fn default_theme() -> String {
    "default".into()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    #[serde(default = "default_log_file")]
    pub file: Option<PathBuf>,
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            filter: default_log_filter(),
        }
    }
}

fn default_log_file() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(APP_DIR).join("reels.log"))
}

fn default_log_filter() -> String {
    "info".into()
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub config_file: Option<PathBuf>,
    pub env_prefix: Option<String>,
}

pub fn load(options: LoadOptions) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(path) = options.config_file.as_ref() {
        let from_file = read_config_file(path)?;
        cfg = merge_config(cfg, from_file);
    } else if let Some(default_path) = default_config_path() {
        if default_path.exists() {
            let from_file = read_config_file(&default_path)?;
            cfg = merge_config(cfg, from_file);
        }
    }

    let prefix = options.env_prefix.as_deref().unwrap_or(DEFAULT_ENV_PREFIX);
    apply_env(&mut cfg, prefix);

    Ok(cfg)
}

fn read_config_file(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&data)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
    Ok(config)
}

fn merge_config(mut base: Config, other: Config) -> Config {
    if other.feed.page_size != 0 {
        base.feed.page_size = other.feed.page_size;
    }
    base.feed.latency = other.feed.latency;
    if other.feed.snap_tolerance_rows >= 0 {
        base.feed.snap_tolerance_rows = other.feed.snap_tolerance_rows;
    }
    if other.feed.visibility_threshold > 0.0 && other.feed.visibility_threshold <= 1.0 {
        base.feed.visibility_threshold = other.feed.visibility_threshold;
    }

    if !other.session.idle_timeout.is_zero() {
        base.session.idle_timeout = other.session.idle_timeout;
    }
    if !other.session.redirect_url.is_empty() {
        base.session.redirect_url = other.session.redirect_url;
    }
    base.session.open_redirect = other.session.open_redirect;

    if !other.player.video_command.is_empty() {
        base.player.video_command = other.player.video_command;
    }
    base.player.autoplay = other.player.autoplay;

    if other.catalog.path.is_some() {
        base.catalog.path = other.catalog.path;
    }

    if !other.ui.theme.is_empty() {
        base.ui.theme = other.ui.theme;
    }

    if other.log.file.is_some() {
        base.log.file = other.log.file;
    }
    if !other.log.filter.is_empty() {
        base.log.filter = other.log.filter;
    }

    base
}

/// Applies `<PREFIX>_<SECTION>__<KEY>` variables on top of `cfg`. Values that
/// fail to parse are ignored.
fn apply_env(cfg: &mut Config, prefix: &str) {
    let mut map: HashMap<String, String> = HashMap::new();
    let upper_prefix = format!("{}_", prefix.to_uppercase());

    for (key, value) in env::vars() {
        if let Some(stripped) = key.strip_prefix(&upper_prefix) {
            let normalized = stripped.to_ascii_lowercase().replace("__", ".");
            map.insert(normalized, value);
        }
    }

    for (key, value) in map {
        apply_env_value(cfg, &key, value);
    }
}

fn apply_env_value(cfg: &mut Config, key: &str, value: String) {
    match key {
        "feed.page_size" => {
            if let Ok(parsed) = value.parse::<usize>() {
                if parsed > 0 {
                    cfg.feed.page_size = parsed;
                }
            }
        }
        "feed.latency" => {
            if let Ok(duration) = humantime::parse_duration(&value) {
                cfg.feed.latency = duration;
            }
        }
        "feed.snap_tolerance_rows" => {
            if let Ok(parsed) = value.parse::<i32>() {
                cfg.feed.snap_tolerance_rows = parsed.max(0);
            }
        }
        "feed.visibility_threshold" => {
            if let Ok(parsed) = value.parse::<f32>() {
                if parsed > 0.0 && parsed <= 1.0 {
                    cfg.feed.visibility_threshold = parsed;
                }
            }
        }
        "session.idle_timeout" => {
            if let Ok(duration) = humantime::parse_duration(&value) {
                cfg.session.idle_timeout = duration;
            }
        }
        "session.redirect_url" => cfg.session.redirect_url = value,
        "session.open_redirect" => cfg.session.open_redirect = truthy(&value),
        "player.video_command" => {
            cfg.player.video_command = value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        "player.autoplay" => cfg.player.autoplay = truthy(&value),
        "catalog.path" => cfg.catalog.path = Some(PathBuf::from(value)),
        "ui.theme" => cfg.ui.theme = value,
        "log.file" => cfg.log.file = Some(PathBuf::from(value)),
        "log.filter" => cfg.log.filter = value,
        _ => {}
    }
}

fn truthy(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "True" | "yes")
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.yaml"))
}
