use crate::layout::{CharSet, Layout, LayoutError, RingLevel, Token};
use directories::ProjectDirs;
use keytap::{CommandSink, CommandTemplate};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::path::PathBuf;
use std::time::Duration;
use strum::Display as StrumDisplay;
use thiserror::Error;

#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Stick magnitude at or below which the selection is held.
    pub dead_zone: f64,
    /// Magnitude above which the outer ring is selected.
    pub ring_boundary: f64,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "debounce_ms")]
    pub debounce: Duration,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            dead_zone: 0.1,
            ring_boundary: 0.9,
            debounce: Duration::from_millis(200),
        }
    }
}

/// What to suggest when the transition model has never seen the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, StrumDisplay)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FallbackPolicy {
    #[default]
    CommonWords,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub fallback: FallbackPolicy,
}

/// Per-ring overrides; rings left out keep the built-in tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub default_inner: Option<Vec<Token>>,
    pub default_outer: Option<Vec<Token>>,
    pub alternate_inner: Option<Vec<Token>>,
    pub alternate_outer: Option<Vec<Token>>,
}

impl LayoutConfig {
    pub fn build(&self) -> Result<Layout, LayoutError> {
        let base = Layout::default();
        let pick = |custom: &Option<Vec<Token>>, set, ring| {
            custom
                .clone()
                .unwrap_or_else(|| base.ring(set, ring).to_vec())
        };
        Layout::new(
            [
                pick(&self.default_inner, CharSet::Default, RingLevel::Inner),
                pick(&self.default_outer, CharSet::Default, RingLevel::Outer),
            ],
            [
                pick(&self.alternate_inner, CharSet::Alternate, RingLevel::Inner),
                pick(&self.alternate_outer, CharSet::Alternate, RingLevel::Outer),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct KeysConfig {
    pub type_command: CommandTemplate,
    pub key_command: CommandTemplate,
    /// Log keystrokes instead of injecting them.
    pub dry_run: bool,
}

impl Default for KeysConfig {
    fn default() -> Self {
        let sink = CommandSink::default();
        Self {
            type_command: sink.type_command,
            key_command: sink.key_command,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
    pub background_writes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            background_writes: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub selector: SelectorConfig,
    #[serde(default)]
    pub predictor: PredictorConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub keys: KeysConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// The configured layout, or the built-in one if the override is invalid.
    pub fn layout_or_default(&self) -> Layout {
        self.layout.build().unwrap_or_else(|e| {
            log::error!("Invalid layout in config, using built-in layout: {}", e);
            Layout::default()
        })
    }

    /// Sections of `newer` that differ from `self` but only take effect on restart.
    pub fn restart_sections(&self, newer: &Config) -> Vec<&'static str> {
        let mut sections = Vec::new();
        if self.keys != newer.keys {
            sections.push("keys");
        }
        if self.storage != newer.storage {
            sections.push("storage");
        }
        sections
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("org", "ringtype", "ringtype").ok_or(ConfigError::ConfigDirNotFound)
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

/// Where the corpus files live: the configured override or the per-user data dir.
pub fn get_data_dir(config: &Config) -> Result<PathBuf, ConfigError> {
    match &config.storage.data_dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(project_dirs()?.data_dir().to_path_buf()),
    }
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(environment())
        .build()?;

    Ok(s.try_deserialize()?)
}

/// `RINGTYPE_SELECTOR__DEBOUNCE_MS=300` sets `selector.debounce_ms`.
fn environment() -> config::Environment {
    config::Environment::with_prefix("RINGTYPE")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if !meaningful_event || !event.paths.iter().any(|p| p == &config_path) {
                    continue;
                }
                log::debug!("Config file changed ({:?})", event.kind);
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_environment_overrides_file() {
        let vars = [
            ("RINGTYPE_SELECTOR__DEBOUNCE_MS", "350"),
            ("RINGTYPE_STORAGE__BACKGROUND_WRITES", "false"),
            ("OTHER_SELECTOR__DEAD_ZONE", "0.5"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                "[selector]\ndebounce_ms = 100\n",
                config::FileFormat::Toml,
            ))
            .add_source(environment().source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.selector.debounce, Duration::from_millis(350));
        assert_eq!(config.selector.dead_zone, 0.1);
        assert!(!config.storage.background_writes);
    }

    #[test]
    fn test_restart_sections() {
        let old = Config::default();
        let mut new = Config::default();
        new.selector.dead_zone = 0.2;
        assert!(old.restart_sections(&new).is_empty());

        new.keys.dry_run = true;
        new.storage.data_dir = Some(PathBuf::from("/tmp/ringtype"));
        assert_eq!(old.restart_sections(&new), vec!["keys", "storage"]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse("");
        assert_eq!(config.selector, SelectorConfig::default());
        assert_eq!(config.predictor.fallback, FallbackPolicy::CommonWords);
        assert!(config.storage.background_writes);
        assert!(!config.keys.dry_run);
        assert_eq!(config.layout_or_default(), Layout::default());
    }

    #[test]
    fn test_bundled_default_config_parses() {
        let config = parse(DEFAULT_CONFIG);
        assert_eq!(config.selector, SelectorConfig::default());
        assert_eq!(config.predictor, PredictorConfig::default());
    }

    #[test]
    fn test_selector_and_predictor_overrides() {
        let config = parse(
            r#"
            [selector]
            ring_boundary = 0.95
            debounce_ms = 150

            [predictor]
            fallback = "none"
            "#,
        );
        assert_eq!(config.selector.ring_boundary, 0.95);
        assert_eq!(config.selector.dead_zone, 0.1);
        assert_eq!(config.selector.debounce, Duration::from_millis(150));
        assert_eq!(config.predictor.fallback, FallbackPolicy::None);
    }

    #[test]
    fn test_layout_override() {
        let config = parse(
            r#"
            [layout]
            default_inner = ["⌫", "↵", "."]
            "#,
        );
        let layout = config.layout.build().unwrap();
        assert_eq!(
            layout.ring(CharSet::Default, RingLevel::Inner),
            &[
                Token::Delete,
                Token::Commit,
                Token::Text(".".into())
            ]
        );
        assert_eq!(layout.ring(CharSet::Default, RingLevel::Outer).len(), 26);
    }

    #[test]
    fn test_invalid_layout_falls_back() {
        let config = parse(
            r#"
            [layout]
            alternate_outer = []
            "#,
        );
        assert!(config.layout.build().is_err());
        assert_eq!(config.layout_or_default(), Layout::default());
    }
}
