use crate::events::AppEvent;
use async_channel::Sender;
use derive_more::{Deref, From};
use directories::ProjectDirs;
use drum::Tuning;
use drum::categories::{Categories, CategoriesError, Category};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::Srgb;
use palette::rgb::FromHexError;
use serde::Deserialize;
use serde_with::DeserializeFromStr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

// editors tend to save in several steps
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(150);

/// `#rrggbb` or `#rgb` colour from the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DeserializeFromStr, Deref, From)]
pub struct HexColor(Srgb<u8>);

impl FromStr for HexColor {
    type Err = FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<Srgb<u8>>().map(Self)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    pub name: Category,
    #[serde(default)]
    pub color: Option<HexColor>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub selected: Option<Category>,
    #[serde(default)]
    pub tuning: Tuning,
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

impl Config {
    /// The configuration shipped with the binary.
    pub fn builtin() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Toml,
            ))
            .build()
            .and_then(|c| c.try_deserialize())
            .unwrap_or_else(|e| {
                log::error!("Built-in config is invalid: {}", e);
                Self::default()
            })
    }

    pub fn categories(&self) -> Result<Categories, CategoriesError> {
        Categories::try_new(self.categories.iter().map(|c| c.name.clone()))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid categories: {0}")]
    Categories(#[from] CategoriesError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "drum", "wheel").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_from(&get_config_path()?)
}

fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let cfg: Config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        // WHEEL_SELECTED, WHEEL_TUNING__FRICTION, ...
        .add_source(
            config::Environment::with_prefix("WHEEL")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()?;

    // an empty file behaves like no file
    if cfg.categories.is_empty() {
        log::warn!("No categories configured in {}", path.display());
    }
    cfg.categories()?;
    Ok(cfg)
}

/// Loads the user config, writing the default file on first run. Any
/// failure falls back to the built-in configuration.
pub fn load_or_setup() -> Config {
    match write_default_config() {
        Ok(path) => log::debug!("Using config at {}", path.display()),
        Err(e) => log::warn!("Could not write default config: {}", e),
    }

    match load_config() {
        Ok(c) => or_builtin(c),
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            Config::builtin()
        }
    }
}

/// Re-reads the user config after a change on disk. Unlike
/// [`load_or_setup`], errors are returned so the caller can keep what it has.
pub fn reload_config() -> Result<Config, ConfigError> {
    load_config().map(or_builtin)
}

// a config without categories gets the shipped ones
fn or_builtin(cfg: Config) -> Config {
    if cfg.categories.is_empty() {
        Config::builtin()
    } else {
        cfg
    }
}

pub fn write_default_config() -> Result<PathBuf, ConfigError> {
    let path = get_config_path()?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
        log::info!("Wrote default config to {}", path.display());
    }
    Ok(path)
}

fn is_meaningful(event: &notify::Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    if let Err(e) = watch(tx).await {
        log::error!("Config watcher stopped: {}", e);
    }
}

async fn watch(tx: Sender<AppEvent>) -> Result<(), ConfigError> {
    let config_path = get_config_path()?;
    let config_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .ok_or(ConfigError::ConfigDirNotFound)?;
    fs_err::create_dir_all(&config_dir)?;

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    // watch the directory so editors that replace the file are still seen
    watcher.watch(&config_dir, RecursiveMode::NonRecursive)?;

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) if is_meaningful(&event, &config_path) => {
                tokio::time::sleep(RELOAD_DEBOUNCE).await;
                while bridge_rx.try_recv().is_ok() {}

                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_deserialization() {
        let cases = vec![
            ("\"#ff6b6b\"", Srgb::new(0xff, 0x6b, 0x6b)),
            ("\"#4ECDC4\"", Srgb::new(0x4e, 0xcd, 0xc4)),
            ("\"45b7d1\"", Srgb::new(0x45, 0xb7, 0xd1)),
        ];

        for (json, expected) in cases {
            let color: HexColor = serde_json::from_str(json).unwrap();
            assert_eq!(*color, expected);
        }

        assert!(serde_json::from_str::<HexColor>("\"#zzzzzz\"").is_err());
    }

    #[test]
    fn test_category_config_optional_fields() {
        let cfg: CategoryConfig = serde_json::from_str(r#"{ "name": "Music" }"#).unwrap();
        assert_eq!(cfg.name.as_str(), "Music");
        assert!(cfg.color.is_none());
        assert!(cfg.icon.is_none());
        assert!(cfg.description.is_none());
    }

    #[test]
    fn test_config_json_shape() {
        let cfg: Config = serde_json::from_str(
            r##"{
                "selected": "B",
                "tuning": { "friction": 0.9 },
                "categories": [{ "name": "A", "color": "#000000" }, { "name": "B" }]
            }"##,
        )
        .unwrap();
        assert_eq!(cfg.selected.as_ref().map(Category::as_str), Some("B"));
        assert_eq!(cfg.tuning.friction, 0.9);
        assert_eq!(cfg.tuning.sensitivity, drum::SENSITIVITY);
        assert_eq!(cfg.categories().unwrap().len(), 2);
    }

    #[test]
    fn test_builtin_config() {
        let cfg = Config::builtin();
        let categories = cfg.categories().unwrap();
        assert_eq!(categories.len(), 12);
        assert_eq!(categories.get(0).map(Category::as_str), Some("Knowledge"));
        assert!(cfg.categories.iter().all(|c| c.color.is_some()));
        assert_eq!(cfg.tuning, Tuning::default());
        assert!(cfg.selected.is_none());
    }

    #[test]
    fn test_duplicate_categories_rejected() {
        let cfg: Config = serde_json::from_str(
            r#"{ "categories": [{ "name": "A" }, { "name": "A" }] }"#,
        )
        .unwrap();
        assert!(cfg.categories().is_err());
    }

    #[test]
    fn test_empty_categories_fall_back_to_builtin() {
        let cfg = or_builtin(Config {
            selected: Some(Category::from("Music")),
            ..Config::default()
        });
        assert_eq!(cfg.categories.len(), 12);
        assert!(cfg.selected.is_none());

        let own: Config =
            serde_json::from_str(r#"{ "categories": [{ "name": "A" }] }"#).unwrap();
        assert_eq!(or_builtin(own).categories.len(), 1);
    }

    // the only test touching WHEEL_* variables, so nothing races on them
    #[test]
    fn test_load_from_file_and_env() {
        let dir = std::env::temp_dir().join(format!("wheel-config-{}", std::process::id()));
        fs_err::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs_err::write(
            &path,
            r##"
selected = "A"

[tuning]
friction = 0.8

[[categories]]
name = "A"
color = "#102030"

[[categories]]
name = "B"
icon = "b"
"##,
        )
        .unwrap();

        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.selected, Some(Category::from("A")));
        assert_eq!(cfg.tuning.friction, 0.8);
        assert_eq!(cfg.categories().unwrap().len(), 2);
        assert_eq!(cfg.categories[0].color.map(|c| *c), Some(Srgb::new(0x10, 0x20, 0x30)));

        unsafe {
            std::env::set_var("WHEEL_SELECTED", "B");
            std::env::set_var("WHEEL_TUNING__SNAP_DURATION_MS", "120");
        }
        let from_env = load_from(&path);
        let missing = load_from(&dir.join("missing.toml"));
        unsafe {
            std::env::remove_var("WHEEL_SELECTED");
            std::env::remove_var("WHEEL_TUNING__SNAP_DURATION_MS");
        }
        fs_err::remove_dir_all(&dir).unwrap();

        let from_env = from_env.unwrap();
        assert_eq!(from_env.selected, Some(Category::from("B")));
        assert_eq!(from_env.tuning.snap_duration_ms, 120.0);
        assert_eq!(from_env.tuning.friction, 0.8);

        let missing = missing.unwrap();
        assert_eq!(missing.selected, Some(Category::from("B")));
        assert!(missing.categories.is_empty());
    }
}
