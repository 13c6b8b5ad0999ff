use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use verso_core::order::DEFAULT_ORDER;
use verso_core::{PanelContent, PentagonOrder, Scene, SceneError, Variant};

/// One panel: an image path (relative to the config directory) or text.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct PanelConfig {
    pub image: Option<PathBuf>,
    pub text: Option<String>,
}

impl PanelConfig {
    pub fn to_content(&self, base: &Path) -> PanelContent {
        match (&self.image, &self.text) {
            (Some(path), _) => PanelContent::image(base.join(path)),
            (None, Some(text)) => PanelContent::text(text.clone()),
            (None, None) => PanelContent::text(""),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub variant: Variant,
    /// Mobile breakpoint override, in pixels.
    pub breakpoint: Option<f64>,
    /// Back slot -> front panel pairing.
    pub order: Option<Vec<usize>>,
    #[serde(default)]
    pub front: Vec<PanelConfig>,
    #[serde(default)]
    pub back: Vec<PanelConfig>,
}

impl Config {
    /// The bundled default scene.
    pub fn builtin() -> Self {
        parse(DEFAULT_CONFIG).unwrap_or_else(|e| {
            log::error!("Bundled config is invalid: {}", e);
            Self::default()
        })
    }

    /// Builds the scene with image paths resolved against the config directory.
    pub fn build(&self, variant: Option<Variant>) -> Result<Scene, ConfigError> {
        self.build_in(&base_dir(), variant)
    }

    /// Like [`Config::build`], but a config that does not describe a valid
    /// scene is logged and replaced by the bundled one.
    pub fn build_or_builtin(&self, variant: Option<Variant>) -> Result<Scene, ConfigError> {
        self.build_in_or_builtin(&base_dir(), variant)
    }

    fn build_in_or_builtin(
        &self,
        base: &Path,
        variant: Option<Variant>,
    ) -> Result<Scene, ConfigError> {
        self.build_in(base, variant).or_else(|e| {
            log::error!("Config does not describe a valid scene, using defaults: {}", e);
            Self::builtin().build_in(base, variant)
        })
    }

    pub fn build_in(&self, base: &Path, variant: Option<Variant>) -> Result<Scene, ConfigError> {
        let mut tuning = variant.unwrap_or(self.variant).tuning();
        if let Some(breakpoint) = self.breakpoint {
            tuning.breakpoint = breakpoint;
        }

        let order = match &self.order {
            Some(order) => PentagonOrder::new(order.clone())?,
            None if self.front.len() == DEFAULT_ORDER.len() => PentagonOrder::default(),
            None => PentagonOrder::identity(self.front.len()),
        };

        let contents = |panels: &[PanelConfig]| -> Vec<PanelContent> {
            panels.iter().map(|p| p.to_content(base)).collect()
        };

        Ok(Scene::new(
            contents(&self.front),
            contents(&self.back),
            order,
            tuning,
        )?)
    }

    /// A file that names no panels keeps its settings but borrows the
    /// bundled panels.
    fn or_builtin_panels(self) -> Self {
        if self.front.is_empty() && self.back.is_empty() {
            Self {
                variant: self.variant,
                breakpoint: self.breakpoint,
                ..Self::builtin()
            }
        } else {
            self
        }
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
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

const CONFIG_FILE: &str = "config.toml";
const DEFAULT_CONFIG: &str = include_str!("default_config.toml");
/// Editors save in bursts; events this close together trigger one reload.
const RELOAD_SETTLE: Duration = Duration::from_millis(150);

fn parse(toml: &str) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn config_dir() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("org", "verso", "verso")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(ConfigError::ConfigDirNotFound)
}

pub fn config_file() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

fn base_dir() -> PathBuf {
    config_dir().unwrap_or_default()
}

/// Reads `path` layered under `VERSO_*` environment variables.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("VERSO"))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default() -> Config {
    match config_file() {
        Ok(path) => load_or_default_from(&path),
        Err(e) => {
            log::error!("{}, using defaults", e);
            Config::builtin()
        }
    }
}

fn load_or_default_from(path: &Path) -> Config {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Config::builtin();
    }

    match read_config(path) {
        Ok(c) => c.or_builtin_panels(),
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            Config::builtin()
        }
    }
}

/// The scene to show: the user's config when it is usable, the bundled
/// one otherwise.
pub fn load_scene(variant: Option<Variant>) -> Result<Scene, ConfigError> {
    load_or_default().build_or_builtin(variant)
}

/// Writes the bundled config unless one exists. Returns its path.
pub fn write_default_config() -> Result<PathBuf, ConfigError> {
    let path = config_file()?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if path.exists() {
        log::info!("Keeping existing config at {}", path.display());
    } else {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

/// Whether a filesystem event changed the config file itself.
fn touches_config(event: &notify::Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

/// Watches the config file and sends one [`AppEvent::ConfigReload`] per
/// burst of changes. Runs until the receiving side goes away.
pub async fn watch_config(tx: Sender<AppEvent>) {
    if let Err(e) = run_watcher(tx).await {
        log::error!("Config watcher stopped: {}", e);
    }
}

async fn run_watcher(tx: Sender<AppEvent>) -> Result<(), ConfigError> {
    let config_path = config_file()?;
    let config_dir = config_dir()?;
    // watch the directory: editors often replace the file rather than write it
    fs_err::create_dir_all(&config_dir)?;

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(&config_dir, RecursiveMode::NonRecursive)?;
    log::debug!("Watching {}", config_path.display());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) if touches_config(&event, &config_path) => {
                tokio::time::sleep(RELOAD_SETTLE).await;
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
    use notify::event::{AccessKind, CreateKind, ModifyKind};
    use verso_core::{AssetState, Layer};

    fn scratch_config(name: &str, toml: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("verso-{}-{}", name, std::process::id()));
        fs_err::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE);
        fs_err::write(&path, toml).unwrap();
        path
    }

    #[test]
    fn test_builtin_config_builds_a_ready_scene() {
        let config = Config::builtin();
        assert_eq!(config.front.len(), 5);
        assert_eq!(config.back.len(), 5);

        let scene = config.build_in(Path::new("/tmp"), None).unwrap();
        assert!(scene.is_ready(Layer::Front));
        assert!(scene.is_ready(Layer::Back));
        assert_eq!(scene.order(), &PentagonOrder::default());
    }

    #[test]
    fn test_parse_panels_and_variant() {
        let config = parse(
            r#"
            variant = "Orbit"
            breakpoint = 600.0
            order = [1, 0, 2]

            [[front]]
            image = "one.png"
            [[front]]
            text = "two"
            [[front]]
            text = "three"

            [[back]]
            text = "a"
            [[back]]
            text = "b"
            [[back]]
            text = "c"
            "#,
        )
        .unwrap();

        assert_eq!(config.variant, Variant::Orbit);
        assert_eq!(
            config.front[0].to_content(Path::new("/srv/verso")),
            PanelContent::image("/srv/verso/one.png")
        );
        assert_eq!(
            PanelConfig::default().to_content(Path::new("/srv/verso")),
            PanelContent::text("")
        );

        let scene = config.build_in(Path::new("/srv/verso"), None).unwrap();
        assert_eq!(scene.tuning().breakpoint, 600.0);
        assert_eq!(scene.tuning().back.max_offset, 3.0);
        assert_eq!(scene.order().front_of(0), Some(1));
        assert_eq!(scene.panels(Layer::Front)[0].asset, AssetState::Pending);
        assert!(scene.panels(Layer::Front)[2].asset.is_ready());
        assert!(!scene.is_ready(Layer::Front));
    }

    #[test]
    fn test_variant_override_wins() {
        let scene = Config::builtin()
            .build_in(Path::new("/tmp"), Some(Variant::Drift))
            .unwrap();
        assert_eq!(scene.tuning().back.max_offset, 1.5);
    }

    #[test]
    fn test_bad_order_is_rejected() {
        let mut config = Config::builtin();
        config.order = Some(vec![0, 0, 1, 2, 3]);
        assert!(matches!(
            config.build_in(Path::new("/tmp"), None),
            Err(ConfigError::Scene(SceneError::NotAPermutation { .. }))
        ));
    }

    #[test]
    fn test_unusable_scene_falls_back_to_builtin() {
        let path = scratch_config(
            "mismatch",
            r#"
            [[front]]
            text = "one"
            [[front]]
            text = "two"

            [[back]]
            text = "a"
            "#,
        );
        let config = load_or_default_from(&path);
        assert_eq!(config.front.len(), 2);

        let base = path.parent().unwrap();
        assert!(matches!(
            config.build_in(base, None),
            Err(ConfigError::Scene(SceneError::CountMismatch { front: 2, back: 1 }))
        ));

        let scene = config.build_in_or_builtin(base, Some(Variant::Orbit)).unwrap();
        assert_eq!(scene.len(), 5);
        assert_eq!(scene.tuning().back.max_offset, 3.0);
    }

    #[test]
    fn test_missing_or_broken_file_uses_builtin() {
        let missing = std::env::temp_dir().join("verso-missing-dir/config.toml");
        assert_eq!(load_or_default_from(&missing).front.len(), 5);

        let broken = scratch_config("broken", "front = 3\n[[[");
        assert_eq!(load_or_default_from(&broken).front.len(), 5);
    }

    #[test]
    fn test_settings_only_file_keeps_builtin_panels() {
        let path = scratch_config("settings", "variant = \"drift\"\nbreakpoint = 500.0\n");
        let config = load_or_default_from(&path);
        assert_eq!(config.variant, Variant::Drift);
        assert_eq!(config.breakpoint, Some(500.0));
        assert_eq!(config.front.len(), 5);
    }

    #[test]
    fn test_only_config_file_changes_trigger_reload() {
        let config_path = Path::new("/home/me/.config/verso/config.toml");
        let event = |kind, path: &str| notify::Event::new(kind).add_path(PathBuf::from(path));

        assert!(touches_config(
            &event(
                EventKind::Modify(ModifyKind::Any),
                "/home/me/.config/verso/config.toml"
            ),
            config_path
        ));
        assert!(touches_config(
            &event(
                EventKind::Create(CreateKind::File),
                "/home/me/.config/verso/config.toml"
            ),
            config_path
        ));
        // editor swap files and reads do not count
        assert!(!touches_config(
            &event(
                EventKind::Create(CreateKind::File),
                "/home/me/.config/verso/.config.toml.swp"
            ),
            config_path
        ));
        assert!(!touches_config(
            &event(
                EventKind::Access(AccessKind::Any),
                "/home/me/.config/verso/config.toml"
            ),
            config_path
        ));
    }
}
