//! Configuration vault – reads/writes `~/.handwave/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use handwave_runtime::{EngineConfig, FlingStyle};
use handwave_types::{HandwaveError, Rect, ScreenSize, Side};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Geometry of the simulated desktop the `run` command drives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    /// Usable area for snapping and fling reflection; the whole screen when
    /// unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_area: Option<Rect>,
    /// Initial bounds of the one simulated window.
    #[serde(default = "default_window", skip_serializing_if = "Option::is_none")]
    pub window: Option<Rect>,
}

fn default_width() -> f64 {
    1920.0
}
fn default_height() -> f64 {
    1080.0
}
fn default_window() -> Option<Rect> {
    Some(Rect::new(100.0, 100.0, 800.0, 600.0))
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            work_area: None,
            window: default_window(),
        }
    }
}

impl DisplayConfig {
    pub fn screen(&self) -> ScreenSize {
        ScreenSize {
            width: self.width,
            height: self.height,
        }
    }
}

/// Persisted user configuration stored in `~/.handwave/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Return the path to `~/.handwave/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".handwave").join("config.toml")
}

/// Where the effective configuration came from.
#[derive(Debug)]
pub enum ConfigSource {
    File,
    /// No config file; built-in defaults.
    Defaults,
    /// The file exists but could not be read or parsed; built-in defaults.
    Invalid(HandwaveError),
}

/// Load `~/.handwave/config.toml`, falling back to defaults, and apply
/// `HANDWAVE_*` environment overrides on top of whichever was used.
pub fn load_effective() -> (Config, ConfigSource) {
    load_effective_from(&config_path(), |var| std::env::var(var).ok())
}

pub(crate) fn load_effective_from(
    path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> (Config, ConfigSource) {
    let (mut cfg, source) = match load_from(path) {
        Ok(Some(cfg)) => (cfg, ConfigSource::File),
        Ok(None) => (Config::default(), ConfigSource::Defaults),
        Err(e) => (Config::default(), ConfigSource::Invalid(e)),
    };
    apply_overrides(&mut cfg, lookup);
    (cfg, source)
}

pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, HandwaveError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|e| {
        HandwaveError::Config(format!("failed to read config at {}: {e}", path.display()))
    })?;
    toml::from_str(&raw)
        .map(Some)
        .map_err(|e| HandwaveError::Config(format!("failed to parse config: {e}")))
}

/// Apply `HANDWAVE_*` overrides to `cfg`, reading each variable through
/// `lookup`.
///
/// | Variable | Config field |
/// |---|---|
/// | `HANDWAVE_SIGNAL_HAND` | `engine.signal_hand` |
/// | `HANDWAVE_FLING_STYLE` | `engine.fling_style` |
/// | `HANDWAVE_SCREEN_WIDTH` | `display.width` |
/// | `HANDWAVE_SCREEN_HEIGHT` | `display.height` |
///
/// Unparsable values are logged and ignored.
pub(crate) fn apply_overrides(cfg: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("HANDWAVE_SIGNAL_HAND") {
        match v.parse::<Side>() {
            Ok(side) => cfg.engine.signal_hand = side,
            Err(e) => warn!(error = %e, "ignoring HANDWAVE_SIGNAL_HAND"),
        }
    }
    if let Some(v) = lookup("HANDWAVE_FLING_STYLE") {
        match v.parse::<FlingStyle>() {
            Ok(style) => cfg.engine.fling_style = style,
            Err(e) => warn!(error = %e, "ignoring HANDWAVE_FLING_STYLE"),
        }
    }
    if let Some(width) = screen_dimension("HANDWAVE_SCREEN_WIDTH", lookup("HANDWAVE_SCREEN_WIDTH")) {
        cfg.display.width = width;
    }
    if let Some(height) = screen_dimension("HANDWAVE_SCREEN_HEIGHT", lookup("HANDWAVE_SCREEN_HEIGHT")) {
        cfg.display.height = height;
    }
}

fn screen_dimension(var: &str, raw: Option<String>) -> Option<f64> {
    let raw = raw?;
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Some(v),
        _ => {
            warn!(variable = var, value = %raw, "ignoring invalid screen dimension");
            None
        }
    }
}

/// Save the config to disk, creating `~/.handwave/` if necessary.
pub fn save(cfg: &Config) -> Result<(), HandwaveError> {
    save_to(cfg, &config_path())
}

pub(crate) fn save_to(cfg: &Config, path: &Path) -> Result<(), HandwaveError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            HandwaveError::Config(format!("failed to create config directory: {e}"))
        })?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700)).map_err(|e| {
                HandwaveError::Config(format!("failed to set config directory permissions: {e}"))
            })?;
        }
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| HandwaveError::Serialization(format!("failed to serialize config: {e}")))?;
    let write_err =
        |e: std::io::Error| HandwaveError::Config(format!("failed to write config at {}: {e}", path.display()));
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| f.write_all(raw.as_bytes()))
            .map_err(write_err)?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw).map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        (dir, path)
    }

    #[test]
    fn roundtrip_default_config() {
        let (_dir, path) = temp_path();
        save_to(&Config::default(), &path).expect("save");
        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.display.width, 1920.0);
        assert_eq!(loaded.display.window, default_window());
        assert_eq!(loaded.engine.fling_threshold, 10.0);
        assert_eq!(loaded.engine.scroll_delay_scale, 10);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let (_dir, path) = temp_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            "[engine]\nfling_style = \"snap\"\n\n[display]\nheight = 900.0\n",
        )
        .unwrap();
        let loaded = load_from(&path).unwrap().unwrap();
        assert_eq!(loaded.engine.fling_style, FlingStyle::Snap);
        assert_eq!(loaded.engine.volume_delay_scale, 20);
        assert_eq!(loaded.display.height, 900.0);
        assert_eq!(loaded.display.width, 1920.0);
        assert_eq!(loaded.display.work_area, None);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let (_dir, path) = temp_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "engine = [").unwrap();
        assert!(matches!(load_from(&path), Err(HandwaveError::Config(_))));
    }

    #[cfg(unix)]
    #[test]
    fn config_file_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, path) = temp_path();
        save_to(&Config::default(), &path).expect("save");

        let file_mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o600);
        let dir_mode = std::fs::metadata(path.parent().unwrap())
            .unwrap()
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(dir_mode, 0o700);
    }

    #[test]
    fn config_path_points_to_handwave_dir() {
        let p = config_path_for_home("/home/testuser");
        assert_eq!(p, PathBuf::from("/home/testuser/.handwave/config.toml"));
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let (_dir, path) = temp_path();
        assert!(load_from(&path).expect("no error").is_none());
    }

    /// Environment stand-in backed by a fixed list of variables.
    fn vars(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn overrides_set_signal_hand_and_style() {
        let mut cfg = Config::default();
        apply_overrides(
            &mut cfg,
            vars(&[("HANDWAVE_SIGNAL_HAND", "left"), ("HANDWAVE_FLING_STYLE", "Snap")]),
        );
        assert_eq!(cfg.engine.signal_hand, Side::Left);
        assert_eq!(cfg.engine.fling_style, FlingStyle::Snap);
    }

    #[test]
    fn overrides_set_screen_size_and_ignore_garbage() {
        let mut cfg = Config::default();
        apply_overrides(
            &mut cfg,
            vars(&[("HANDWAVE_SCREEN_WIDTH", "2560"), ("HANDWAVE_SCREEN_HEIGHT", "-5")]),
        );
        assert_eq!(cfg.display.width, 2560.0);
        assert_eq!(cfg.display.height, 1080.0);
    }

    #[test]
    fn effective_config_applies_overrides_to_a_loaded_file() {
        let (_dir, path) = temp_path();
        save_to(&Config::default(), &path).unwrap();
        let (cfg, source) = load_effective_from(&path, vars(&[("HANDWAVE_SIGNAL_HAND", "left")]));
        assert!(matches!(source, ConfigSource::File));
        assert_eq!(cfg.engine.signal_hand, Side::Left);
    }

    #[test]
    fn effective_config_applies_overrides_without_a_file() {
        let (_dir, path) = temp_path();
        let (cfg, source) = load_effective_from(&path, vars(&[("HANDWAVE_SCREEN_WIDTH", "1280")]));
        assert!(matches!(source, ConfigSource::Defaults));
        assert_eq!(cfg.display.width, 1280.0);
    }

    #[test]
    fn effective_config_applies_overrides_over_a_malformed_file() {
        let (_dir, path) = temp_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "engine = [").unwrap();
        let (cfg, source) = load_effective_from(&path, vars(&[("HANDWAVE_FLING_STYLE", "snap")]));
        assert!(matches!(source, ConfigSource::Invalid(HandwaveError::Config(_))));
        assert_eq!(cfg.engine.fling_style, FlingStyle::Snap);
        assert_eq!(cfg.display, DisplayConfig::default());
    }
}
