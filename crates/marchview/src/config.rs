use std::fs;
use std::io;
use std::path::Path;

use motion::MotionScales;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings at {path}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings at {path}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 450,
        }
    }
}

/// Optional TOML settings file; CLI flags override anything set here.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub window: WindowSettings,
    pub motion: MotionScales,
}

pub fn load(path: &Path) -> Result<Settings, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_settings(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write settings");
        file
    }

    #[test]
    fn parses_a_full_settings_file() {
        let file = write_settings(
            r#"
            [window]
            width = 1280
            height = 720

            [motion]
            wheel-divisor = 80.0
            pointer-divisor-x = 100.0
            pointer-divisor-y = 200.0
            key-step = 0.05
            "#,
        );

        let settings = load(file.path()).expect("settings load");
        assert_eq!(settings.window.width, 1280);
        assert_eq!(settings.window.height, 720);
        assert_eq!(settings.motion.wheel_divisor, 80.0);
        assert_eq!(settings.motion.pointer_divisor_x, 100.0);
        assert_eq!(settings.motion.pointer_divisor_y, 200.0);
        assert_eq!(settings.motion.key_step, 0.05);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let file = write_settings("[window]\nwidth = 1024\n");

        let settings = load(file.path()).expect("settings load");
        assert_eq!(settings.window.width, 1024);
        assert_eq!(settings.window.height, 450);
        assert_eq!(settings.motion, MotionScales::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_settings("[motion]\nwheel-speed = 2.0\n");
        assert!(matches!(load(file.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn missing_file_reports_a_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.toml");
        assert!(matches!(load(&path), Err(ConfigError::Read { .. })));
    }
}
