//! Viewer configuration: defaults, optional JSON file, then CLI flags.
//!
//! The config file is only ever read.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scene::environment::BACKGROUND_COLOR;
use crate::session::{SessionConfig, DEFAULT_VELOCITY};

const CONFIG_FILE: &str = "config.json";

/// All viewer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Directory of flag descriptions
    pub library_dir: PathBuf,
    /// Image shown at startup
    pub initial_image: Option<String>,
    /// Per-frame depth step
    pub velocity: f32,
    pub align_meshes: bool,
    /// Initial window size in points
    pub window_size: [f32; 2],
    /// Scene background RGB
    pub background_color: [u8; 3],
    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            library_dir: PathBuf::from("demos/library"),
            initial_image: None,
            velocity: DEFAULT_VELOCITY,
            align_meshes: false,
            window_size: [1280.0, 800.0],
            background_color: BACKGROUND_COLOR,
            log_filter: "flagwave=info,flagwave_gui_lib=info".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Platform config location, e.g. `~/.config/flagwave/config.json`
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "flagwave", "flagwave")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults, overlaid by the config file if one exists.
    ///
    /// An explicit path must exist; the platform default may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Defaults, config file, then command line flags
    pub fn resolve(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::load(args.config.as_deref())?;
        args.apply_to(&mut config);
        Ok(config)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            image_id: self.initial_image.clone(),
            velocity: self.velocity,
            align_meshes: self.align_meshes,
            width: self.window_size[0].max(1.0) as u32,
            height: self.window_size[1].max(1.0) as u32,
            background: self.background_color,
        }
    }
}

/// Command line flags; each one set overrides the config file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub library: Option<PathBuf>,
    pub image: Option<String>,
    pub velocity: Option<f32>,
    pub align: bool,
}

impl CliArgs {
    /// Parse flags, without the program name
    pub fn parse<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut out = Self::default();
        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "--align" => out.align = true,
                "--config" | "--library" | "--image" | "--velocity" => {
                    let value = args.get(i + 1).ok_or_else(|| ConfigError::InvalidArgument {
                        flag: flag.to_string(),
                        message: "missing value".to_string(),
                    })?;
                    match flag {
                        "--config" => out.config = Some(PathBuf::from(value)),
                        "--library" => out.library = Some(PathBuf::from(value)),
                        "--image" => out.image = Some(value.clone()),
                        _ => out.velocity = Some(parse_velocity(value)?),
                    }
                    i += 1;
                }
                other => {
                    return Err(ConfigError::InvalidArgument {
                        flag: other.to_string(),
                        message: "unknown flag".to_string(),
                    })
                }
            }
            i += 1;
        }
        Ok(out)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::parse(std::env::args().skip(1))
    }

    pub fn apply_to(&self, config: &mut ViewerConfig) {
        if let Some(dir) = &self.library {
            config.library_dir = dir.clone();
        }
        if let Some(image) = &self.image {
            config.initial_image = Some(image.clone());
        }
        if let Some(v) = self.velocity {
            config.velocity = v;
        }
        if self.align {
            config.align_meshes = true;
        }
    }
}

fn parse_velocity(value: &str) -> Result<f32, ConfigError> {
    let invalid = |message: &str| ConfigError::InvalidArgument {
        flag: "--velocity".to_string(),
        message: format!("{message}: '{value}'"),
    };
    let v: f32 = value.parse().map_err(|_| invalid("not a number"))?;
    if !v.is_finite() || v < 0.0 {
        return Err(invalid("must be a non-negative number"));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = ViewerConfig::default();
        assert_eq!(c.velocity, 0.002);
        assert_eq!(c.background_color, [0xe9, 0xd5, 0xe9]);
        assert!(!c.align_meshes);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let c: ViewerConfig = serde_json::from_str(r#"{ "velocity": 0.01 }"#).unwrap();
        assert_eq!(c.velocity, 0.01);
        assert_eq!(c.window_size, [1280.0, 800.0]);
    }

    #[test]
    fn test_parse_all_flags() {
        let args = CliArgs::parse([
            "--library", "/tmp/lib", "--image", "fr", "--velocity", "0.05", "--align",
        ])
        .unwrap();
        assert_eq!(args.library, Some(PathBuf::from("/tmp/lib")));
        assert_eq!(args.image.as_deref(), Some("fr"));
        assert_eq!(args.velocity, Some(0.05));
        assert!(args.align);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            CliArgs::parse(["--velocity", "-1"]),
            Err(ConfigError::InvalidArgument { .. })
        ));
        assert!(CliArgs::parse(["--velocity", "fast"]).is_err());
        assert!(CliArgs::parse(["--image"]).is_err());
        assert!(CliArgs::parse(["--fullscreen"]).is_err());
    }

    #[test]
    fn test_flags_override_file_values() {
        let mut c = ViewerConfig {
            velocity: 0.01,
            initial_image: Some("de".into()),
            ..Default::default()
        };
        let args = CliArgs::parse(["--image", "fr"]).unwrap();
        args.apply_to(&mut c);
        assert_eq!(c.initial_image.as_deref(), Some("fr"));
        assert_eq!(c.velocity, 0.01);
    }

    #[test]
    fn test_session_config_mirrors_viewer_config() {
        let c = ViewerConfig {
            align_meshes: true,
            ..Default::default()
        };
        let s = c.session_config();
        assert!(s.align_meshes);
        assert_eq!((s.width, s.height), (1280, 800));
    }
}
