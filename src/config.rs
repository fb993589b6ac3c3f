//! Tool configuration loaded from `chyron.toml`.
//!
//! Lookup order: an explicit `--config` path, then `./chyron.toml`,
//! then `~/.config/chyron/config.toml`. A missing file is not an
//! error; every field has a default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::overlay::{LayoutConfig, TimingConfig};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sessionize "All" endpoint for the event.
    pub feed_url: Option<String>,
    /// Codes to leave alone even when a recording exists.
    pub skip: Vec<String>,
    pub paths: PathsConfig,
    pub render: RenderConfig,
    pub layout: LayoutConfig,
    pub timing: TimingConfig,
}

/// Where recordings come from and renders go.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of the recording store.
    pub store_root: PathBuf,
    /// Intro clip spliced ahead of every talk.
    pub intro: PathBuf,
    /// Scratch directory for downloaded recordings.
    pub work_dir: PathBuf,
    /// Directory the produced files are written to.
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            store_root: PathBuf::from("store"),
            intro: PathBuf::from("assets/intro.mp4"),
            work_dir: PathBuf::from("work"),
            output_dir: PathBuf::from("produced"),
        }
    }
}

/// Switches for a batch run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Truncate output to the configured duration, for fast preview runs.
    pub trimmed: bool,
    /// Push produced files back into the store.
    pub upload: bool,
    /// Stop after the first talk that reaches the encoder.
    pub only_first: bool,
    /// Override the ffmpeg binary found in PATH.
    pub ffmpeg_path: Option<String>,
}

impl Config {
    /// Load configuration, falling back through the lookup order.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let local = PathBuf::from("chyron.toml");
        if local.exists() {
            return Self::from_file(&local);
        }
        let user = user_config_path();
        if user.exists() {
            return Self::from_file(&user);
        }
        Ok(Self::default())
    }

    /// Parse a specific configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("invalid TOML in {}", path.display()))?;
        Ok(config)
    }
}

fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chyron")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.feed_url, None);
        assert!(config.skip.is_empty());
        assert_eq!(config.paths.work_dir, PathBuf::from("work"));
        assert_eq!(config.layout.title_width, 35);
        assert_eq!(config.timing.trim_end, 25.0);
        assert!(!config.render.trimmed);
        assert!(!config.render.upload);
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
feed_url = "https://sessionize.com/api/v2/abc123/view/All"
skip = ["keynote-opening", "panel-discussion"]

[paths]
store_root = "/data/container"
intro = "/data/intro.mp4"
work_dir = "/tmp/chyron"
output_dir = "/data/produced"

[render]
trimmed = true
upload = true
only_first = true
ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"

[layout]
title_width = 40
title_spacing = 80

[timing]
title_start = 2.0
trim_end = 30.0
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.feed_url.as_deref(),
            Some("https://sessionize.com/api/v2/abc123/view/All")
        );
        assert_eq!(config.skip.len(), 2);
        assert_eq!(config.paths.store_root, PathBuf::from("/data/container"));
        assert!(config.render.trimmed);
        assert!(config.render.only_first);
        assert_eq!(config.render.ffmpeg_path.as_deref(), Some("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(config.layout.title_width, 40);
        assert_eq!(config.layout.title_spacing, 80);
        assert_eq!(config.timing.title_start, 2.0);
        assert_eq!(config.timing.trim_end, 30.0);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let toml_str = r#"
[timing]
title_start = 2.0
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.timing.title_start, 2.0);
        assert_eq!(config.timing.title_end, 12.0);
        assert_eq!(config.timing.speaker_end, 24.0);
        assert_eq!(config.layout.title_base_y, 200);
    }

    #[test]
    fn from_file_reads_and_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chyron.toml");
        std::fs::write(&path, "skip = [\"done-talk\"]\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.skip, vec!["done-talk"]);
    }

    #[test]
    fn from_file_missing_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::from_file(&dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chyron.toml");
        std::fs::write(&path, "skip = not-a-list").unwrap();
        assert!(Config::from_file(&path).is_err());
    }
}
