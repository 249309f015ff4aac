use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::errors::TranscodeError;
use crate::style_encoder;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Style applied to every cue
    #[serde(default)]
    pub style: StyleConfig,

    /// External renderer settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// How the outline and shadow are drawn
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    // @style: Outline plus drop shadow
    #[default]
    Outline,
    // @style: Opaque box behind the text
    Box,
}

impl BorderStyle {
    // @returns: ASS BorderStyle code
    pub fn code(&self) -> u8 {
        match self {
            Self::Outline => 1,
            Self::Box => 3,
        }
    }
}

impl std::str::FromStr for BorderStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "outline" | "1" => Ok(Self::Outline),
            "box" | "3" => Ok(Self::Box),
            _ => Err(anyhow::anyhow!("Invalid border style: {}", s)),
        }
    }
}

/// Style record applied uniformly to all cues of one transcode
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StyleConfig {
    #[serde(default = "default_font_family")]
    pub font_family: String,

    #[serde(default = "default_font_size")]
    pub font_size: f64,

    /// Fill color, `#RRGGBB` or `#RGB`
    #[serde(default = "default_primary_color")]
    pub primary_color: String,

    /// Secondary color; also the word highlight color
    #[serde(default = "default_secondary_color")]
    pub secondary_color: String,

    #[serde(default = "default_outline_color")]
    pub outline_color: String,

    /// Shadow or box color
    #[serde(default = "default_background_color")]
    pub background_color: String,

    #[serde(default)]
    pub bold: bool,

    #[serde(default)]
    pub italic: bool,

    #[serde(default = "default_outline_width")]
    pub outline_width: f64,

    #[serde(default)]
    pub shadow_depth: f64,

    /// Extra letter spacing in pixels, may be negative
    #[serde(default)]
    pub letter_spacing: f64,

    /// Rotation in degrees
    #[serde(default)]
    pub rotation: f64,

    #[serde(default)]
    pub border_style: BorderStyle,

    /// `top`, `center` or `bottom`; anything else renders at the bottom
    #[serde(default = "default_placement")]
    pub placement: String,

    #[serde(default)]
    pub margin_left: f64,

    #[serde(default)]
    pub margin_right: f64,

    #[serde(default)]
    pub margin_vertical: f64,

    /// Fade length in milliseconds, 0 disables fading
    #[serde(default)]
    pub fade_ms: f64,

    /// Per-word karaoke highlighting
    #[serde(default)]
    pub highlight: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_size: default_font_size(),
            primary_color: default_primary_color(),
            secondary_color: default_secondary_color(),
            outline_color: default_outline_color(),
            background_color: default_background_color(),
            bold: false,
            italic: false,
            outline_width: default_outline_width(),
            shadow_depth: 0.0,
            letter_spacing: 0.0,
            rotation: 0.0,
            border_style: BorderStyle::default(),
            placement: default_placement(),
            margin_left: 0.0,
            margin_right: 0.0,
            margin_vertical: 0.0,
            fade_ms: 0.0,
            highlight: false,
        }
    }
}

impl StyleConfig {
    /// Check every field; the error names the first offending one
    pub fn validate(&self) -> std::result::Result<(), TranscodeError> {
        let colors = [
            ("primary_color", &self.primary_color),
            ("secondary_color", &self.secondary_color),
            ("outline_color", &self.outline_color),
            ("background_color", &self.background_color),
        ];
        for (field, value) in colors {
            style_encoder::encode_color(value).map_err(|e| e.for_field(field))?;
        }

        if self.font_family.trim().is_empty() {
            return Err(TranscodeError::InvalidStyleField {
                field: "font_family",
                reason: "must not be empty".to_string(),
            });
        }
        // The family is written into a comma-separated record
        if self.font_family.contains(',') {
            return Err(TranscodeError::InvalidStyleField {
                field: "font_family",
                reason: "must not contain ','".to_string(),
            });
        }

        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(TranscodeError::InvalidStyleField {
                field: "font_size",
                reason: format!("must be positive, got {}", self.font_size),
            });
        }

        let non_negative = [
            ("outline_width", self.outline_width),
            ("shadow_depth", self.shadow_depth),
            ("margin_left", self.margin_left),
            ("margin_right", self.margin_right),
            ("margin_vertical", self.margin_vertical),
            ("fade_ms", self.fade_ms),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(TranscodeError::InvalidStyleField {
                    field,
                    reason: format!("must be a non-negative number, got {}", value),
                });
            }
        }

        for (field, value) in [("letter_spacing", self.letter_spacing), ("rotation", self.rotation)] {
            if !value.is_finite() {
                return Err(TranscodeError::InvalidStyleField {
                    field,
                    reason: format!("must be a finite number, got {}", value),
                });
            }
        }

        Ok(())
    }
}

/// Settings for the external ffmpeg renderer
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RenderConfig {
    /// ffmpeg executable name or path
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    /// Render timeout in seconds
    #[serde(default = "default_render_timeout_secs")]
    pub timeout_secs: u64,

    /// Seconds of blank video after the last cue
    #[serde(default = "default_tail_padding_secs")]
    pub tail_padding_secs: u64,

    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    /// ffmpeg `-b:v` value
    #[serde(default = "default_video_bitrate")]
    pub video_bitrate: String,

    /// Directory holding preview background images
    #[serde(default = "default_background_dir")]
    pub background_dir: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            timeout_secs: default_render_timeout_secs(),
            tail_padding_secs: default_tail_padding_secs(),
            frame_rate: default_frame_rate(),
            video_bitrate: default_video_bitrate(),
            background_dir: default_background_dir(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_font_size() -> f64 {
    120.0
}

fn default_primary_color() -> String {
    "#FFFFFF".to_string()
}

fn default_secondary_color() -> String {
    "#C6E62C".to_string() // Yellow-green highlight
}

fn default_outline_color() -> String {
    "#000000".to_string()
}

fn default_background_color() -> String {
    "#555555".to_string() // Gray drop shadow
}

fn default_outline_width() -> f64 {
    6.0
}

fn default_placement() -> String {
    "bottom".to_string()
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_render_timeout_secs() -> u64 {
    600
}

fn default_tail_padding_secs() -> u64 {
    5
}

fn default_frame_rate() -> u32 {
    30
}

fn default_video_bitrate() -> String {
    "3M".to_string()
}

fn default_background_dir() -> PathBuf {
    PathBuf::from("images")
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.style.validate()?;

        if self.render.frame_rate == 0 {
            return Err(anyhow::anyhow!("Render frame rate must be positive"));
        }
        if self.render.ffmpeg_path.trim().is_empty() {
            return Err(anyhow::anyhow!("ffmpeg path must not be empty"));
        }

        Ok(())
    }

    /// Load the configuration file, writing a default one if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }
}
