/*!
 * Burning scripts into video with an external ffmpeg process.
 *
 * The transcoder only produces script text; this module is the glue that hands
 * it to ffmpeg. Argument lists are built by pure functions so they can be
 * checked without running ffmpeg.
 */

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use rand::Rng;
use tokio::process::Command;

use crate::app_config::RenderConfig;
use crate::cue_parser::Cue;
use crate::errors::RenderError;
use crate::script_emitter::{PLAY_RES_X, PLAY_RES_Y};
use crate::timecode;

/// How a preview background is chosen among the available images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundPolicy {
    /// Image at this index, wrapping around the list
    Index(usize),
    /// Uniformly random image
    Random,
}

/// Pick a background image; `None` if there are no images
pub fn select_background<'a, R: Rng + ?Sized>(
    images: &'a [PathBuf],
    policy: BackgroundPolicy,
    rng: &mut R,
) -> Option<&'a PathBuf> {
    if images.is_empty() {
        return None;
    }
    let idx = match policy {
        BackgroundPolicy::Index(idx) => idx % images.len(),
        BackgroundPolicy::Random => rng.random_range(0..images.len()),
    };
    images.get(idx)
}

/// Video length for a set of cues: last cue end plus padding, as `HH:MM:SS`
pub fn render_duration(cues: &[Cue], tail_padding_secs: u64) -> String {
    let last_end = cues.last().map(|cue| cue.end_ms).unwrap_or(0);
    timecode::format_as_clock(last_end.saturating_add(tail_padding_secs.saturating_mul(1_000)))
}

/// Escape a path for use inside an ffmpeg filter argument
pub fn escape_filter_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | ':' | '\'' | ',' | '[' | ']' | ';') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Arguments rendering a script onto a black canvas
pub fn ffmpeg_video_args(script: &Path, output: &Path, duration: &str, config: &RenderConfig) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-f".to_string(),
        "lavfi".to_string(),
        "-i".to_string(),
        format!("color=black:s={}x{}:r={}", PLAY_RES_X, PLAY_RES_Y, config.frame_rate),
        "-t".to_string(),
        duration.to_string(),
        "-vf".to_string(),
        format!("subtitles={}", escape_filter_path(script)),
        "-preset".to_string(),
        "ultrafast".to_string(),
        "-b:v".to_string(),
        config.video_bitrate.clone(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        "-tune".to_string(),
        "zerolatency".to_string(),
        "-movflags".to_string(),
        "faststart".to_string(),
        output.to_string_lossy().to_string(),
    ]
}

/// Arguments rendering a script onto a single still image
pub fn ffmpeg_preview_args(background: &Path, script: &Path, output: &Path, config: &RenderConfig) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-i".to_string(),
        background.to_string_lossy().to_string(),
        "-vf".to_string(),
        format!("subtitles={}", escape_filter_path(script)),
        "-frames:v".to_string(),
        "1".to_string(),
        "-preset".to_string(),
        "ultrafast".to_string(),
        "-b:v".to_string(),
        config.video_bitrate.clone(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        "-tune".to_string(),
        "zerolatency".to_string(),
        output.to_string_lossy().to_string(),
    ]
}

/// Keep only meaningful ffmpeg stderr lines, dropping the version banner,
/// build configuration and stream metadata noise.
pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let noise_prefixes = [
        "ffmpeg version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Stream #",
        "    Metadata:",
        "Output #",
        "Stream mapping:",
        "Press [q]",
        "frame=",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| !line.trim().is_empty() && !noise_prefixes.iter().any(|p| line.starts_with(p)))
        .map(str::trim)
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}

/// Something that turns script text into pixels
#[async_trait]
pub trait ScriptRenderer: Send + Sync {
    /// Render the script onto a blank canvas of the given `HH:MM:SS` duration
    async fn render_video(&self, script: &str, duration: &str, output: &Path) -> Result<(), RenderError>;

    /// Render the script's first frame onto a background image
    async fn render_still(&self, script: &str, background: &Path, output: &Path) -> Result<(), RenderError>;
}

/// Renderer backed by the ffmpeg command line tool
pub struct FfmpegRenderer {
    config: RenderConfig,
}

impl FfmpegRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    // @writes: Script to a temp file removed when the handle drops
    fn write_script(script: &str) -> Result<tempfile::NamedTempFile, RenderError> {
        let mut file = tempfile::Builder::new()
            .prefix("subburn-")
            .suffix(".ass")
            .tempfile()?;
        file.write_all(script.as_bytes())?;
        file.flush()?;
        Ok(file)
    }

    async fn run(&self, args: Vec<String>) -> Result<(), RenderError> {
        let tool = self.config.ffmpeg_path.clone();
        debug!("Running {} {}", tool, args.join(" "));

        let ffmpeg_future = Command::new(&tool)
            .args(&args)
            .kill_on_drop(true)
            .output();

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let output = tokio::select! {
            result = ffmpeg_future => {
                result.map_err(|e| RenderError::ToolNotFound { tool: tool.clone(), message: e.to_string() })?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(RenderError::TimedOut { tool, secs: self.config.timeout_secs });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let filtered = filter_ffmpeg_stderr(&stderr);
            error!("ffmpeg failed: {}", filtered);
            return Err(RenderError::Failed { tool, message: filtered });
        }

        Ok(())
    }
}

#[async_trait]
impl ScriptRenderer for FfmpegRenderer {
    async fn render_video(&self, script: &str, duration: &str, output: &Path) -> Result<(), RenderError> {
        let script_file = Self::write_script(script)?;
        let args = ffmpeg_video_args(script_file.path(), output, duration, &self.config);
        self.run(args).await
    }

    async fn render_still(&self, script: &str, background: &Path, output: &Path) -> Result<(), RenderError> {
        let script_file = Self::write_script(script)?;
        let args = ffmpeg_preview_args(background, script_file.path(), output, &self.config);
        self.run(args).await
    }
}
