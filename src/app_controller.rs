use anyhow::{Result, Context, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_config::Config;
use crate::errors::RenderError;
use crate::file_utils::FileManager;
use crate::font_catalog::{FcListCatalog, FontCatalog};
use crate::render::{self, BackgroundPolicy, FfmpegRenderer, ScriptRenderer};
use crate::script_emitter;
use crate::transcoder;

// @module: Application controller for caption conversion and rendering

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: External renderer
    renderer: Box<dyn ScriptRenderer>,

    // @field: Installed font lookup
    fonts: Box<dyn FontCatalog>,
}

impl Controller {
    // @method: Create a controller using ffmpeg and fc-list
    pub fn with_config(config: Config) -> Result<Self> {
        let renderer = Box::new(FfmpegRenderer::new(config.render.clone()));
        Ok(Self::with_collaborators(config, renderer, Box::new(FcListCatalog::default())))
    }

    /// Create a controller with explicit collaborators
    pub fn with_collaborators(
        config: Config,
        renderer: Box<dyn ScriptRenderer>,
        fonts: Box<dyn FontCatalog>,
    ) -> Self {
        Self { config, renderer, fonts }
    }

    /// Convert an SRT file to an ASS file.
    ///
    /// Returns `None` when the output exists and `force_overwrite` is off.
    pub fn convert_file(&self, input_file: &Path, output_file: Option<PathBuf>, force_overwrite: bool) -> Result<Option<PathBuf>> {
        Self::require_input(input_file)?;
        let output_file = output_file.unwrap_or_else(|| FileManager::with_extension(input_file, "ass"));
        if Self::should_skip(&output_file, force_overwrite) {
            return Ok(None);
        }

        let content = FileManager::read_to_string(input_file)?;
        let output = transcoder::transcode_detailed(&content, &self.config.style)
            .with_context(|| format!("Failed to transcode {:?}", input_file))?;

        FileManager::write_to_file(&output_file, &output.script)?;
        info!("Converted {} cue(s): {:?}", output.cues.len(), output_file);

        Ok(Some(output_file))
    }

    /// Convert an SRT file and burn it onto a black video
    pub async fn render_file(&self, input_file: &Path, output_file: Option<PathBuf>, force_overwrite: bool) -> Result<Option<PathBuf>> {
        Self::require_input(input_file)?;
        let output_file = output_file.unwrap_or_else(|| FileManager::rendered_video_path(input_file));
        if Self::should_skip(&output_file, force_overwrite) {
            return Ok(None);
        }

        let content = FileManager::read_to_string(input_file)?;
        let output = transcoder::transcode_detailed(&content, &self.config.style)
            .with_context(|| format!("Failed to transcode {:?}", input_file))?;

        let duration = render::render_duration(&output.cues, self.config.render.tail_padding_secs);
        info!("Rendering {:?} ({} long)", output_file, duration);

        if let Some(parent) = output_file.parent() {
            FileManager::ensure_dir(parent)?;
        }

        let spinner = Self::spinner("Rendering video");
        let result = self.renderer.render_video(&output.script, &duration, &output_file).await;
        spinner.finish_and_clear();
        result.context("Video rendering failed")?;

        info!("Success: {:?}", output_file);
        Ok(Some(output_file))
    }

    /// Render one line of text onto a background image with the current style
    pub async fn preview(&self, text: &str, output_file: &Path, policy: BackgroundPolicy) -> Result<PathBuf> {
        let background_dir = &self.config.render.background_dir;
        let images = FileManager::find_images(background_dir)?;

        let background = {
            let mut rng = rand::rng();
            render::select_background(&images, policy, &mut rng).cloned()
        }
        .ok_or_else(|| RenderError::NoBackgrounds(background_dir.clone()))?;

        let script = script_emitter::build_preview_script(text, &self.config.style)?;

        let spinner = Self::spinner("Rendering preview");
        let result = self.renderer.render_still(&script, &background, output_file).await;
        spinner.finish_and_clear();
        result.context("Preview rendering failed")?;

        info!("Preview written to {:?} (background {:?})", output_file, background);
        Ok(output_file.to_path_buf())
    }

    /// Installed font families
    pub fn list_fonts(&self) -> Result<Vec<String>> {
        Ok(self.fonts.families()?)
    }

    /// File backing a font family
    pub fn resolve_font(&self, family: &str) -> Result<PathBuf> {
        self.fonts
            .resolve(family)?
            .ok_or_else(|| anyhow!("Font not found: {}", family))
    }

    fn require_input(input_file: &Path) -> Result<()> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file not found: {:?}", input_file));
        }
        Ok(())
    }

    fn should_skip(output_file: &Path, force_overwrite: bool) -> bool {
        if output_file.exists() && !force_overwrite {
            warn!("Output file already exists: {:?}. Use -f to force overwrite.", output_file);
            return true;
        }
        false
    }

    fn spinner(message: &'static str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }
}
