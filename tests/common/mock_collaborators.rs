/*!
 * Mock collaborator implementations for testing
 *
 * These replace ffmpeg and fc-list so controller tests never start external
 * processes. Every call is recorded for later inspection.
 */

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use subburn::errors::RenderError;
use subburn::font_catalog::{parse_family_list, parse_font_lookup, FontCatalog};
use subburn::render::ScriptRenderer;

/// One recorded render request
#[derive(Debug, Clone)]
pub enum RenderCall {
    Video {
        script: String,
        duration: String,
        output: PathBuf,
    },
    Still {
        script: String,
        background: PathBuf,
        output: PathBuf,
    },
}

/// Renderer that records requests instead of running ffmpeg
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub calls: Arc<Mutex<Vec<RenderCall>>>,
    pub fail: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn recorded(&self) -> Vec<RenderCall> {
        self.calls.lock().unwrap().clone()
    }

    fn result(&self) -> Result<(), RenderError> {
        if self.fail {
            Err(RenderError::Failed {
                tool: "ffmpeg".to_string(),
                message: "simulated failure".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ScriptRenderer for RecordingRenderer {
    async fn render_video(&self, script: &str, duration: &str, output: &Path) -> Result<(), RenderError> {
        self.calls.lock().unwrap().push(RenderCall::Video {
            script: script.to_string(),
            duration: duration.to_string(),
            output: output.to_path_buf(),
        });
        self.result()
    }

    async fn render_still(&self, script: &str, background: &Path, output: &Path) -> Result<(), RenderError> {
        self.calls.lock().unwrap().push(RenderCall::Still {
            script: script.to_string(),
            background: background.to_path_buf(),
            output: output.to_path_buf(),
        });
        self.result()
    }
}

/// Font catalog answering from canned `fc-list` output
pub struct StaticFontCatalog {
    pub listing: String,
}

impl StaticFontCatalog {
    pub fn new(listing: &str) -> Self {
        Self {
            listing: listing.to_string(),
        }
    }
}

impl FontCatalog for StaticFontCatalog {
    fn families(&self) -> Result<Vec<String>, RenderError> {
        Ok(parse_family_list(&self.listing))
    }

    fn resolve(&self, family: &str) -> Result<Option<PathBuf>, RenderError> {
        Ok(parse_font_lookup(&self.listing, family))
    }
}
