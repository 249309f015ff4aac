/*!
 * SRT to ASS transcoding entry point.
 *
 * `transcode` is a pure function of the caption text and the style: no IO and
 * no shared state, so it can run concurrently for any number of requests.
 * Configuration problems are returned as errors; broken caption blocks are
 * skipped and logged.
 */

use log::{debug, warn};

use crate::animation::AnimationComposer;
use crate::app_config::StyleConfig;
use crate::cue_parser::{Cue, CueParser};
use crate::errors::TranscodeError;
use crate::script_emitter::ScriptEmitter;

/// Result of a transcode with the intermediate cues kept for callers that need them
#[derive(Debug, Clone)]
pub struct TranscodeOutput {
    /// Complete ASS document
    pub script: String,
    /// Cues in source order
    pub cues: Vec<Cue>,
    /// Caption blocks that could not be used
    pub dropped_blocks: usize,
}

/// Transcode SRT caption text into an ASS document
pub fn transcode(caption_text: &str, style: &StyleConfig) -> Result<String, TranscodeError> {
    transcode_detailed(caption_text, style).map(|output| output.script)
}

/// Transcode and also return the parsed cues
pub fn transcode_detailed(caption_text: &str, style: &StyleConfig) -> Result<TranscodeOutput, TranscodeError> {
    style.validate()?;

    let outcome = CueParser::parse_detailed(caption_text);
    if outcome.dropped_blocks > 0 {
        warn!("Skipped {} unusable caption block(s)", outcome.dropped_blocks);
    }

    let script = transcode_cues(&outcome.cues, style)?;

    Ok(TranscodeOutput {
        script,
        cues: outcome.cues,
        dropped_blocks: outcome.dropped_blocks,
    })
}

/// Emit an ASS document for cues that were already parsed
pub fn transcode_cues(cues: &[Cue], style: &StyleConfig) -> Result<String, TranscodeError> {
    let emitter = ScriptEmitter::new(style)?;
    let composer = AnimationComposer::from_style(style)?;

    if cues.is_empty() {
        warn!("No cues found, emitting a header-only script");
    } else {
        debug!(
            "Emitting {} event(s) (fade {}ms, highlight {})",
            cues.len(),
            style.fade_ms,
            style.highlight
        );
    }

    Ok(emitter.emit(cues, &composer))
}
