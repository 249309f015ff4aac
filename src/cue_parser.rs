use std::fmt;
use log::{debug, warn};

use crate::errors::TranscodeError;
use crate::timecode::{self, Milliseconds};

// @module: Caption (SRT) parsing into cues

/// Forced line break marker understood by the script renderer
pub const LINE_BREAK: &str = "\\N";

/// Separator between the two timestamps of a timecode line
const TIMECODE_ARROW: &str = "-->";

// @struct: Single timed caption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    // @field: Start time in ms
    pub start_ms: Milliseconds,

    // @field: End time in ms (not checked against start)
    pub end_ms: Milliseconds,

    // @field: Caption text, physical lines joined with LINE_BREAK
    pub text: String,
}

impl Cue {
    pub fn new(start_ms: Milliseconds, end_ms: Milliseconds, text: impl Into<String>) -> Self {
        Cue {
            start_ms,
            end_ms,
            text: text.into(),
        }
    }

    /// Visible duration; zero for inverted timings
    pub fn duration_ms(&self) -> Milliseconds {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Start time as a script event time
    pub fn format_start_time(&self) -> String {
        timecode::format_as_centiseconds(self.start_ms)
    }

    /// End time as a script event time
    pub fn format_end_time(&self) -> String {
        timecode::format_as_centiseconds(self.end_ms)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{} -> {}] {}", self.format_start_time(), self.format_end_time(), self.text)
    }
}

/// Cues recovered from a caption file plus how many blocks were thrown away
#[derive(Debug, Default, Clone)]
pub struct ParseOutcome {
    pub cues: Vec<Cue>,
    pub dropped_blocks: usize,
}

// @struct: Block being accumulated
#[derive(Debug, Default)]
struct BlockState {
    timing: Option<(Milliseconds, Milliseconds)>,
    lines: Vec<String>,
    malformed: bool,
}

impl BlockState {
    fn is_open(&self) -> bool {
        self.timing.is_some() || self.malformed
    }

    // @finalizes: Current block into the outcome, then resets
    fn flush(&mut self, outcome: &mut ParseOutcome) {
        let block = std::mem::take(self);

        if block.malformed {
            outcome.dropped_blocks += 1;
            return;
        }

        if let Some((start_ms, end_ms)) = block.timing {
            if block.lines.is_empty() {
                debug!("Dropping cue at {} with no text", timecode::format_as_centiseconds(start_ms));
                outcome.dropped_blocks += 1;
            } else {
                outcome.cues.push(Cue::new(start_ms, end_ms, block.lines.join(LINE_BREAK)));
            }
        }
    }
}

/// Lenient SRT parser.
///
/// Malformed blocks are logged and dropped, never reported as errors. An all-digits
/// line is always taken as a cue index, even when it was meant as caption text.
/// Cues keep their source order; overlapping or inverted timings pass through.
pub struct CueParser;

impl CueParser {
    /// Parse caption text into cues
    pub fn parse(content: &str) -> Vec<Cue> {
        Self::parse_detailed(content).cues
    }

    /// Parse caption text, also reporting how many blocks were dropped
    pub fn parse_detailed(content: &str) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();
        let mut block = BlockState::default();

        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        for (idx, raw_line) in content.lines().enumerate() {
            let line_number = idx + 1;
            let line = raw_line.trim();

            if line.is_empty() || Self::is_index_line(line) {
                block.flush(&mut outcome);
                continue;
            }

            if line.contains(TIMECODE_ARROW) {
                // A second timecode without a blank line starts a new block
                if block.is_open() {
                    block.flush(&mut outcome);
                }
                match Self::parse_timecode_line(line) {
                    Ok(timing) => block.timing = Some(timing),
                    Err(e) => {
                        warn!("Dropping caption block at line {}: {}", line_number, e);
                        block.malformed = true;
                    }
                }
                continue;
            }

            if block.malformed {
                continue;
            }

            if block.timing.is_none() {
                warn!("Ignoring text outside of a cue at line {}: {}", line_number, line);
                continue;
            }

            block.lines.push(line.to_string());
        }

        block.flush(&mut outcome);

        debug!(
            "Parsed {} cue(s), dropped {} block(s)",
            outcome.cues.len(),
            outcome.dropped_blocks
        );

        outcome
    }

    /// Split a `start --> end` line into two timestamps.
    ///
    /// Anything after the end timestamp (SRT position hints) is ignored.
    pub fn parse_timecode_line(line: &str) -> Result<(Milliseconds, Milliseconds), TranscodeError> {
        let (left, right) = line
            .split_once(TIMECODE_ARROW)
            .ok_or_else(|| TranscodeError::MalformedTimestamp(line.to_string()))?;

        let start_ms = timecode::parse_timestamp(left)?;
        let end_token = right
            .split_whitespace()
            .next()
            .ok_or_else(|| TranscodeError::MalformedTimestamp(right.to_string()))?;
        let end_ms = timecode::parse_timestamp(end_token)?;

        Ok((start_ms, end_ms))
    }

    fn is_index_line(line: &str) -> bool {
        line.chars().all(|c| c.is_ascii_digit())
    }
}
