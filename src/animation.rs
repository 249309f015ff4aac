/*!
 * Per-cue animation timing and inline override markup.
 *
 * Two things are derived for each cue:
 * - fade-in/fade-out lengths, limited by the gap to the neighbouring cues so a
 *   fade never bleeds into another cue's visible window
 * - optionally, a per-word highlight schedule that splits the cue duration
 *   evenly across its words
 *
 * Fades need the previous cue's end and the next cue's start, so timings are
 * collected first and the specs are then computed by index.
 */

use log::debug;

use crate::app_config::StyleConfig;
use crate::cue_parser::Cue;
use crate::errors::TranscodeError;
use crate::style_encoder;
use crate::timecode::Milliseconds;

/// Length of the color transition back to the primary color after a word's window
pub const HIGHLIGHT_RELEASE_MS: Milliseconds = 50;

/// Highlight window of one word, relative to the cue start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordTiming {
    pub word: String,
    pub highlight_start_ms: Milliseconds,
    pub highlight_end_ms: Milliseconds,
}

/// Animation derived for one cue
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnimationSpec {
    pub fade_in_ms: Milliseconds,
    pub fade_out_ms: Milliseconds,
    /// Empty unless highlight mode is on
    pub words: Vec<WordTiming>,
}

/// Computes fades and highlight schedules and renders them as override tags
#[derive(Debug, Clone)]
pub struct AnimationComposer {
    fade_ms: f64,
    highlight: bool,
    primary_color: String,
    highlight_color: String,
}

impl AnimationComposer {
    /// Create a composer from already encoded (`&HAABBGGRR`) colors
    pub fn new(fade_ms: f64, highlight: bool, primary_color: String, highlight_color: String) -> Self {
        Self {
            fade_ms: fade_ms.max(0.0),
            highlight,
            primary_color,
            highlight_color,
        }
    }

    /// Create a composer for a style; the secondary color is the highlight color
    pub fn from_style(style: &StyleConfig) -> Result<Self, TranscodeError> {
        let primary = style_encoder::encode_color(&style.primary_color)
            .map_err(|e| e.for_field("primary_color"))?;
        let highlight = style_encoder::encode_color(&style.secondary_color)
            .map_err(|e| e.for_field("secondary_color"))?;

        Ok(Self::new(style.fade_ms, style.highlight, primary, highlight))
    }

    pub fn fade_enabled(&self) -> bool {
        self.fade_ms > 0.0
    }

    /// Compute the animation of every cue, in cue order
    pub fn compose_all(&self, cues: &[Cue]) -> Vec<AnimationSpec> {
        let timings: Vec<(i64, i64)> = cues
            .iter()
            .map(|cue| (signed(cue.start_ms), signed(cue.end_ms)))
            .collect();

        let fades: Vec<(Milliseconds, Milliseconds)> = timings
            .iter()
            .enumerate()
            .scan(0_i64, |prev_end, (idx, &(start, end))| {
                let next_start = timings.get(idx + 1).map(|&(next, _)| next);

                let fade_in = self.fade_for_gap(Some(start - *prev_end));
                let fade_out = self.fade_for_gap(next_start.map(|next| next - end));

                *prev_end = end;
                Some((fade_in, fade_out))
            })
            .collect();

        cues.iter()
            .zip(fades)
            .map(|(cue, (fade_in_ms, fade_out_ms))| AnimationSpec {
                fade_in_ms,
                fade_out_ms,
                words: if self.highlight { word_timings(cue) } else { Vec::new() },
            })
            .collect()
    }

    /// Fade length for a gap to a neighbour; `None` means no neighbour
    fn fade_for_gap(&self, gap_ms: Option<i64>) -> Milliseconds {
        let fade = match gap_ms {
            Some(gap) => self.fade_ms.min(gap as f64),
            None => self.fade_ms,
        };
        fade.round().max(0.0) as Milliseconds
    }

    /// Override markup plus text for one cue.
    ///
    /// Returns `None` when highlight mode is on and the cue has no words.
    pub fn render_text(&self, cue: &Cue, spec: &AnimationSpec) -> Option<String> {
        let mut out = String::new();

        if self.fade_enabled() {
            out.push_str(&format!("{{\\fad({},{})}}", spec.fade_in_ms, spec.fade_out_ms));
        }

        if self.highlight {
            if spec.words.is_empty() {
                debug!("Skipping cue at {}ms: no words to highlight", cue.start_ms);
                return None;
            }
            let body: Vec<String> = spec.words.iter().map(|w| self.highlight_fragment(w)).collect();
            out.push_str(&body.join(" "));
        } else {
            out.push_str(&cue.text);
        }

        Some(out)
    }

    // @returns: Markup that lights one word up during its window
    fn highlight_fragment(&self, timing: &WordTiming) -> String {
        let release_end = timing.highlight_end_ms.saturating_add(HIGHLIGHT_RELEASE_MS);
        format!(
            "{{\\1c{primary}\\t({start},{end},\\1c{highlight})}}{word}{{\\t({end},{release_end},\\1c{primary})}}",
            primary = self.primary_color,
            highlight = self.highlight_color,
            start = timing.highlight_start_ms,
            end = timing.highlight_end_ms,
            release_end = release_end,
            word = timing.word,
        )
    }
}

/// Split a cue into whitespace-separated words with evenly spaced windows.
///
/// Word `k` of `n` gets `[round(k*d/n), round((k+1)*d/n)]`, so consecutive
/// windows share their boundaries and the last one ends at the cue duration.
pub fn word_timings(cue: &Cue) -> Vec<WordTiming> {
    let words: Vec<&str> = cue.text.split_whitespace().collect();
    let count = words.len() as f64;
    let duration = cue.duration_ms() as f64;
    let boundary = |k: usize| ((k as f64) * duration / count).round() as Milliseconds;

    words
        .iter()
        .enumerate()
        .map(|(k, word)| WordTiming {
            word: (*word).to_string(),
            highlight_start_ms: boundary(k),
            highlight_end_ms: boundary(k + 1),
        })
        .collect()
}

fn signed(ms: Milliseconds) -> i64 {
    i64::try_from(ms).unwrap_or(i64::MAX)
}
