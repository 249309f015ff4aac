/*!
 * ASS script assembly.
 *
 * The emitted document has three sections: a fixed `[Script Info]` block for a
 * 1920x1080 canvas, a single `Default` style record and one `Dialogue` event per
 * cue. Nothing here validates input; colors are encoded up front and every cue
 * is written as given.
 */

use std::fmt::Write;

use crate::animation::AnimationComposer;
use crate::app_config::StyleConfig;
use crate::cue_parser::{Cue, LINE_BREAK};
use crate::errors::TranscodeError;
use crate::style_encoder::{encode_alignment, encode_color, encode_flag};
use crate::timecode;

/// Canvas width the script is laid out for
pub const PLAY_RES_X: u32 = 1920;

/// Canvas height the script is laid out for
pub const PLAY_RES_Y: u32 = 1080;

/// Name of the single style record
pub const STYLE_NAME: &str = "Default";

const STYLE_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";

const EVENT_FORMAT: &str = "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// Writes ASS documents for one style
#[derive(Debug, Clone)]
pub struct ScriptEmitter {
    style_record: String,
}

impl ScriptEmitter {
    /// Encode the style record; fails on the first color that does not encode
    pub fn new(style: &StyleConfig) -> Result<Self, TranscodeError> {
        let color = |field: &'static str, value: &str| {
            encode_color(value).map_err(|e| e.for_field(field))
        };

        let style_record = format!(
            "Style: {name},{font},{size},{primary},{secondary},{outline_color},{back},{bold},{italic},0,0,100,100,{spacing},{angle},{border},{outline},{shadow},{alignment},{margin_l},{margin_r},{margin_v},1",
            name = STYLE_NAME,
            font = style.font_family,
            size = style.font_size,
            primary = color("primary_color", &style.primary_color)?,
            secondary = color("secondary_color", &style.secondary_color)?,
            outline_color = color("outline_color", &style.outline_color)?,
            back = color("background_color", &style.background_color)?,
            bold = encode_flag(style.bold),
            italic = encode_flag(style.italic),
            spacing = style.letter_spacing,
            angle = style.rotation,
            border = style.border_style.code(),
            outline = style.outline_width,
            shadow = style.shadow_depth,
            alignment = encode_alignment(&style.placement),
            margin_l = style.margin_left,
            margin_r = style.margin_right,
            margin_v = style.margin_vertical,
        );

        Ok(Self { style_record })
    }

    /// The `Style:` line of the document
    pub fn style_record(&self) -> &str {
        &self.style_record
    }

    /// Script info, styles and the events format line
    pub fn header(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "[Script Info]");
        let _ = writeln!(out, "ScriptType: v4.00+");
        let _ = writeln!(out, "PlayResX: {}", PLAY_RES_X);
        let _ = writeln!(out, "PlayResY: {}", PLAY_RES_Y);
        let _ = writeln!(out);
        let _ = writeln!(out, "[V4+ Styles]");
        let _ = writeln!(out, "{}", STYLE_FORMAT);
        let _ = writeln!(out, "{}", self.style_record);
        let _ = writeln!(out);
        let _ = writeln!(out, "[Events]");
        let _ = writeln!(out, "{}", EVENT_FORMAT);
        out
    }

    /// One `Dialogue:` line with default layer, name, margins and effect
    pub fn dialogue_line(start: &str, end: &str, text: &str) -> String {
        format!("Dialogue: 0,{},{},{},,0,0,0,,{}", start, end, STYLE_NAME, text)
    }

    /// Full document: header plus one event per cue, in cue order
    pub fn emit(&self, cues: &[Cue], composer: &AnimationComposer) -> String {
        let mut out = self.header();

        let specs = composer.compose_all(cues);
        for (cue, spec) in cues.iter().zip(specs.iter()) {
            if let Some(text) = composer.render_text(cue, spec) {
                out.push_str(&Self::dialogue_line(
                    &cue.format_start_time(),
                    &cue.format_end_time(),
                    &text,
                ));
                out.push('\n');
            }
        }

        out
    }
}

/// Length of the single preview event
const PREVIEW_DURATION_MS: u64 = 1_000;

/// One-event script used to preview a style on a still image.
///
/// With highlight mode on, the middle word is shown in the secondary color.
pub fn build_preview_script(text: &str, style: &StyleConfig) -> Result<String, TranscodeError> {
    let emitter = ScriptEmitter::new(style)?;

    let body = if style.highlight {
        let primary = encode_color(&style.primary_color).map_err(|e| e.for_field("primary_color"))?;
        let secondary = encode_color(&style.secondary_color).map_err(|e| e.for_field("secondary_color"))?;

        let mut words: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        if !words.is_empty() {
            let middle = words.len() / 2;
            words[middle] = format!("{{\\c{}}}{}{{\\c{}}}", secondary, words[middle], primary);
        }
        words.join(" ")
    } else {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(LINE_BREAK)
    };

    let mut out = emitter.header();
    out.push_str(&ScriptEmitter::dialogue_line(
        &timecode::format_as_centiseconds(0),
        &timecode::format_as_centiseconds(PREVIEW_DURATION_MS),
        &body,
    ));
    out.push('\n');
    Ok(out)
}
