/*!
 * # subburn - SRT to styled ASS subtitle transcoder
 *
 * A Rust library that turns plain SRT captions into an ASS presentation script
 * ready to be burned into video.
 *
 * ## Features
 *
 * - Lenient SRT parsing (broken blocks are skipped, not fatal)
 * - One configurable style record (font, colors, outline, shadow, placement, margins)
 * - Fade-in/fade-out per cue, limited by the gaps to neighbouring cues
 * - Optional per-word karaoke highlighting
 * - Rendering helpers around ffmpeg and fontconfig
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timecode`: Timestamp parsing and centisecond formatting
 * - `style_encoder`: Color and alignment encoding
 * - `cue_parser`: SRT text to cues
 * - `animation`: Fade and highlight timing, override tag markup
 * - `script_emitter`: ASS document assembly
 * - `transcoder`: The pure `transcode` entry point
 * - `app_config`: Configuration management
 * - `render`: ffmpeg invocation for videos and previews
 * - `font_catalog`: Installed font lookup
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod timecode;
pub mod style_encoder;
pub mod cue_parser;
pub mod animation;
pub mod script_emitter;
pub mod transcoder;
pub mod app_config;
pub mod render;
pub mod font_catalog;
pub mod file_utils;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{Config, StyleConfig};
pub use cue_parser::{Cue, CueParser};
pub use animation::{AnimationComposer, AnimationSpec, WordTiming};
pub use script_emitter::ScriptEmitter;
pub use transcoder::transcode;
pub use errors::{AppError, RenderError, TranscodeError};
