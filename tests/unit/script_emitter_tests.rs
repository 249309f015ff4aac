/*!
 * Tests for ASS document assembly
 */

use subburn::animation::AnimationComposer;
use subburn::app_config::{BorderStyle, StyleConfig};
use subburn::cue_parser::Cue;
use subburn::script_emitter::{build_preview_script, ScriptEmitter, PLAY_RES_X, PLAY_RES_Y, STYLE_NAME};

const DEFAULT_STYLE_RECORD: &str =
    "Style: Default,Arial,120,&H00FFFFFF,&H002CE6C6,&H00000000,&H00555555,0,0,0,0,100,100,0,0,1,6,0,2,0,0,0,1";

#[test]
fn test_styleRecord_withDefaults_shouldMatchKnownRecord() {
    let emitter = ScriptEmitter::new(&StyleConfig::default()).unwrap();
    assert_eq!(emitter.style_record(), DEFAULT_STYLE_RECORD);
}

#[test]
fn test_styleRecord_withCustomStyle_shouldEncodeEveryField() {
    let style = StyleConfig {
        font_family: "DejaVu Sans".to_string(),
        font_size: 48.0,
        bold: true,
        italic: true,
        border_style: BorderStyle::Box,
        placement: "top".to_string(),
        letter_spacing: -1.5,
        rotation: 12.5,
        margin_left: 10.0,
        margin_right: 20.0,
        margin_vertical: 30.0,
        outline_width: 2.5,
        shadow_depth: 1.0,
        ..StyleConfig::default()
    };

    let emitter = ScriptEmitter::new(&style).unwrap();
    assert_eq!(
        emitter.style_record(),
        "Style: Default,DejaVu Sans,48,&H00FFFFFF,&H002CE6C6,&H00000000,&H00555555,-1,-1,0,0,100,100,-1.5,12.5,3,2.5,1,8,10,20,30,1"
    );
}

#[test]
fn test_new_withInvalidOutlineColor_shouldFail() {
    let style = StyleConfig {
        outline_color: "black".to_string(),
        ..StyleConfig::default()
    };

    let err = ScriptEmitter::new(&style).unwrap_err();
    assert!(err.to_string().contains("outline_color"));
}

#[test]
fn test_header_shouldContainSectionsInOrder() {
    let header = ScriptEmitter::new(&StyleConfig::default()).unwrap().header();

    let info = header.find("[Script Info]").unwrap();
    let styles = header.find("[V4+ Styles]").unwrap();
    let events = header.find("[Events]").unwrap();
    assert!(info < styles && styles < events);

    assert!(header.contains("ScriptType: v4.00+\n"));
    assert!(header.contains(&format!("PlayResX: {}\n", PLAY_RES_X)));
    assert!(header.contains(&format!("PlayResY: {}\n", PLAY_RES_Y)));
    assert!(header.contains(&format!("{}\n", DEFAULT_STYLE_RECORD)));
    assert!(header.ends_with("Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n"));
}

#[test]
fn test_dialogueLine_shouldUseDefaultStyle() {
    let line = ScriptEmitter::dialogue_line("0:00:01.00", "0:00:02.00", "Hi");
    assert_eq!(line, format!("Dialogue: 0,0:00:01.00,0:00:02.00,{},,0,0,0,,Hi", STYLE_NAME));
}

#[test]
fn test_emit_withFade_shouldWriteOneEventPerCue() {
    let style = StyleConfig {
        fade_ms: 500.0,
        ..StyleConfig::default()
    };
    let emitter = ScriptEmitter::new(&style).unwrap();
    let composer = AnimationComposer::from_style(&style).unwrap();
    let cues = vec![
        Cue::new(1_000, 3_000, "Hello world"),
        Cue::new(3_500, 5_000, "Bye"),
    ];

    let script = emitter.emit(&cues, &composer);

    let expected = format!(
        "{}{}\n{}\n",
        emitter.header(),
        "Dialogue: 0,0:00:01.00,0:00:03.00,Default,,0,0,0,,{\\fad(500,500)}Hello world",
        "Dialogue: 0,0:00:03.50,0:00:05.00,Default,,0,0,0,,{\\fad(500,500)}Bye"
    );
    assert_eq!(script, expected);
}

#[test]
fn test_emit_withNoCues_shouldWriteHeaderOnly() {
    let style = StyleConfig::default();
    let emitter = ScriptEmitter::new(&style).unwrap();
    let composer = AnimationComposer::from_style(&style).unwrap();

    assert_eq!(emitter.emit(&[], &composer), emitter.header());
}

#[test]
fn test_buildPreviewScript_withHighlight_shouldColorMiddleWord() {
    let style = StyleConfig {
        highlight: true,
        ..StyleConfig::default()
    };

    let script = build_preview_script("one two three", &style).unwrap();
    assert!(script.ends_with(
        "Dialogue: 0,0:00:00.00,0:00:01.00,Default,,0,0,0,,one {\\c&H002CE6C6}two{\\c&H00FFFFFF} three\n"
    ));
}

#[test]
fn test_buildPreviewScript_withMultipleLines_shouldJoinWithLineBreak() {
    let script = build_preview_script("first\n  second  \n", &StyleConfig::default()).unwrap();
    assert!(script.ends_with(",,first\\Nsecond\n"));
}

#[test]
fn test_buildPreviewScript_withInvalidStyle_shouldFail() {
    let style = StyleConfig {
        primary_color: "#12".to_string(),
        ..StyleConfig::default()
    };
    assert!(build_preview_script("text", &style).is_err());
}
