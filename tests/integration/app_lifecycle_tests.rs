/*!
 * Controller tests with mocked renderer and font catalog
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tokio_test::{assert_err, assert_ok};
use subburn::app_config::Config;
use subburn::app_controller::Controller;
use subburn::errors::RenderError;
use subburn::render::BackgroundPolicy;
use crate::common;
use crate::common::mock_collaborators::{RecordingRenderer, RenderCall, StaticFontCatalog};

const FONT_LISTING: &str = "DejaVu Sans,DejaVu Sans Book,/usr/share/fonts/DejaVuSans.ttf\nArial,/usr/share/fonts/arial.ttf\n";

fn controller_with(config: Config, renderer: &RecordingRenderer) -> Controller {
    Controller::with_collaborators(
        config,
        Box::new(renderer.clone()),
        Box::new(StaticFontCatalog::new(FONT_LISTING)),
    )
}

fn config_with_backgrounds(dir: &Path) -> Config {
    let mut config = Config::default();
    config.render.background_dir = dir.to_path_buf();
    config
}

/// Test converting a file next to the input
#[test]
fn test_convertFile_withDefaultOutput_shouldWriteAssNextToInput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let controller = controller_with(Config::default(), &RecordingRenderer::new());

    let output = controller.convert_file(&input, None, false)?;

    let expected_path = temp_dir.path().join("movie.ass");
    assert_eq!(output, Some(expected_path.clone()));
    let script = fs::read_to_string(&expected_path)?;
    assert!(script.starts_with("[Script Info]\n"));
    assert_eq!(script.lines().filter(|l| l.starts_with("Dialogue:")).count(), 3);
    Ok(())
}

#[test]
fn test_convertFile_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let existing = common::create_test_file(temp_dir.path(), "movie.ass", "old")?;
    let controller = controller_with(Config::default(), &RecordingRenderer::new());

    assert_eq!(controller.convert_file(&input, None, false)?, None);
    assert_eq!(fs::read_to_string(&existing)?, "old");

    assert_eq!(controller.convert_file(&input, None, true)?, Some(existing.clone()));
    assert!(fs::read_to_string(&existing)?.starts_with("[Script Info]"));
    Ok(())
}

#[test]
fn test_convertFile_withExplicitOutput_shouldCreateParentDirs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let output = temp_dir.path().join("out").join("custom.ass");
    let controller = controller_with(Config::default(), &RecordingRenderer::new());

    controller.convert_file(&input, Some(output.clone()), false)?;

    assert!(output.exists());
    Ok(())
}

#[test]
fn test_convertFile_withInvalidStyle_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let mut config = Config::default();
    config.style.outline_color = "not a color".to_string();
    let controller = controller_with(config, &RecordingRenderer::new());

    assert!(controller.convert_file(&input, None, false).is_err());
    assert!(!temp_dir.path().join("movie.ass").exists());
    Ok(())
}

#[test]
fn test_convertFile_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = controller_with(Config::default(), &RecordingRenderer::new());

    let missing = temp_dir.path().join("missing.srt");

    let err = controller.convert_file(&missing, None, false).unwrap_err();
    assert!(err.to_string().starts_with("Input file not found"));
    assert!(!temp_dir.path().join("missing.ass").exists());
    Ok(())
}

#[tokio::test]
async fn test_renderFile_withMissingInput_shouldFailWithoutRendering() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let renderer = RecordingRenderer::new();
    let controller = controller_with(Config::default(), &renderer);

    let result = controller.render_file(&temp_dir.path().join("missing.srt"), None, false).await;

    assert_err!(result);
    assert!(renderer.recorded().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_renderFile_shouldPassScriptAndPaddedDuration() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let renderer = RecordingRenderer::new();
    common::init_test_logging();
    let controller = controller_with(Config::default(), &renderer);

    let output = assert_ok!(controller.render_file(&input, None, false).await);

    let expected_path = temp_dir.path().join("movie-subs.mp4");
    assert_eq!(output, Some(expected_path.clone()));

    let calls = renderer.recorded();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        RenderCall::Video { script, duration, output } => {
            assert!(script.contains("Dialogue: 0,0:00:10.00,0:00:14.00,Default,,0,0,0,,For testing purposes."));
            assert_eq!(duration, "00:00:19");
            assert_eq!(output, &expected_path);
        }
        other => panic!("unexpected render call: {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_renderFile_withFailingRenderer_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let renderer = RecordingRenderer::failing();
    let controller = controller_with(Config::default(), &renderer);

    let result = controller.render_file(&input, None, false).await;

    assert_err!(result);
    assert_eq!(renderer.recorded().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_preview_withIndexPolicy_shouldUseThatBackground() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let backgrounds = temp_dir.path().join("images");
    fs::create_dir(&backgrounds)?;
    common::create_test_file(&backgrounds, "a.png", "png")?;
    common::create_test_file(&backgrounds, "b.jpg", "jpg")?;

    let mut config = config_with_backgrounds(&backgrounds);
    config.style.highlight = true;
    let renderer = RecordingRenderer::new();
    let controller = controller_with(config, &renderer);
    let output = temp_dir.path().join("preview.png");

    let written = controller.preview("one two three", &output, BackgroundPolicy::Index(1)).await?;

    assert_eq!(written, output);
    match &renderer.recorded()[0] {
        RenderCall::Still { script, background, output: still_output } => {
            assert_eq!(background, &backgrounds.join("b.jpg"));
            assert_eq!(still_output, &output);
            assert!(script.contains("Dialogue: 0,0:00:00.00,0:00:01.00,Default,,0,0,0,,one {\\c&H002CE6C6}two{\\c&H00FFFFFF} three"));
        }
        other => panic!("unexpected render call: {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_preview_withRandomPolicy_shouldPickAnAvailableBackground() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let a = common::create_test_file(temp_dir.path(), "a.png", "png")?;
    let b = common::create_test_file(temp_dir.path(), "b.png", "png")?;
    let renderer = RecordingRenderer::new();
    let controller = controller_with(config_with_backgrounds(temp_dir.path()), &renderer);

    controller
        .preview("Hello", &temp_dir.path().join("out.png"), BackgroundPolicy::Random)
        .await?;

    let background: PathBuf = match &renderer.recorded()[0] {
        RenderCall::Still { background, .. } => background.clone(),
        other => panic!("unexpected render call: {:?}", other),
    };
    assert!(background == a || background == b);
    Ok(())
}

#[tokio::test]
async fn test_preview_withNoBackgrounds_shouldFailWithoutRendering() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let renderer = RecordingRenderer::new();
    let controller = controller_with(config_with_backgrounds(temp_dir.path()), &renderer);

    let err = controller
        .preview("Hello", &temp_dir.path().join("out.png"), BackgroundPolicy::Random)
        .await
        .unwrap_err();

    assert!(matches!(err.downcast_ref::<RenderError>(), Some(RenderError::NoBackgrounds(_))));
    assert!(renderer.recorded().is_empty());
    Ok(())
}

#[test]
fn test_listFonts_shouldReturnSortedFamilies() -> Result<()> {
    let controller = controller_with(Config::default(), &RecordingRenderer::new());

    assert_eq!(controller.list_fonts()?, vec!["Arial", "DejaVu Sans"]);
    Ok(())
}

#[test]
fn test_resolveFont_shouldFindFileOrFail() -> Result<()> {
    let controller = controller_with(Config::default(), &RecordingRenderer::new());

    assert_eq!(
        controller.resolve_font("dejavu sans")?,
        PathBuf::from("/usr/share/fonts/DejaVuSans.ttf")
    );
    let err = controller.resolve_font("Comic Sans").unwrap_err();
    assert_eq!(err.to_string(), "Font not found: Comic Sans");
    Ok(())
}
