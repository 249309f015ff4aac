// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, LevelFilter, Level, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use subburn::app_config::{self, Config};
use subburn::app_controller::Controller;
use subburn::font_catalog::font_mime_type;
use subburn::render::BackgroundPolicy;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Style settings that can be overridden from the command line
#[derive(Args, Debug, Clone, Default)]
struct StyleOverrides {
    /// Fade length in milliseconds (0 disables fading)
    #[arg(long)]
    fade_ms: Option<f64>,

    /// Enable per-word karaoke highlighting
    #[arg(long)]
    highlight: bool,

    /// Font family name
    #[arg(long)]
    font_family: Option<String>,

    /// Font size
    #[arg(long)]
    font_size: Option<f64>,

    /// Placement: top, center or bottom
    #[arg(long)]
    placement: Option<String>,
}

impl StyleOverrides {
    fn apply(&self, config: &mut Config) {
        let style = &mut config.style;
        if let Some(fade_ms) = self.fade_ms {
            style.fade_ms = fade_ms;
        }
        if self.highlight {
            style.highlight = true;
        }
        if let Some(font_family) = &self.font_family {
            style.font_family = font_family.clone();
        }
        if let Some(font_size) = self.font_size {
            style.font_size = font_size;
        }
        if let Some(placement) = &self.placement {
            style.placement = placement.clone();
        }
    }
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input SRT file
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output file (defaults next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    #[command(flatten)]
    style: StyleOverrides,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Sample text to render
    #[arg(value_name = "TEXT")]
    text: String,

    /// Output image
    #[arg(short, long, default_value = "preview.png")]
    output: PathBuf,

    /// Use the background image at this index instead of a random one
    #[arg(long)]
    background_index: Option<usize>,

    #[command(flatten)]
    style: StyleOverrides,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert an SRT file into a styled ASS script
    Convert(ConvertArgs),

    /// Burn an SRT file onto a black 1920x1080 video
    Render(ConvertArgs),

    /// Render a line of sample text onto a background image
    Preview(PreviewArgs),

    /// List installed font families
    Fonts {
        /// Print the file of this family instead of listing families
        #[arg(long)]
        resolve: Option<String>,
    },

    /// Generate shell completions for subburn
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subburn - SRT to styled ASS subtitle transcoder
///
/// Converts SRT captions into an ASS script with one configurable style, fades
/// and optional karaoke highlighting, and can burn the result into a video.
#[derive(Parser, Debug)]
#[command(name = "subburn")]
#[command(version)]
#[command(about = "Styled subtitle transcoder and burner")]
#[command(long_about = "subburn converts SRT captions into a styled ASS script and can burn it into video with ffmpeg.

EXAMPLES:
    subburn convert movie.srt                       # Write movie.ass next to the input
    subburn convert movie.srt --fade-ms 200         # Fade cues in and out
    subburn convert movie.srt --highlight           # Karaoke-style word highlighting
    subburn render movie.srt -o subs.mp4            # Burn onto a black video
    subburn preview \"Hello there\" -o preview.png    # Preview the style on a background
    subburn fonts --resolve \"DejaVu Sans\"           # Locate a font file
    subburn completions bash > subburn.bash         # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "subburn", &mut std::io::stdout());
        return Ok(());
    }

    // If log level is set via command line, apply it immediately
    if let Some(cli_level) = &cli.log_level {
        let level: app_config::LogLevel = cli_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;

    match &cli.command {
        Commands::Convert(args) | Commands::Render(args) => args.style.apply(&mut config),
        Commands::Preview(args) => args.style.apply(&mut config),
        _ => {}
    }

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Convert(args) => {
            controller.convert_file(&args.input_path, args.output, args.force_overwrite)?;
        }
        Commands::Render(args) => {
            controller.render_file(&args.input_path, args.output, args.force_overwrite).await?;
        }
        Commands::Preview(args) => {
            let policy = args
                .background_index
                .map(BackgroundPolicy::Index)
                .unwrap_or(BackgroundPolicy::Random);
            controller.preview(&args.text, &args.output, policy).await?;
        }
        Commands::Fonts { resolve } => match resolve {
            Some(family) => {
                let path = controller.resolve_font(&family)?;
                info!("Resolved '{}' ({})", family, font_mime_type(&path));
                println!("{}", path.display());
            }
            None => {
                let families = controller.list_fonts()?;
                info!("Found {} font families", families.len());
                for family in families {
                    println!("{}", family);
                }
            }
        },
        Commands::Completions { .. } => {}
    }

    Ok(())
}
