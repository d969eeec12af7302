use clap::Parser;
use clap::error::ErrorKind;
use hanoi::AppError;
use hanoi::core::colormap::load_palette;
use hanoi::core::config::{self, CliOverrides, RenderMode, ResolvedConfig};
use hanoi::core::input::{parse_num_layers, prompt_num_layers};
use hanoi::tui;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;
use std::io::{stdin, stdout};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "hanoi",
    version,
    about = "Animate a Tower of Hanoi solution in the terminal"
)]
struct Args {
    /// Number of disks (prompted for when omitted)
    #[arg(allow_negative_numbers = true)]
    num_layers: Option<String>,

    /// How frames are drawn
    #[arg(short, long, value_enum)]
    mode: Option<RenderMode>,

    /// Pause between frames, in milliseconds
    #[arg(short, long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Color disks with the built-in gradient
    #[arg(short, long)]
    color: bool,

    /// Color disks from a file of r,g,b lines (implies --color)
    #[arg(long, value_name = "FILE")]
    colormap: Option<PathBuf>,

    /// Config file to use instead of ~/.hanoi/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            mode: self.mode,
            delay_ms: self.delay_ms,
            color: self.color,
            colormap: self.colormap.clone(),
            log_file: self.log_file.clone(),
            verbose: self.verbose,
        }
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => return report(AppError::Usage(e.render().to_string())),
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(e),
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let file_config = config::load_config(args.config.as_deref())?;
    let resolved = config::resolve(&file_config, &args.overrides())?;
    init_logging(&resolved);
    log::info!("Hanoi starting up: {:?}", resolved);

    let palette = load_palette(resolved.color, resolved.colormap.as_deref())?;

    let num_layers = match &args.num_layers {
        Some(arg) => parse_num_layers(arg)?,
        None => prompt_num_layers(stdin().lock(), stdout())?,
    };
    println!("num_layers: {num_layers}");

    tui::run(&resolved, num_layers, palette.as_deref())
}

fn init_logging(config: &ResolvedConfig) {
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    match &config.log_file {
        Some(path) => match File::create(path) {
            Ok(log_file) => {
                let _ = WriteLogger::init(config.log_level, log_config, log_file);
            }
            Err(e) => eprintln!("Warning: cannot create log file {}: {e}", path.display()),
        },
        None => {
            let _ = TermLogger::init(
                config.log_level,
                log_config,
                TerminalMode::Stderr,
                ColorChoice::Auto,
            );
        }
    }
}

fn report(err: AppError) -> ExitCode {
    log::error!("Exiting: {}", err);
    match &err {
        AppError::Usage(message) => eprint!("{message}"),
        other => eprintln!("Error: {other}"),
    }
    ExitCode::from(err.exit_code())
}
