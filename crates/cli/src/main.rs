#![deny(unsafe_code)]
//! CLI binary for getimage: render a GLSL fragment shader over a full-screen
//! quad in an offscreen OpenGL context and write the result as a PNG.
//!
//! ```text
//! getimage [OPTIONS] <SHADER>
//! ```

mod error;
mod logging;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use error::CliError;
use getimage_core::params::{DEFAULT_OUTPUT, DEFAULT_SIZE};
use getimage_core::{ContextKind, RenderParams};
use logging::{init_logging, LoggingConfig};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(
    name = "getimage",
    version,
    about = "Render a GLSL fragment shader to a PNG image"
)]
struct Cli {
    /// Fragment shader source file. Its first line must hold `#version`.
    shader: Option<PathBuf>,

    /// Output PNG path.
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Image width in pixels.
    #[arg(short = 'W', long, default_value_t = DEFAULT_SIZE)]
    width: u32,

    /// Image height in pixels.
    #[arg(short = 'H', long, default_value_t = DEFAULT_SIZE)]
    height: u32,

    /// OpenGL context backend (egl, glfw). Defaults to the first compiled in.
    #[arg(long)]
    context: Option<String>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn run(cli: Cli) -> Result<(), CliError> {
    let context = match cli.context.as_deref() {
        Some(name) => ContextKind::from_name(name)?,
        None => ContextKind::default(),
    };

    let mut params = RenderParams {
        width: cli.width,
        height: cli.height,
        context,
        output: cli.output,
        ..RenderParams::default()
    };

    let shader = cli.shader.unwrap_or_default();
    getimage_core::pipeline::run(&mut params, &shader)?;

    log::info!(
        "rendered {} (GLSL {}, {}x{}) -> {}",
        shader.display(),
        params.glsl_version,
        params.width,
        params.height,
        params.output.display()
    );
    Ok(())
}

fn fail(e: CliError) -> ! {
    if let Some(log) = e.driver_log().filter(|l| !l.is_empty()) {
        println!("{}", log.trim_end());
    }
    eprintln!("{}:{} ({}) ERROR: {e}", file!(), line!(), e.stage());
    process::exit(e.exit_code());
}

/// clap reads `--` as the end of options; here it is an unknown option like
/// any other `--` argument.
fn check_raw_args(args: impl IntoIterator<Item = OsString>) -> Result<(), CliError> {
    if args.into_iter().skip(1).any(|arg| arg == "--") {
        return Err(CliError::Usage("no such option: --".to_string()));
    }
    Ok(())
}

fn main() {
    if let Err(e) = check_raw_args(std::env::args_os()) {
        fail(e);
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => fail(e.into()),
    };

    init_logging(LoggingConfig::from_verbosity(cli.verbose));

    if let Err(e) = run(cli) {
        fail(e);
    }
}
