mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{BuildArgs, RenderArgs};
use output::{OutputFormat, print_error};

/// scadsets - Enumerate OpenSCAD parameter sets and render every combination
#[derive(Parser)]
#[command(name = "scadsets")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(long, value_enum, default_value = "text", global = true)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Render every missing artifact of a model
  Build(BuildArgs),

  /// Show what build would render, without rendering or writing anything
  Plan(BuildArgs),

  /// Enumerate a configuration into a parameter-set file
  Enumerate {
    /// Configuration document
    #[arg(short = 'i', long = "input-json")]
    input: PathBuf,

    /// Parameter-set file to write (default: <input stem>.sets.json)
    #[arg(long = "output-json")]
    output_json: Option<PathBuf>,

    /// Re-enumerate even if the parameter-set file exists
    #[arg(short, long)]
    force: bool,
  },

  /// Render a single artifact, failing if the renderer fails
  Render(RenderArgs),

  /// Scaffold a configuration from an OpenSCAD parameter file
  Init {
    /// OpenSCAD parameter file (the customizer's <model>.json)
    parameter_file: PathBuf,

    /// Configuration to write (default: <model>.config.json)
    #[arg(short = 'o', long = "out")]
    out: Option<PathBuf>,

    /// Overwrite an existing configuration
    #[arg(long)]
    force: bool,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Build(args) => cmd::cmd_build(&args, cli.verbose, cli.output),
    Commands::Plan(args) => cmd::cmd_plan(&args, cli.verbose, cli.output),
    Commands::Enumerate {
      input,
      output_json,
      force,
    } => cmd::cmd_enumerate(&input, output_json, force, cli.verbose, cli.output),
    Commands::Render(args) => cmd::cmd_render(&args, cli.output),
    Commands::Init {
      parameter_file,
      out,
      force,
    } => cmd::cmd_init(&parameter_file, out, force, cli.output),
  }
}

/// Log to stderr at `warn`, or `info` with `--verbose`. `RUST_LOG` takes precedence.
fn init_tracing(verbose: bool) {
  let default_level = if verbose { "info" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}
