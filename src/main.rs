//! footprinter: IPC-7351 land pattern generator
//!
//! Generates KiCad footprints and PNG previews for QFP and SOIC/SOP packages
//! from their IPC-7351 names.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::{debug, error, info, Level};
use tracing_subscriber::EnvFilter;

use ipc_footprinter::config::{self, Config};
use ipc_footprinter::error::{ConfigError, FootprintError};
use ipc_footprinter::ipc7351::density::DensityLevel;
use ipc_footprinter::ipc7351::geometry::Package;
use ipc_footprinter::ipc7351::library::build_ms026_library;
use ipc_footprinter::ipc7351::packages::{generate_from_name, ParamOverrides};
use ipc_footprinter::kicad::json::read_package;
use ipc_footprinter::kicad::{save_footprint, save_library, FootprintFormat, KicadError, LegacyLibrary};
use ipc_footprinter::preview::render_png;

/// IPC-7351 land pattern generator for KiCad.
///
/// Reads an IPC package name such as QFP50P900X900-48 or SOIC127P600-14 and
/// writes the matching footprint.
#[derive(Parser, Debug)]
#[command(name = "footprinter")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(long, global = true, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one footprint from an IPC-7351 name
    Generate(GenerateArgs),

    /// Build the JEDEC MS-026 QFP libraries, one legacy file per density level
    Library(LibraryArgs),

    /// Render a module from a legacy library or a JSON package dump to PNG
    Preview(PreviewArgs),
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// IPC device name, for example QFP50P900X900-48
    #[arg(short, long, value_name = "IPCNAME")]
    name: String,

    /// Output file format
    #[arg(long, value_enum, default_value_t = OutputFormat::KicadMod)]
    format: OutputFormat,

    /// Output file name [default: IPCNAME with the format's extension]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Image scale in pixels per mm
    #[arg(long, value_name = "N")]
    scale: Option<f64>,

    /// L - Terminal (lead) length, heel to toe [mm]
    #[arg(long, value_name = "N")]
    footlen: Option<f64>,

    /// L1 - Terminal (lead) length, package to toe [mm]
    #[arg(long, value_name = "N")]
    termlen: Option<f64>,

    /// b - Terminal (lead) width, maximum [mm]
    #[arg(long, value_name = "N")]
    termwidth: Option<f64>,

    /// IPC-7351 density level: L (least), N (nominal), M (most), 0 (none)
    #[arg(long, value_name = "D")]
    density: Option<String>,

    /// Override toe protrusion (outside pad length) [mm]
    #[arg(long, value_name = "N")]
    toe_protrusion: Option<f64>,

    /// Silkscreen line width [mm]
    #[arg(long, value_name = "N")]
    silkscreen_width: Option<f64>,
}

#[derive(clap::Args, Debug)]
struct LibraryArgs {
    /// File name prefix; files are named PREFIX-D.mod
    #[arg(long, default_value = "generator")]
    prefix: String,

    /// Density levels to build, one letter each
    #[arg(long, default_value = "LNM")]
    densities: String,

    /// Directory to write the libraries to
    #[arg(long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,
}

#[derive(clap::Args, Debug)]
struct PreviewArgs {
    /// Legacy library (.mod or .emp) or package dump (.json)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Module to render from a library [default: first in the file]
    #[arg(short, long, value_name = "NAME")]
    module: Option<String>,

    /// Output file name [default: FILE with a .png extension]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Image scale in pixels per mm
    #[arg(long, value_name = "N")]
    scale: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// S-expression footprint (.kicad_mod)
    #[value(name = "kicad_mod")]
    KicadMod,
    /// Exported legacy module (.emp)
    Emp,
    /// Preview image (.png)
    Png,
    /// Package geometry dump (.json)
    Json,
}

impl OutputFormat {
    const fn extension(self) -> &'static str {
        match self {
            Self::KicadMod => "kicad_mod",
            Self::Emp => "emp",
            Self::Png => "png",
            Self::Json => "json",
        }
    }
}

/// Anything that can stop a subcommand.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Footprint(#[from] FootprintError),

    #[error(transparent)]
    Kicad(#[from] KicadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("module '{name}' not found in {}", path.display())]
    ModuleNotFound { name: String, path: PathBuf },

    #[error("invalid image scale {scale}: expected a positive number of pixels per mm")]
    InvalidScale { scale: f64 },
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN, // Default to warn for unknown levels
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Picks the command line scale over the configured one and checks it.
fn resolve_scale(scale: Option<f64>, cfg: &Config) -> Result<f64, CliError> {
    let scale = scale.unwrap_or(cfg.defaults.png_scale);
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(CliError::InvalidScale { scale })
    }
}

fn run_generate(args: &GenerateArgs, cfg: &Config) -> Result<(), CliError> {
    let default_density = cfg.defaults.density_level()?;
    let overrides = ParamOverrides {
        density: args.density.as_deref().map(DensityLevel::parse).transpose()?,
        lead_width: args.termwidth,
        foot_length: args.footlen,
        terminal_length: args.termlen,
        silkscreen_width: Some(args.silkscreen_width.unwrap_or(cfg.defaults.silkscreen_width)),
        toe_protrusion: args.toe_protrusion,
    };
    debug!(?overrides, "Parameter overrides");

    let package = generate_from_name(&args.name, &overrides, default_density)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.{}", args.name, args.format.extension())));

    match args.format {
        OutputFormat::KicadMod => save_footprint(&output, FootprintFormat::KicadMod, &args.name, &package)?,
        OutputFormat::Emp => save_footprint(&output, FootprintFormat::Legacy, &args.name, &package)?,
        OutputFormat::Json => save_footprint(&output, FootprintFormat::Json, &args.name, &package)?,
        OutputFormat::Png => {
            let scale = resolve_scale(args.scale, cfg)?;
            let (width, height) = render_png(&package, scale, &output)?;
            info!(path = %output.display(), width, height, "Wrote preview");
        }
    }
    Ok(())
}

/// Parses a string of density letters such as "LNM".
fn parse_densities(letters: &str) -> Result<Vec<DensityLevel>, FootprintError> {
    letters
        .chars()
        .map(|c| DensityLevel::parse(&c.to_string()))
        .collect()
}

fn run_library(args: &LibraryArgs) -> Result<(), CliError> {
    for density in parse_densities(&args.densities)? {
        let entries = build_ms026_library(density)?;
        let path = args
            .output_dir
            .join(format!("{}-{}.mod", args.prefix, density.suffix()));
        save_library(&path, &entries)?;
    }
    Ok(())
}

fn run_preview(args: &PreviewArgs, cfg: &Config) -> Result<(), CliError> {
    let scale = resolve_scale(args.scale, cfg)?;
    let (name, package) = load_preview_package(args)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_preview_path(&args.file));
    let (width, height) = render_png(&package, scale, &output)?;
    info!(module = %name, path = %output.display(), width, height, "Wrote preview");
    Ok(())
}

/// Reads the package to preview, named after the module or the file stem.
fn load_preview_package(args: &PreviewArgs) -> Result<(String, Package), CliError> {
    let is_json = args
        .file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let package = read_package(&args.file)?;
        let name = args
            .file
            .file_stem()
            .map_or_else(String::new, |stem| stem.to_string_lossy().into_owned());
        return Ok((name, package));
    }

    let library = LegacyLibrary::read(&args.file)?;
    let entry = match &args.module {
        Some(name) => library.module(name).ok_or_else(|| CliError::ModuleNotFound {
            name: name.clone(),
            path: args.file.clone(),
        })?,
        None => library
            .modules
            .first()
            .ok_or_else(|| KicadError::empty(format!("no modules in {}", args.file.display())))?,
    };
    Ok((entry.name.clone(), entry.package.clone()))
}

fn default_preview_path(file: &Path) -> PathBuf {
    file.with_extension("png")
}

fn run(command: &Command, cfg: &Config) -> Result<(), CliError> {
    match command {
        Command::Generate(args) => run_generate(args, cfg),
        Command::Library(args) => run_library(args),
        Command::Preview(args) => run_preview(args, cfg),
    }
}

/// Entry point for the footprinter CLI.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let config_path = args.config.as_deref();
    let cfg = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting footprinter");

    match run(&args.command, &cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Failed");
            ExitCode::FAILURE
        }
    }
}
