//! exrio - OpenEXR channel and layer tool
//!
//! Prints headers and catalogs of EXR files and extracts channels or layers
//! into new RGB(A) files.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "exrio")]
#[command(author, version, about = "OpenEXR channel and layer tool")]
#[command(long_about = "
Inspects OpenEXR files and extracts channels or layers.

Examples:
  exrio info render.exr                  # Window, channels, layers
  exrio info *.exr --stats               # Per-channel min/max
  exrio layers render.exr --json         # Layer catalog as JSON
  exrio extract render.exr -o diffuse.exr --layer diffuse
  exrio extract render.exr -o rgba.exr --channels R,G,B,A -c piz
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Display data window, channels and layers
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// List layers and their channels
    #[command(visible_alias = "l")]
    Layers(LayersArgs),

    /// Extract channels or a layer into a new RGB(A) file
    #[command(visible_alias = "x")]
    Extract(ExtractArgs),
}

#[derive(Args)]
struct InfoArgs {
    /// Input file(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Show per-channel min/max
    #[arg(short, long)]
    stats: bool,

    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct LayersArgs {
    /// Input file(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ExtractArgs {
    /// Input file
    input: PathBuf,

    /// Output file
    #[arg(short, long)]
    output: PathBuf,

    /// Layer or channel name to read (default: R, G, B)
    #[arg(short, long, conflicts_with = "channels")]
    layer: Option<String>,

    /// Comma-separated channel list, written as R, G, B[, A]
    #[arg(long, value_delimiter = ',')]
    channels: Vec<String>,

    /// Compression: none, rle, zip, piz
    #[arg(short = 'c', long, default_value = "zip")]
    compression: String,

    /// Keep the source data window origin
    #[arg(long)]
    keep_window: bool,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pools: rayon for per-file work, the codec for decode
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
        if !exrio_io::set_global_thread_count(cli.threads) {
            tracing::warn!(
                threads = exrio_io::global_thread_count(),
                "codec thread count already fixed"
            );
        }
    }

    match cli.command {
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Layers(args) => commands::layers::run(args, cli.verbose),
        Commands::Extract(args) => commands::extract::run(args, cli.verbose),
    }
}
