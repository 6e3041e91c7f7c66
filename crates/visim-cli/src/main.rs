//! visim - colour-vision and infant-vision simulation on raw RGBA8 dumps
//!
//! Images are read and written as headerless interleaved RGBA, 8 bits per
//! channel; the caller supplies the dimensions.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "visim")]
#[command(author, version, about = "Colour-vision and infant-vision simulation")]
#[command(long_about = "
Simulates dichromatic colour vision, applies Daltonize correction, and
simulates the blurred vision of infants, on raw RGBA8 pixel dumps.

Examples:
  visim simulate in.rgba -o out.rgba -W 640 -H 480 --type deuteranope
  visim daltonize in.rgba -o out.rgba -W 640 -H 480 --lum-scale 0.8 --simulate protanope
  visim infant in.rgba -o out.rgba -W 512 -H 512 --age week8 --view-dist-cm 40
  visim plan --size 512 --age week4
  visim presets
  visim --config visim.yaml infant in.rgba -o out.rgba -W 512 -H 512
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// YAML settings file; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a colour-vision deficiency
    #[command(visible_alias = "s")]
    Simulate(SimulateArgs),

    /// Apply Daltonize correction
    #[command(visible_alias = "d")]
    Daltonize(DaltonizeArgs),

    /// Simulate infant vision (square images only)
    #[command(visible_alias = "i")]
    Infant(InfantArgs),

    /// Show blur sigmas and treatments without processing pixels
    Plan(PlanArgs),

    /// List the infant-vision age presets
    Presets,
}

#[derive(Args)]
struct RawImageArgs {
    /// Input RGBA8 dump
    input: PathBuf,

    /// Output RGBA8 dump
    #[arg(short, long)]
    output: PathBuf,

    /// Image width in pixels
    #[arg(short = 'W', long)]
    width: u32,

    /// Image height in pixels
    #[arg(short = 'H', long)]
    height: u32,
}

#[derive(Args)]
struct SimulateArgs {
    #[command(flatten)]
    image: RawImageArgs,

    /// normal, protanope, deuteranope, tritanope
    #[arg(short = 't', long = "type")]
    kind: Option<String>,
}

#[derive(Args)]
struct DaltonizeArgs {
    #[command(flatten)]
    image: RawImageArgs,

    /// Red-green stretch, 0..1
    #[arg(long)]
    lm_stretch: Option<f64>,

    /// Red-green into luminance, 0..1
    #[arg(long)]
    lum_scale: Option<f64>,

    /// Red-green into blue-yellow, 0..1
    #[arg(long)]
    s_scale: Option<f64>,

    /// Interpret the three strengths as 0..100 slider values
    #[arg(long)]
    percent: bool,

    /// Also write the corrected image as seen by this deficiency
    /// (to <output>.seen.rgba)
    #[arg(long)]
    simulate: Option<String>,

    /// Print the correction as a 4x4 linear-RGB matrix
    #[arg(long)]
    print_matrix: bool,
}

#[derive(Args)]
struct GeometryArgs {
    /// week0, week4, week8, week12, week24, adult
    #[arg(short, long)]
    age: Option<String>,

    /// Displayed image width in cm
    #[arg(long)]
    display_width_cm: Option<f64>,

    /// Viewing distance in cm
    #[arg(long)]
    view_dist_cm: Option<f64>,
}

#[derive(Args)]
struct InfantArgs {
    #[command(flatten)]
    image: RawImageArgs,

    #[command(flatten)]
    geometry: GeometryArgs,

    /// Crop non-square input to its centred square instead of failing
    #[arg(long)]
    crop: bool,
}

#[derive(Args)]
struct PlanArgs {
    /// Image side in pixels
    #[arg(short, long)]
    size: u32,

    #[command(flatten)]
    geometry: GeometryArgs,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let settings = commands::load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Simulate(args) => commands::simulate::run(args, settings),
        Commands::Daltonize(args) => commands::daltonize::run(args, settings),
        Commands::Infant(args) => commands::infant::run(args, settings),
        Commands::Plan(args) => commands::infant::run_plan(args, settings),
        Commands::Presets => commands::infant::run_presets(),
    }
}
