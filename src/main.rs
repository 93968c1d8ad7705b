use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use sizegauge::params::{DEFAULT_BLUR, DEFAULT_PIXEL_RATIO, DEFAULT_THRESHOLD};
use sizegauge::{
    ColorPolicy, DebugConfig, MeasureParams, MeasureRequest, MeasurementPipeline, MeasurementResult,
};

#[derive(Parser)]
#[command(name = "sizegauge")]
#[command(about = "Measure the largest round object in an image")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Save every intermediate stage to directory (must be empty)
    #[arg(long, value_name = "DIR", global = true)]
    debug_out: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure an image file
    Measure(MeasureArgs),
    /// Answer a JSON request with `image_data` (a data URL) and optional
    /// `threshold`, `blur_amount` and `pixel_ratio`
    Request {
        /// Path to the request JSON, or `-` for stdin
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

#[derive(Args)]
struct MeasureArgs {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Low Canny threshold (high threshold is twice this)
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: i32,

    /// Box blur kernel size in pixels
    #[arg(long, default_value_t = DEFAULT_BLUR)]
    blur: i32,

    /// Millimeters per pixel
    #[arg(long, default_value_t = DEFAULT_PIXEL_RATIO)]
    pixel_ratio: f64,

    /// Write the annotated PNG here
    #[arg(short, long, value_name = "PNG")]
    output: Option<PathBuf>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Seed for random contour colors (default: colors follow contour order)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut pipeline = MeasurementPipeline::default();
    if let Some(dir) = &args.debug_out {
        pipeline = pipeline.with_debug(DebugConfig::new(dir)?);
    }

    match args.command {
        Commands::Measure(measure) => run_measure(pipeline, &measure),
        Commands::Request { path } => run_request(pipeline, &path),
    }
}

fn run_measure(pipeline: MeasurementPipeline, args: &MeasureArgs) -> anyhow::Result<()> {
    let colors = match args.seed {
        Some(seed) => ColorPolicy::Seeded(seed),
        None => ColorPolicy::ByIndex,
    };
    let pipeline = pipeline
        .with_params(MeasureParams::new(args.threshold, args.blur, args.pixel_ratio))
        .with_colors(colors);

    let result = pipeline.measure_file(&args.image_path);

    if let (Some(output), Some(image)) = (&args.output, &result.annotated_image) {
        std::fs::write(output, &image.bytes)?;
        log::info!("Annotated image written to {}", output.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
    }

    if let Some(error) = &result.error {
        anyhow::bail!("{}", error);
    }
    Ok(())
}

fn run_request(pipeline: MeasurementPipeline, path: &Path) -> anyhow::Result<()> {
    let body = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(path)?
    };

    let result = match serde_json::from_str::<MeasureRequest>(&body) {
        Ok(request) => pipeline.measure_request(&request),
        Err(e) => MeasurementResult::failure_message(format!("invalid request: {e}")),
    };
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}

fn print_summary(result: &MeasurementResult) {
    println!("Diameter : {} mm", result.diameter_mm);
    println!("Category : {}", result.category);
    println!("Radius   : {} px", result.radius_pixels);
    if let Some(center) = result.center {
        println!("Center   : ({}, {})", center.center_x, center.center_y);
    }
    if let Some(error) = &result.error {
        println!("Error    : {}", error);
    }
}
