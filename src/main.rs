use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use imgforge::config::{FilterArg, ModeArg, ResizeConfig};
use imgforge::{batch_resize, BatchResult};

/// Batch-resize a directory's worth of JPEG, PNG, WebP and BMP images.
#[derive(Parser, Debug)]
#[command(name = "imgforge")]
#[command(about = "Resize a batch of images with a pipelined or worker-pool scheduler")]
struct Args {
    /// Input image paths.
    #[arg(required = true, help = "One or more input image files")]
    inputs: Vec<PathBuf>,

    /// Output directory; each input's filename is reused inside it.
    #[arg(short, long, help = "Directory resized images are written into")]
    output_dir: PathBuf,

    /// Resize mode.
    #[arg(short, long, value_enum, default_value = "fit-width")]
    mode: ModeArg,

    /// Target width in pixels (FIT_WIDTH, EXACT_SIZE).
    #[arg(long, default_value_t = 0)]
    width: u32,

    /// Target height in pixels (FIT_HEIGHT, EXACT_SIZE).
    #[arg(long, default_value_t = 0)]
    height: u32,

    /// Scale factor, e.g. 0.5 for half size (SCALE_PERCENT).
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Resampling filter.
    #[arg(short, long, value_enum, default_value = "mitchell")]
    filter: FilterArg,

    /// Encode quality, 1-100 (ignored for BMP).
    #[arg(short, long, default_value_t = 85)]
    quality: u8,

    /// Preserve aspect ratio when the target size doesn't match the input's.
    #[arg(long, default_value_t = true)]
    keep_aspect_ratio: bool,

    /// Worker thread count; 0 selects an adaptive count based on batch size.
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Abort remaining work on the first failure (disables the pipeline scheduler).
    #[arg(long, default_value_t = false)]
    stop_on_error: bool,

    /// Prefer the pipeline scheduler for large batches (default: on).
    #[arg(long, default_value_t = true)]
    max_speed: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = ResizeConfig {
        mode: args.mode,
        target_width: args.width,
        target_height: args.height,
        scale_percent: args.scale,
        keep_aspect_ratio: args.keep_aspect_ratio,
        quality: args.quality,
        filter: args.filter,
        num_threads: args.threads,
        stop_on_error: args.stop_on_error,
        max_speed: args.max_speed,
    };
    config.validate().map_err(anyhow::Error::msg)?;

    std::fs::create_dir_all(&args.output_dir)?;

    let request = config.to_resize_request();
    let options = config.to_batch_options();
    let result: BatchResult = batch_resize(&args.inputs, &args.output_dir, request, options);

    println!(
        "{} succeeded, {} failed (of {})",
        result.success_count, result.failed_count, result.total
    );
    for error in &result.errors {
        eprintln!("error: {error}");
    }

    if result.failed_count > 0 {
        std::process::exit(1);
    }
    Ok(())
}
