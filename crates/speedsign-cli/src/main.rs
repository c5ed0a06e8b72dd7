//! speedsign CLI: red circular road-sign detection on still images.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

use speedsign::{CircleDetector, CircleRansacConfig, PipelineConfig, SignPipeline};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "speedsign")]
#[command(about = "Detect red circular speed signs in road-side camera frames")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full frame pipeline on an image.
    Detect(CliDetectArgs),

    /// Run the RANSAC circle search on a binary edge image.
    Circle(CliCircleArgs),

    /// Print the default pipeline configuration as JSON.
    DefaultConfig,
}

#[derive(Debug, Clone, Args)]
struct CliDetectArgs {
    /// Path to the input frame.
    #[arg(long)]
    image: PathBuf,

    /// Path to write the frame report (JSON).
    #[arg(long)]
    out: PathBuf,

    /// Path to write the frame with overlays drawn (PNG).
    #[arg(long)]
    annotated: Option<PathBuf>,

    /// Pipeline configuration (JSON). Fields not listed keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the circle search.
    #[arg(long)]
    seed: Option<u64>,

    /// ROI width as a percentage of half the frame width.
    #[arg(long)]
    roi_width_pct: Option<u32>,

    /// ROI height as a percentage of the frame height.
    #[arg(long)]
    roi_height_pct: Option<u32>,
}

#[derive(Debug, Clone, Args)]
struct CliCircleArgs {
    /// Binary edge image; every non-zero pixel is an edge point.
    #[arg(long)]
    image: PathBuf,

    /// Path to write the search result (JSON).
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value = "15")]
    min_radius: u32,

    #[arg(long, default_value = "100")]
    max_radius: u32,

    /// Number of RANSAC trials.
    #[arg(long, default_value = "40")]
    trials: usize,

    /// Minimum confidence to accept a circle.
    #[arg(long, default_value = "0.7")]
    confidence: f64,

    #[arg(long, default_value = "42")]
    seed: u64,
}

impl CliDetectArgs {
    fn to_config(&self) -> CliResult<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path).map_err(|e| -> CliError {
                format!("Failed to load config {}: {}", path.display(), e).into()
            })?,
            None => PipelineConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.circle.seed = seed;
        }
        if let Some(pct) = self.roi_width_pct {
            config.roi.width_pct = pct;
        }
        if let Some(pct) = self.roi_height_pct {
            config.roi.height_pct = pct;
        }
        config.validate()?;
        Ok(config)
    }
}

impl CliCircleArgs {
    fn to_config(&self) -> CliResult<CircleRansacConfig> {
        if self.min_radius > self.max_radius {
            return Err(format!(
                "--min-radius ({}) exceeds --max-radius ({})",
                self.min_radius, self.max_radius
            )
            .into());
        }
        Ok(CircleRansacConfig {
            min_radius: self.min_radius,
            max_radius: self.max_radius,
            trial_budget: self.trials,
            confidence_threshold: self.confidence,
            seed: self.seed,
            ..CircleRansacConfig::default()
        })
    }
}

fn open_image(path: &Path) -> CliResult<image::DynamicImage> {
    tracing::info!("Loading image: {}", path.display());
    image::open(path)
        .map_err(|e| -> CliError { format!("Failed to open image {}: {}", path.display(), e).into() })
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, &json)?;
    tracing::info!("Results written to {}", path.display());
    Ok(())
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect(args) => run_detect(&args),
        Commands::Circle(args) => run_circle(&args),
        Commands::DefaultConfig => run_default_config(),
    }
}

// ── detect ─────────────────────────────────────────────────────────────

fn run_detect(args: &CliDetectArgs) -> CliResult<()> {
    let config = args.to_config()?;
    let mut frame = open_image(&args.image)?.to_rgba8();
    let (w, h) = frame.dimensions();
    tracing::info!("Image size: {}x{}", w, h);

    let mut pipeline = SignPipeline::new(config);
    let report = pipeline.process_frame(&mut frame, Instant::now());

    match (&report.circle, report.decision) {
        (Some(det), Some(decision)) => tracing::info!(
            "Circle at ({}, {}) r={} confidence={:.2}: {:?}",
            det.circle.center.x,
            det.circle.center.y,
            det.circle.radius,
            det.confidence,
            decision,
        ),
        _ => tracing::info!("No sign found"),
    }

    write_json(&args.out, &report)?;

    if let Some(path) = &args.annotated {
        frame.save(path).map_err(|e| -> CliError {
            format!("Failed to save {}: {}", path.display(), e).into()
        })?;
        tracing::info!("Annotated frame written to {}", path.display());
    }

    Ok(())
}

// ── circle ─────────────────────────────────────────────────────────────

fn run_circle(args: &CliCircleArgs) -> CliResult<()> {
    let config = args.to_config()?;
    let edges = open_image(&args.image)?.to_luma8();

    let detector = CircleDetector::with_config(config);
    let search = detector.search(&edges);

    tracing::info!(
        "{} edge points, {} trials ({} degenerate, {} out of range, {} low confidence)",
        search.stats.num_edge_points,
        search.stats.trials,
        search.stats.degenerate,
        search.stats.radius_out_of_range,
        search.stats.low_confidence,
    );
    match (&search.detection, search.failure) {
        (Some(det), _) => tracing::info!(
            "Circle at ({}, {}) r={} confidence={:.2}",
            det.circle.center.x,
            det.circle.center.y,
            det.circle.radius,
            det.confidence,
        ),
        (None, Some(failure)) => tracing::info!("No circle: {:?}", failure),
        (None, None) => tracing::info!("No circle"),
    }

    write_json(&args.out, &search)
}

// ── default-config ─────────────────────────────────────────────────────

fn run_default_config() -> CliResult<()> {
    let json = serde_json::to_string_pretty(&PipelineConfig::default())?;
    println!("{}", json);
    Ok(())
}
