//! hough CLI: detect lines or circles in an image and write a JSON report.

use clap::{Args, Parser, Subcommand, ValueEnum};
use hough::circles::{CircleSearchParams, RadiusRange};
use hough::core::{Neighborhood, Threshold};
use hough::detect::{self, EdgeSource};
use hough::io::{CircleReport, HoughConfig, HoughReport, LineReport};
use hough::lines::{LineDetectorParams, ThetaAxis};
use hough::render::{self, LineProjection};
use image::ImageReader;
use std::path::PathBuf;

#[cfg(not(feature = "tracing"))]
use log::{info, warn};

#[cfg(feature = "tracing")]
use tracing::{info, warn};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

const DEFAULT_CANNY_LOW: f32 = 50.0;
const DEFAULT_CANNY_HIGH: f32 = 100.0;

#[derive(Parser)]
#[command(name = "hough")]
#[command(about = "Detect straight lines and circles with the Hough transform")]
#[command(version)]
struct Cli {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect straight lines.
    Lines(LinesArgs),
    /// Detect circles over a list or range of radii.
    Circles(CirclesArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EdgeKindArg {
    Threshold,
    Canny,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProjectionArg {
    Extended,
    Clip,
}

/// Options shared by both subcommands. Explicit flags override `--config`.
#[derive(Debug, Clone, Args)]
struct CommonArgs {
    /// Path to the input image.
    #[arg(long)]
    image: Option<PathBuf>,

    /// JSON config file (`HoughConfig`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to write the JSON report.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Path to write a green overlay of the detections.
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Edge extraction method.
    #[arg(long, value_enum)]
    edges: Option<EdgeKindArg>,

    /// Threshold edges: pixels brighter than this are edges.
    #[arg(long)]
    edge_level: Option<u8>,

    /// Canny low hysteresis threshold.
    #[arg(long)]
    canny_low: Option<f32>,

    /// Canny high hysteresis threshold.
    #[arg(long)]
    canny_high: Option<f32>,

    /// Maximum number of peaks (per radius for circles).
    #[arg(long)]
    num_peaks: Option<usize>,

    /// Suppression window rows; requires --hood-cols.
    #[arg(long, requires = "hood_cols")]
    hood_rows: Option<usize>,

    /// Suppression window columns; requires --hood-rows.
    #[arg(long, requires = "hood_rows")]
    hood_cols: Option<usize>,
}

#[derive(Debug, Clone, Args)]
struct LinesArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Rho bin width in pixels.
    #[arg(long)]
    rho_resolution: Option<f64>,

    /// Theta bin width in degrees over [0, 180).
    #[arg(long)]
    theta_step: Option<f64>,

    /// Absolute vote threshold.
    #[arg(long, conflicts_with = "threshold_rel")]
    threshold_abs: Option<u32>,

    /// Vote threshold as a fraction of the accumulator maximum.
    #[arg(long)]
    threshold_rel: Option<f32>,

    /// Keep only peaks with a near-parallel neighbor.
    #[arg(long)]
    filter: bool,

    /// Line filter theta half-width in bins.
    #[arg(long)]
    theta_hood: Option<usize>,

    /// Line filter rho half-width in bins.
    #[arg(long)]
    rho_hood: Option<usize>,

    /// How lines are drawn in the overlay.
    #[arg(long, value_enum, default_value_t = ProjectionArg::Extended)]
    projection: ProjectionArg,
}

#[derive(Debug, Clone, Args)]
struct CirclesArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Comma-separated radii to scan.
    #[arg(long, value_delimiter = ',')]
    radii: Vec<u32>,

    /// Smallest radius of an inclusive range (with --radius-max).
    #[arg(long, requires = "radius_max", conflicts_with = "radii")]
    radius_min: Option<u32>,

    /// Largest radius of an inclusive range (with --radius-min).
    #[arg(long, requires = "radius_min")]
    radius_max: Option<u32>,

    /// Step of the radius range.
    #[arg(long, default_value_t = 1)]
    radius_step: u32,

    /// Vote threshold as a fraction of each radius' accumulator maximum.
    #[arg(long)]
    threshold_rel: Option<f32>,

    /// Sweep the full 360 degrees around each edge pixel.
    #[arg(long)]
    full_sweep: bool,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    #[cfg(not(feature = "tracing"))]
    hough::core::init_with_level_name(&cli.log_level)?;

    #[cfg(feature = "tracing")]
    hough::init_tracing(false);

    match cli.command {
        Commands::Lines(args) => run_lines(&args),
        Commands::Circles(args) => run_circles(&args),
    }
}

// ── shared ─────────────────────────────────────────────────────────────

fn load_config(args: &CommonArgs) -> CliResult<HoughConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            info!("Loading config: {}", path.display());
            HoughConfig::load_json(path)?
        }
        None => {
            let Some(image) = &args.image else {
                return Err("either --image or --config is required".into());
            };
            HoughConfig::new(image.to_string_lossy())
        }
    };
    if let Some(image) = &args.image {
        cfg.image_path = image.to_string_lossy().into_owned();
    }
    if let Some(out) = &args.out {
        cfg.output_path = Some(out.to_string_lossy().into_owned());
    }
    if let Some(overlay) = &args.overlay {
        cfg.overlay_path = Some(overlay.to_string_lossy().into_owned());
    }
    cfg.edges = resolve_edges(cfg.edges, args);
    Ok(cfg)
}

fn resolve_edges(base: EdgeSource, args: &CommonArgs) -> EdgeSource {
    match (args.edges, base) {
        (Some(EdgeKindArg::Threshold), _) => EdgeSource::Threshold {
            level: args.edge_level.unwrap_or(0),
        },
        (Some(EdgeKindArg::Canny), _) => EdgeSource::Canny {
            low: args.canny_low.unwrap_or(DEFAULT_CANNY_LOW),
            high: args.canny_high.unwrap_or(DEFAULT_CANNY_HIGH),
        },
        (None, EdgeSource::Threshold { level }) => EdgeSource::Threshold {
            level: args.edge_level.unwrap_or(level),
        },
        (None, EdgeSource::Canny { low, high }) => EdgeSource::Canny {
            low: args.canny_low.unwrap_or(low),
            high: args.canny_high.unwrap_or(high),
        },
    }
}

fn neighborhood(args: &CommonArgs) -> Option<Neighborhood> {
    args.hood_rows
        .zip(args.hood_cols)
        .map(|(rows, cols)| Neighborhood::new(rows, cols))
}

fn load_image(cfg: &HoughConfig) -> CliResult<image::GrayImage> {
    info!("Loading image: {}", cfg.image_path);
    let img = ImageReader::open(&cfg.image_path)?.decode()?.to_luma8();
    info!("Image size: {}x{}", img.width(), img.height());
    Ok(img)
}

fn finish(cfg: &HoughConfig, report: &HoughReport) -> CliResult<()> {
    let out = cfg.output_path();
    report.write_json(&out)?;
    info!("Report written to {}", out.display());
    Ok(())
}

// ── lines ──────────────────────────────────────────────────────────────

fn line_params(base: Option<LineDetectorParams>, args: &LinesArgs) -> CliResult<LineDetectorParams> {
    let mut params = base.unwrap_or_default();
    if let Some(res) = args.rho_resolution {
        params.accumulator.rho_resolution = res;
    }
    if let Some(step) = args.theta_step {
        params.accumulator.theta = ThetaAxis::range(0.0, 180.0, step)?;
    }
    if let Some(n) = args.common.num_peaks {
        params.peaks.num_peaks = n;
    }
    if let Some(abs) = args.threshold_abs {
        params.peaks.threshold = Threshold::Absolute(abs);
    }
    if let Some(rel) = args.threshold_rel {
        params.peaks.threshold = Threshold::RelativeToMax(rel);
    }
    if let Some(hood) = neighborhood(&args.common) {
        params.peaks.neighborhood = Some(hood);
    }
    if args.filter || args.theta_hood.is_some() || args.rho_hood.is_some() {
        let mut filter = params.filter.unwrap_or_default();
        if let Some(t) = args.theta_hood {
            filter.theta_hood = t;
        }
        if let Some(r) = args.rho_hood {
            filter.rho_hood = r;
        }
        params.filter = Some(filter);
    }
    Ok(params)
}

fn run_lines(args: &LinesArgs) -> CliResult<()> {
    let cfg = load_config(&args.common)?;
    let params = line_params(cfg.lines.clone(), args)?;
    let img = load_image(&cfg)?;
    let mask = detect::edge_mask_from_image(&img, cfg.edges)?;

    let mut report = HoughReport::new(&cfg.image_path, img.width(), img.height(), mask.edge_count());
    let detector = hough::lines::LineDetector::new(params);
    let res = match detector.detect(&mask) {
        Ok(res) => res,
        Err(err) => {
            report.error = Some(err.to_string());
            finish(&cfg, &report)?;
            return Err(err.into());
        }
    };

    info!(
        "lines: {} peaks, {} after filtering",
        res.raw_peaks.len(),
        res.peaks.len()
    );
    if res.peaks.is_empty() {
        warn!("no lines detected");
    }
    for line in &res.lines {
        println!("rho={:.1} theta={:.1}", line.rho, line.theta_deg);
    }

    if let Some(path) = &cfg.overlay_path {
        let projection = match args.projection {
            ProjectionArg::Extended => LineProjection::default(),
            ProjectionArg::Clip => LineProjection::ClipToImage,
        };
        let overlay = render::draw_lines(&img, &res.peaks, &res.space, projection);
        render::save_overlay(&overlay, path)?;
        info!("Overlay written to {path}");
    }

    report.lines = Some(LineReport::from(&res));
    finish(&cfg, &report)
}

// ── circles ────────────────────────────────────────────────────────────

fn circle_params(base: Option<CircleSearchParams>, args: &CirclesArgs) -> CliResult<CircleSearchParams> {
    let mut params = base.unwrap_or_default();
    if !args.radii.is_empty() {
        params.radii = args.radii.clone();
    }
    if let (Some(min), Some(max)) = (args.radius_min, args.radius_max) {
        let range = RadiusRange {
            min,
            max,
            step: args.radius_step,
        };
        params.radii = range.radii()?;
    }
    if let Some(n) = args.common.num_peaks {
        params.num_peaks = n;
    }
    if let Some(rel) = args.threshold_rel {
        params.relative_threshold = rel;
    }
    if let Some(hood) = neighborhood(&args.common) {
        params.neighborhood = Some(hood);
    }
    if args.full_sweep {
        params.sweep = hough::circles::AngleSweep::Full;
    }
    Ok(params)
}

fn run_circles(args: &CirclesArgs) -> CliResult<()> {
    let cfg = load_config(&args.common)?;
    let params = circle_params(cfg.circles.clone(), args)?;
    let img = load_image(&cfg)?;
    let mask = detect::edge_mask_from_image(&img, cfg.edges)?;

    let mut report = HoughReport::new(&cfg.image_path, img.width(), img.height(), mask.edge_count());
    let res = match hough::circles::find_circles(&mask, &params) {
        Ok(res) => res,
        Err(err) => {
            report.error = Some(err.to_string());
            finish(&cfg, &report)?;
            return Err(err.into());
        }
    };

    info!("circles: {} over {} radii", res.len(), params.radii.len());
    if res.is_empty() {
        warn!("no circles detected");
    }
    for c in res.circles() {
        println!(
            "x={:.0} y={:.0} r={:.0} votes={}",
            c.center.x, c.center.y, c.radius, c.votes
        );
    }

    if let Some(path) = &cfg.overlay_path {
        let overlay = render::draw_circles(&img, &res);
        render::save_overlay(&overlay, path)?;
        info!("Overlay written to {path}");
    }

    report.circles = Some(CircleReport::from(&res));
    finish(&cfg, &report)
}
