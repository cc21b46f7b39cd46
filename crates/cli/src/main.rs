//! SatRisk CLI - property risk assessment from spectral factor rasters

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use satrisk_acquire::{DateRange, FactorSource, TiffDirectorySource};
use satrisk_analysis::narrative::risk_level_text;
use satrisk_analysis::{
    analyze, analyze_trend, AnalysisReport, PeriodAssessment, ProcessingMode, TrendOptions,
};
use satrisk_colormap::{colorize, ColorScheme};
use satrisk_core::io::read_factor_tiff;
use satrisk_core::json::ToValue;
use satrisk_core::{AnalysisConfig, Bounds};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "satrisk")]
#[command(author, version, about = "Property risk assessment from satellite indices", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON configuration file (defaults are used for missing fields)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a factor TIFF
    Info {
        /// Input factor file
        input: PathBuf,
    },
    /// Render the first channel of a TIFF as a PNG
    Colorize {
        /// Input factor file
        input: PathBuf,
        /// Output PNG
        output: PathBuf,
        /// Color scheme: gray, red, green, blue, water_blue, heat, purple, blue_to_brown
        #[arg(short, long, default_value = "gray")]
        scheme: ColorScheme,
        /// Lower end of the normalization range (data minimum if omitted)
        #[arg(long)]
        min: Option<f64>,
        /// Upper end of the normalization range (data maximum if omitted)
        #[arg(long)]
        max: Option<f64>,
        /// Treat values as 0-255 intensities instead of normalizing
        #[arg(long)]
        raw: bool,
    },
    /// Assess one period from a directory of factor TIFFs
    Analyze {
        /// Area as min_lon,min_lat,max_lon,max_lat
        #[arg(long)]
        bbox: String,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: String,
        /// Directory holding <source_id>.tif per factor
        #[arg(short, long)]
        data: PathBuf,
        /// Output directory for images and summary.json
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Assess a sequence of periods and summarize the trend
    Trend {
        /// Area as min_lon,min_lat,max_lon,max_lat
        #[arg(long)]
        bbox: String,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: String,
        /// Directory holding factor TIFFs, optionally in <start>_<end> subdirectories
        #[arg(short, long)]
        data: PathBuf,
        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,
        /// Months between period starts
        #[arg(short, long, default_value = "6")]
        interval: u32,
        /// Worker threads (0 = all cores, 1 = sequential)
        #[arg(short, long, default_value = "0")]
        threads: usize,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(p) => AnalysisConfig::from_path(p)
            .with_context(|| format!("Failed to load config {}", p.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

fn parse_bbox(s: &str) -> Result<Bounds> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .with_context(|| format!("Invalid bbox: {}", s))?;
    if parts.len() != 4 {
        anyhow::bail!("bbox must be min_lon,min_lat,max_lon,max_lat, got: {}", s);
    }
    Bounds::from_corners((parts[0], parts[1]), (parts[2], parts[3])).context("Invalid area")
}

fn write_json(value: &serde_json::Value, path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

fn write_images(result: &PeriodAssessment, dir: &Path) -> Result<()> {
    result
        .risk_image
        .write_png(dir.join("risk_map.png"))
        .context("Failed to write risk map")?;
    for (factor, image) in &result.factor_images {
        let path = dir.join(format!("{}.png", factor.name()));
        image
            .write_png(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

fn print_report(report: &AnalysisReport) {
    let risk = report.composite_risk();
    println!("{}", report.result.message());
    println!("Area: {:.1} km² at {} m", report.area.area_km2, report.area.resolution_m);
    println!("Composite risk: {:.2} ({})", risk, risk_level_text(risk));
    for (factor, value) in report.result.risk_values().iter() {
        println!("  {:<18} {:.2}", factor.name(), value);
    }
    println!("\nRecommendations:");
    for line in report.recommendations() {
        println!("  - {}", line);
    }
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Info { input } => {
            let data = read_factor_tiff(&input).context("Failed to read factor file")?;
            let (rows, cols) = data.shape();
            let values = data.masked_values();
            let stats = values.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, rows * cols);
            println!("Channels: {}", data.channels());
            if let Some(mask) = data.mask() {
                println!("Mask coverage: {:.1}%", 100.0 * mask.coverage());
            }
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            println!(
                "  Valid cells: {} ({:.1}%)",
                stats.valid_count,
                100.0 * stats.valid_count as f64 / (rows * cols).max(1) as f64
            );
        }

        Commands::Colorize {
            input,
            output,
            scheme,
            min,
            max,
            raw,
        } => {
            let data = read_factor_tiff(&input).context("Failed to read factor file")?;
            let start = Instant::now();
            let image = colorize(&data.values(), scheme, !raw, min, max);
            let elapsed = start.elapsed();
            image.write_png(&output).context("Failed to write PNG")?;
            done("Image", &output, elapsed);
        }

        Commands::Analyze {
            bbox,
            start,
            end,
            data,
            output,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let bounds = parse_bbox(&bbox)?;
            let period = DateRange::parse(&start, &end).context("Invalid period")?;
            let source: Arc<dyn FactorSource> = Arc::new(TiffDirectorySource::new(&data));

            let pb = spinner("Analyzing...");
            let started = Instant::now();
            let report = analyze(source, bounds, period, &config);
            pb.finish_and_clear();
            let report = report.context("Analysis failed")?;
            let elapsed = started.elapsed();

            std::fs::create_dir_all(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            write_images(&report.result, &output)?;
            let summary = output.join("summary.json");
            write_json(&report.to_value().to_json(), &summary)?;

            print_report(&report);
            done("Summary", &summary, elapsed);
        }

        Commands::Trend {
            bbox,
            start,
            end,
            data,
            output,
            interval,
            threads,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let bounds = parse_bbox(&bbox)?;
            let range = DateRange::parse(&start, &end).context("Invalid period")?;
            let source: Arc<dyn FactorSource> = Arc::new(TiffDirectorySource::new(&data));
            let options = TrendOptions {
                interval_months: interval,
                mode: ProcessingMode::from_threads(threads),
            };

            let pb = spinner("Analyzing periods...");
            let started = Instant::now();
            let report = analyze_trend(source, bounds, range, &options, &config);
            pb.finish_and_clear();
            let report = report.context("Trend analysis failed")?;
            let elapsed = started.elapsed();

            for period in &report.periods {
                let risk = period.composite_risk();
                info!("{}: {:.2} ({})", period.period, risk, risk_level_text(risk));
            }
            for (period, reason) in &report.skipped {
                info!("{}: skipped ({})", period, reason);
            }
            println!("{}", report.summary());

            write_json(&report.to_value().to_json(), &output)?;
            done("Trend", &output, elapsed);
        }
    }

    Ok(())
}
