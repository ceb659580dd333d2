use anyhow::Context;
use clap::Parser;
use rolling_stats::Stats;
use serde::Serialize;
use std::path::{Path, PathBuf};

use echoscope::config::{DetectorMode, GeometryKind, GeometryModel, TimeSpec};
use echoscope::constants::DEFAULT_LENGTH_M;
use echoscope::output::{ExportRecord, OutputFormat, RecordKind, create_formatter};
use echoscope::tof::MarkRole;
use echoscope::{EchoConfig, Session, load_wav};

#[derive(Parser, Debug)]
#[command(name = "echoscope")]
#[command(about = "Measure acoustic time of flight and speed of sound from WAV recordings", long_about = None)]
struct Args {
    /// WAV files to analyze
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format: text, csv, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// TOML configuration file; command-line options override it
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Detection strategy: peak-pair, first-crossing
    #[arg(short = 'm', long, value_enum)]
    mode: Option<DetectorMode>,

    /// Envelope window in milliseconds
    #[arg(long)]
    env_ms: Option<f32>,

    /// Threshold as a fraction of the envelope maximum
    #[arg(short = 't', long)]
    threshold: Option<f32>,

    /// Minimum peak separation in milliseconds
    #[arg(long)]
    min_sep_ms: Option<f32>,

    /// Maximum number of peaks to report
    #[arg(long)]
    max_candidates: Option<usize>,

    /// Path model: round-trip, one-way, custom
    #[arg(short = 'g', long, value_enum)]
    geometry: Option<GeometryKind>,

    /// Physical length L in meters (round-trip, one-way)
    #[arg(short = 'l', long)]
    length: Option<f64>,

    /// Explicit acoustic path in meters (custom)
    #[arg(short = 'p', long)]
    path: Option<f64>,

    /// Estimated emission time for first-crossing mode (e.g., "0.15", "150ms")
    #[arg(long)]
    emit: Option<TimeSpec>,

    /// Manually place the first mark near this time (snapped to the loudest sample)
    #[arg(long)]
    t1: Option<TimeSpec>,

    /// Manually place the second mark near this time (snapped to the loudest sample)
    #[arg(long)]
    t2: Option<TimeSpec>,

    /// Channel to analyze in multi-channel files
    #[arg(long)]
    channel: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
struct StatsSummary {
    count: usize,
    mean: f64,
    std_dev: f64,
    min: f64,
    max: f64,
}

impl StatsSummary {
    fn from_stats(stats: &Stats<f64>) -> Option<Self> {
        if stats.count == 0 {
            return None;
        }
        Some(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
struct FileAnalysis {
    filename: String,
    #[serde(flatten)]
    record: Option<ExportRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct Summary {
    delta_t_s: Option<StatsSummary>,
    speed_mps: Option<StatsSummary>,
}

#[derive(Debug, Clone, Copy)]
struct ManualMarks {
    t1: Option<TimeSpec>,
    t2: Option<TimeSpec>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = build_config(&args)?;
    let marks = ManualMarks {
        t1: args.t1,
        t2: args.t2,
    };

    let results: Vec<FileAnalysis> = args
        .files
        .iter()
        .map(|path| analyze_file(path, &config, marks))
        .collect();
    let summary = summarize(&results);

    match args.format {
        OutputFormat::Text => print_text(&results, &summary, &config),
        OutputFormat::Csv => print_csv(&results, &config),
        OutputFormat::Json => print_json(&results, &summary)?,
    }

    Ok(())
}

fn build_config(args: &Args) -> anyhow::Result<EchoConfig> {
    let mut config = match args.config {
        Some(ref path) => EchoConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EchoConfig::default(),
    };

    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(ms) = args.env_ms {
        config.detection.envelope_window_ms = ms;
    }
    if let Some(threshold) = args.threshold {
        config.detection.relative_threshold = threshold;
    }
    if let Some(ms) = args.min_sep_ms {
        config.detection.min_separation_ms = ms;
    }
    if let Some(n) = args.max_candidates {
        config.detection.max_candidates = n;
    }

    if args.geometry.is_some() || args.length.is_some() || args.path.is_some() {
        let current = config.geometry;
        let kind = args.geometry.unwrap_or(current.kind());
        let length_m = args
            .length
            .or(current.length_m())
            .unwrap_or(DEFAULT_LENGTH_M);
        let path_m = args
            .path
            .or(current.custom_path_m())
            .unwrap_or(current.path_length_m());
        config.geometry = GeometryModel::from_parts(kind, length_m, path_m);
    }

    if let Some(emit) = args.emit {
        config.emission_time_s = Some(emit.as_secs());
    }
    if let Some(channel) = args.channel {
        config.channel = channel;
    }

    Ok(config)
}

fn analyze_file(path: &Path, config: &EchoConfig, marks: ManualMarks) -> FileAnalysis {
    let filename = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    match analyze_file_impl(path, config, marks) {
        Ok(record) => FileAnalysis {
            filename,
            record: Some(record),
            error: None,
        },
        Err(e) => {
            log::error!("{}: {:#}", filename, e);
            FileAnalysis {
                filename,
                record: None,
                error: Some(format!("{:#}", e)),
            }
        }
    }
}

fn analyze_file_impl(
    path: &Path,
    config: &EchoConfig,
    marks: ManualMarks,
) -> anyhow::Result<ExportRecord> {
    let buffer = load_wav(path, config.channel)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    log::info!(
        "{}: {} samples at {} Hz ({:.3} s)",
        path.display(),
        buffer.len(),
        buffer.sample_rate(),
        buffer.duration_secs()
    );

    let mut session = Session::new(buffer, config.clone());

    for (role, time) in [(MarkRole::First, marks.t1), (MarkRole::Second, marks.t2)] {
        let Some(time) = time else {
            continue;
        };
        let index = session
            .buffer()
            .index_at_time(time.as_secs())
            .context("Recording is empty")?;
        session
            .override_mark(role, index)
            .with_context(|| format!("Cannot place {} at {}", role.label(), time))?;
    }

    Ok(ExportRecord::from_measurement(session.measurement()))
}

fn summarize(results: &[FileAnalysis]) -> Summary {
    let mut dt_stats: Stats<f64> = Stats::new();
    let mut speed_stats: Stats<f64> = Stats::new();

    for record in results.iter().filter_map(|r| r.record.as_ref()) {
        if let Some(dt) = record.delta_t_s {
            dt_stats.update(dt);
        }
        if let Some(speed) = record.speed_mps {
            speed_stats.update(speed);
        }
    }

    Summary {
        delta_t_s: StatsSummary::from_stats(&dt_stats),
        speed_mps: StatsSummary::from_stats(&speed_stats),
    }
}

fn default_kind(config: &EchoConfig) -> RecordKind {
    match config.mode {
        DetectorMode::PeakPair => RecordKind::TwoEvent,
        DetectorMode::FirstCrossing => RecordKind::Trigger,
    }
}

fn print_text(results: &[FileAnalysis], summary: &Summary, config: &EchoConfig) {
    eprintln!(
        "Mode: {:?}, geometry: {} (path {:.3} m)",
        config.mode,
        config.geometry.label(),
        config.geometry.path_length_m()
    );
    eprintln!();

    let formatter = create_formatter(OutputFormat::Text);
    for result in results {
        match (&result.record, &result.error) {
            (Some(record), _) => println!("{:<40} {}", result.filename, formatter.format(record)),
            (None, Some(error)) => println!("{:<40} ERROR: {}", result.filename, error),
            (None, None) => println!("{:<40} -", result.filename),
        }
    }

    if results.len() > 1 {
        println!();
        print_stats_line("delta_t", "s", 6, summary.delta_t_s.as_ref());
        print_stats_line("speed", "m/s", 3, summary.speed_mps.as_ref());
    }
}

fn print_stats_line(name: &str, unit: &str, precision: usize, stats: Option<&StatsSummary>) {
    match stats {
        Some(s) => println!(
            "{:<8} n={:<4} mean={:.*} {unit} std={:.*} min={:.*} max={:.*}",
            name,
            s.count,
            precision,
            s.mean,
            precision,
            s.std_dev,
            precision,
            s.min,
            precision,
            s.max,
        ),
        None => println!("{:<8} n=0", name),
    }
}

fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn print_csv(results: &[FileAnalysis], config: &EchoConfig) {
    let formatter = create_formatter(OutputFormat::Csv);
    let kind = results
        .iter()
        .find_map(|r| r.record.as_ref().map(ExportRecord::kind))
        .unwrap_or_else(|| default_kind(config));
    let header = formatter.header(kind).unwrap_or_default();
    let columns = header.split(',').count();

    println!("filename,{},error", header);
    for result in results {
        let fields = match result.record {
            Some(ref record) if record.kind() == kind => formatter.format(record),
            _ => ",".repeat(columns.saturating_sub(1)),
        };
        println!(
            "{},{},{}",
            csv_escape(&result.filename),
            fields,
            csv_escape(result.error.as_deref().unwrap_or_default())
        );
    }
}

fn print_json(results: &[FileAnalysis], summary: &Summary) -> anyhow::Result<()> {
    #[derive(Serialize)]
    struct Report<'a> {
        files: &'a [FileAnalysis],
        summary: &'a Summary,
    }

    let json = serde_json::to_string_pretty(&Report {
        files: results,
        summary,
    })?;
    println!("{}", json);
    Ok(())
}
