use anyhow::{Context, Result};
use clap::Parser;
use echoscope::config::GeometryKind;
use echoscope::save_wav;
use echoscope::simulation::{
    PulseShape, RecordingConfig, SPEED_OF_SOUND_MPS, generate_recording,
};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "generate_wav")]
#[command(about = "Generate synthetic pulse/echo recordings for time-of-flight testing")]
struct Args {
    /// TOML recording configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "data/synthetic")]
    output_dir: PathBuf,

    /// Lengths in meters: comma-separated (e.g., "0.5,1.7,3") or range (e.g., "1-5:0.5")
    #[arg(short, long, default_value = "1.7")]
    lengths: String,

    /// How the sound travels the length
    #[arg(short, long, value_enum, default_value = "round-trip")]
    geometry: GeometryKind,

    /// Number of trials per length
    #[arg(short, long, default_value_t = 1)]
    trials: u32,

    /// Base seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Speed of sound used to place echoes, in m/s
    #[arg(long, default_value_t = SPEED_OF_SOUND_MPS)]
    speed: f64,

    /// Echo gain relative to the direct pulse
    #[arg(long, default_value_t = 0.5)]
    echo_gain: f32,

    /// Background noise standard deviation (CLI override)
    #[arg(long)]
    noise: Option<f32>,

    /// Emit a single-sample click instead of a noise burst
    #[arg(long)]
    click: bool,

    /// Output filename prefix
    #[arg(long, default_value = "echo")]
    prefix: String,

    /// Generate manifest.json
    #[arg(long)]
    manifest: bool,
}

#[derive(Debug, serde::Serialize)]
struct ManifestEntry {
    file: String,
    length_m: f64,
    trial: u32,
    seed: u64,
    emission_time_s: f64,
    echo_times_s: Vec<f64>,
}

#[derive(Debug, serde::Serialize)]
struct Manifest {
    sample_rate: u32,
    speed_mps: f64,
    geometry: &'static str,
    files: Vec<ManifestEntry>,
}

fn parse_lengths(s: &str) -> Result<Vec<f64>> {
    if s.contains(':') {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 2 {
            anyhow::bail!("Invalid range format. Use 'start-end:step'");
        }
        let step: f64 = parts[1].parse().context("Invalid step value")?;
        if step <= 0.0 {
            anyhow::bail!("Step must be positive");
        }
        let range_parts: Vec<&str> = parts[0].split('-').collect();
        if range_parts.len() != 2 {
            anyhow::bail!("Invalid range format. Use 'start-end:step'");
        }
        let start: f64 = range_parts[0].parse().context("Invalid start value")?;
        let end: f64 = range_parts[1].parse().context("Invalid end value")?;

        let count = ((end - start) / step + 1e-9).floor() as usize;
        Ok((0..=count).map(|i| start + i as f64 * step).collect())
    } else {
        s.split(',')
            .map(|p| p.trim().parse::<f64>().context("Invalid length value"))
            .collect()
    }
}

fn load_toml_config(path: &PathBuf) -> Result<RecordingConfig> {
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::init();

    fs::create_dir_all(&args.output_dir).context("Failed to create output directory")?;

    let mut base = if let Some(ref config_path) = args.config {
        load_toml_config(config_path)?
    } else {
        RecordingConfig::default()
    };
    if let Some(noise) = args.noise {
        base.noise_std = noise;
    }
    if args.click {
        base.pulse.shape = PulseShape::Click;
    }

    let (path_factor, geometry_label) = match args.geometry {
        GeometryKind::RoundTrip => (2.0, "round_trip"),
        GeometryKind::OneWay => (1.0, "one_way"),
        GeometryKind::Custom => anyhow::bail!("Use round-trip or one-way to place echoes"),
    };

    let lengths = parse_lengths(&args.lengths)?;
    let base_seed = args.seed.unwrap_or(0);

    let mut manifest_entries = Vec::new();
    let total_files = lengths.len() * args.trials as usize;
    let mut file_count = 0;

    for &length_m in &lengths {
        for trial in 0..args.trials {
            let seed = base_seed + trial as u64 * 1000 + (length_m * 100.0) as u64;
            let config = base
                .clone()
                .with_seed(seed)
                .with_echo_over_path(path_factor * length_m, args.speed, args.echo_gain);

            let recording = generate_recording(&config)?;

            let filename = format!(
                "{}_l{:05.2}_t{:02}.wav",
                args.prefix, length_m, trial
            );
            let filepath = args.output_dir.join(&filename);

            save_wav(&filepath, recording.buffer.samples(), config.sample_rate)
                .context("Failed to write WAV file")?;

            let rate = config.sample_rate as f64;
            manifest_entries.push(ManifestEntry {
                file: filename,
                length_m,
                trial,
                seed,
                emission_time_s: recording.emission_time_s(),
                echo_times_s: recording
                    .echo_indices
                    .iter()
                    .map(|&i| i as f64 / rate)
                    .collect(),
            });

            file_count += 1;
            eprint!("\rGenerating: {}/{}", file_count, total_files);
        }
    }
    eprintln!();

    if args.manifest {
        let manifest = Manifest {
            sample_rate: base.sample_rate,
            speed_mps: args.speed,
            geometry: geometry_label,
            files: manifest_entries,
        };
        let manifest_path = args.output_dir.join("manifest.json");
        let manifest_json =
            serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
        fs::write(&manifest_path, manifest_json).context("Failed to write manifest")?;
        eprintln!("Manifest written to: {}", manifest_path.display());
    }

    eprintln!(
        "Generated {} files in {}",
        total_files,
        args.output_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lengths_comma_separated() {
        let lengths = parse_lengths("0.5,1.7,3").unwrap();
        assert_eq!(lengths, vec![0.5, 1.7, 3.0]);
    }

    #[test]
    fn test_parse_lengths_range() {
        let lengths = parse_lengths("1-2:0.5").unwrap();
        assert_eq!(lengths, vec![1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_parse_lengths_invalid() {
        assert!(parse_lengths("1-2:0").is_err());
        assert!(parse_lengths("1:2:3").is_err());
        assert!(parse_lengths("abc").is_err());
    }
}
