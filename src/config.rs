//! Configuration for the EchoScope time-of-flight pipeline.
//!
//! Every numeric parameter is clamped before use rather than rejected, so a
//! caller can always retry with adjusted values:
//!
//! ```
//! use echoscope::config::DetectionParams;
//!
//! let params = DetectionParams {
//!     envelope_window_ms: -3.0,
//!     ..DetectionParams::default()
//! }
//! .clamped();
//! assert_eq!(params.envelope_window_samples(48000), 1);
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ENVELOPE_WINDOW_MS, DEFAULT_LENGTH_M, DEFAULT_MAX_CANDIDATES,
    DEFAULT_MIN_SEPARATION_MS, DEFAULT_RELATIVE_THRESHOLD, MIN_RELATIVE_THRESHOLD, MIN_WINDOW_MS,
    REFINE_WINDOW_MS,
};
use crate::error::{EchoError, Result};

/// Convert a duration in milliseconds to a whole number of samples.
///
/// Rounds to the nearest sample and never returns less than one.
pub fn ms_to_samples(ms: f32, sample_rate: u32) -> usize {
    let samples = (sample_rate as f64 * ms as f64 / 1000.0).round();
    if samples.is_finite() && samples >= 1.0 {
        samples as usize
    } else {
        1
    }
}

/// Time specification
///
/// Used for emission-time estimates and manual mark positions on the
/// command line.
///
/// # Parsing formats
/// - `0.15` or `0.15s` - seconds
/// - `150ms` - milliseconds
/// - `150000us` or `150000μs` - microseconds
///
/// # Example
/// ```
/// use echoscope::config::TimeSpec;
///
/// let t: TimeSpec = "150ms".parse().unwrap();
/// assert!((t.as_secs() - 0.15).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSpec(f64);

impl TimeSpec {
    pub fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}s", self.0)
    }
}

impl FromStr for TimeSpec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();

        let (num, scale) = if let Some(num) = s.strip_suffix("ms") {
            (num, 1e-3)
        } else if let Some(num) = s.strip_suffix("us").or_else(|| s.strip_suffix("μs")) {
            (num, 1e-6)
        } else if let Some(num) = s.strip_suffix('s') {
            (num, 1.0)
        } else {
            (s, 1.0)
        };

        let value: f64 = num
            .trim()
            .parse()
            .map_err(|_| format!("invalid time: {}", s))?;
        if !value.is_finite() || value < 0.0 {
            return Err("time must be a non-negative number".to_string());
        }
        Ok(Self(value * scale))
    }
}

/// Event detection strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DetectorMode {
    /// Two comparable envelope peaks (pulse and echo)
    #[default]
    PeakPair,
    /// First threshold crossing after an emission-time estimate (reaction/trigger)
    FirstCrossing,
}

/// Envelope detection parameters
///
/// All millisecond values are converted to samples at the buffer's sample
/// rate. Call [`DetectionParams::clamped`] before use; the `*_samples`
/// helpers clamp as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionParams {
    /// Causal smoothing window for the envelope in milliseconds
    pub envelope_window_ms: f32,
    /// Detection threshold as a fraction of the envelope maximum (0-1)
    pub relative_threshold: f32,
    /// Minimum spacing between accepted peaks in milliseconds
    pub min_separation_ms: f32,
    /// Half-width of the raw-amplitude refinement search in milliseconds
    pub refine_window_ms: f32,
    /// Maximum number of peaks returned by the candidate detector
    pub max_candidates: usize,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            envelope_window_ms: DEFAULT_ENVELOPE_WINDOW_MS,
            relative_threshold: DEFAULT_RELATIVE_THRESHOLD,
            min_separation_ms: DEFAULT_MIN_SEPARATION_MS,
            refine_window_ms: REFINE_WINDOW_MS,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

impl DetectionParams {
    /// Clamp every parameter into its valid range.
    ///
    /// NaN and non-positive windows collapse to the smallest window, the
    /// threshold is held in `[MIN_RELATIVE_THRESHOLD, 1]`, and at least one
    /// candidate is always allowed.
    pub fn clamped(&self) -> Self {
        Self {
            envelope_window_ms: self.envelope_window_ms.max(MIN_WINDOW_MS),
            relative_threshold: self.relative_threshold.max(MIN_RELATIVE_THRESHOLD).min(1.0),
            min_separation_ms: self.min_separation_ms.max(MIN_WINDOW_MS),
            refine_window_ms: self.refine_window_ms.max(MIN_WINDOW_MS),
            max_candidates: self.max_candidates.max(1),
        }
    }

    pub fn envelope_window_samples(&self, sample_rate: u32) -> usize {
        ms_to_samples(self.envelope_window_ms.max(MIN_WINDOW_MS), sample_rate)
    }

    pub fn min_separation_samples(&self, sample_rate: u32) -> usize {
        ms_to_samples(self.min_separation_ms.max(MIN_WINDOW_MS), sample_rate)
    }

    pub fn refine_window_samples(&self, sample_rate: u32) -> usize {
        ms_to_samples(self.refine_window_ms.max(MIN_WINDOW_MS), sample_rate)
    }
}

/// Geometry mode selector used on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GeometryKind {
    /// Echo returns over the same length (path = 2L)
    RoundTrip,
    /// Sound travels the length once (path = L)
    OneWay,
    /// Explicit path length
    Custom,
}

/// Propagation path model
///
/// Converts a time difference into a speed: `speed = path / dt`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GeometryModel {
    RoundTrip { length_m: f64 },
    OneWay { length_m: f64 },
    Custom { path_m: f64 },
}

impl Default for GeometryModel {
    fn default() -> Self {
        Self::RoundTrip {
            length_m: DEFAULT_LENGTH_M,
        }
    }
}

fn clamp_length(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

impl GeometryModel {
    /// Build a model from a CLI-style kind plus lengths.
    ///
    /// `length_m` feeds round-trip and one-way modes, `path_m` the custom mode.
    pub fn from_parts(kind: GeometryKind, length_m: f64, path_m: f64) -> Self {
        match kind {
            GeometryKind::RoundTrip => Self::RoundTrip { length_m },
            GeometryKind::OneWay => Self::OneWay { length_m },
            GeometryKind::Custom => Self::Custom { path_m },
        }
        .clamped()
    }

    /// Lengths clamped to finite, non-negative values.
    pub fn clamped(&self) -> Self {
        match *self {
            Self::RoundTrip { length_m } => Self::RoundTrip {
                length_m: clamp_length(length_m),
            },
            Self::OneWay { length_m } => Self::OneWay {
                length_m: clamp_length(length_m),
            },
            Self::Custom { path_m } => Self::Custom {
                path_m: clamp_length(path_m),
            },
        }
    }

    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::RoundTrip { .. } => GeometryKind::RoundTrip,
            Self::OneWay { .. } => GeometryKind::OneWay,
            Self::Custom { .. } => GeometryKind::Custom,
        }
    }

    /// Total acoustic path in meters.
    pub fn path_length_m(&self) -> f64 {
        match self.clamped() {
            Self::RoundTrip { length_m } => 2.0 * length_m,
            Self::OneWay { length_m } => length_m,
            Self::Custom { path_m } => path_m,
        }
    }

    /// The physical length `L`, if this mode has one.
    pub fn length_m(&self) -> Option<f64> {
        match self.clamped() {
            Self::RoundTrip { length_m } | Self::OneWay { length_m } => Some(length_m),
            Self::Custom { .. } => None,
        }
    }

    /// The explicit path, if this is a custom geometry.
    pub fn custom_path_m(&self) -> Option<f64> {
        match self.clamped() {
            Self::Custom { path_m } => Some(path_m),
            _ => None,
        }
    }

    /// Short label used in exported records.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RoundTrip { .. } => "round_trip",
            Self::OneWay { .. } => "one_way",
            Self::Custom { .. } => "custom",
        }
    }
}

/// System-wide EchoScope configuration
///
/// Use `EchoConfig::default()` for the values the measurement tool ships
/// with, or load a TOML file:
///
/// ```
/// use echoscope::config::{DetectorMode, EchoConfig};
///
/// let config = EchoConfig::from_toml_str(r#"
///     mode = "first-crossing"
///     emission_time_s = 0.15
///
///     [detection]
///     relative_threshold = 0.2
///
///     [geometry]
///     mode = "one_way"
///     length_m = 3.4
/// "#).unwrap();
/// assert_eq!(config.mode, DetectorMode::FirstCrossing);
/// assert_eq!(config.detection.envelope_window_ms, 1.5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EchoConfig {
    /// Detection strategy
    pub mode: DetectorMode,
    /// Envelope and peak detection parameters
    pub detection: DetectionParams,
    /// Propagation path model
    pub geometry: GeometryModel,
    /// Estimated emission time in seconds (first-crossing mode)
    pub emission_time_s: Option<f64>,
    /// Channel extracted from multi-channel WAV files
    pub channel: usize,
}

impl EchoConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| EchoError::Config(e.to_string()))
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }
}
