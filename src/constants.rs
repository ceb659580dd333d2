//! Numeric constants for the detection pipeline
//!
//! Minimums used when clamping user parameters and fixed window lengths
//! shared by the automatic and manual marking paths.

/// Smallest accepted value for any millisecond-valued window.
pub const MIN_WINDOW_MS: f32 = 1e-3;

/// Smallest accepted relative threshold. Keeps silence from satisfying `env >= 0`.
pub const MIN_RELATIVE_THRESHOLD: f32 = 1e-6;

/// Half-width of the raw-amplitude refinement window in milliseconds.
pub const REFINE_WINDOW_MS: f32 = 1.0;

/// Default envelope smoothing window in milliseconds.
pub const DEFAULT_ENVELOPE_WINDOW_MS: f32 = 1.5;

/// Default detection threshold as a fraction of the envelope maximum.
pub const DEFAULT_RELATIVE_THRESHOLD: f32 = 0.08;

/// Default minimum spacing between accepted peaks in milliseconds.
pub const DEFAULT_MIN_SEPARATION_MS: f32 = 40.0;

/// Default number of peaks kept by the candidate detector.
pub const DEFAULT_MAX_CANDIDATES: usize = 2;

/// Default one-way length for round-trip measurements, in meters.
pub const DEFAULT_LENGTH_M: f64 = 1.7;
