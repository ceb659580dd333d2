use log::{debug, info, warn};

use crate::audio::SampleBuffer;
use crate::config::{DetectionParams, DetectorMode, EchoConfig};
use crate::signal_processing::{
    compute_envelope, compute_threshold, find_first_crossing, find_peaks, refine_peak,
};
use crate::tof::{EventMark, Measurement, StartEvent};

/// Intermediate products of one detection pass
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Smoothed magnitude trace, one value per sample (empty for degenerate input)
    pub envelope: Vec<f32>,
    /// Absolute threshold applied to the envelope
    pub threshold: f32,
    /// Envelope indices reported by the detector, before refinement
    pub candidates: Vec<usize>,
    /// Final event indices in temporal order
    pub events: Vec<usize>,
}

impl Detection {
    fn undetected(threshold: f32) -> Self {
        Self {
            envelope: Vec::new(),
            threshold,
            candidates: Vec::new(),
            events: Vec::new(),
        }
    }
}

/// Detection and measurement for one recording
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub detection: Detection,
    pub measurement: Measurement,
}

/// Run envelope detection on a finished recording
///
/// In [`DetectorMode::PeakPair`] the envelope peaks are refined to the
/// loudest raw sample within the refinement window. In
/// [`DetectorMode::FirstCrossing`] the crossing index is reported as-is,
/// since snapping to a later maximum would delay the onset.
pub fn detect(buffer: &SampleBuffer, params: &DetectionParams, mode: DetectorMode) -> Detection {
    let params = params.clamped();
    if buffer.is_degenerate() {
        warn!(
            "Degenerate buffer ({} samples at {} Hz), nothing to detect",
            buffer.len(),
            buffer.sample_rate()
        );
        return Detection::undetected(params.relative_threshold);
    }

    let sample_rate = buffer.sample_rate();
    let envelope_window = params.envelope_window_samples(sample_rate);
    let envelope = compute_envelope(buffer.samples(), envelope_window);
    let threshold = compute_threshold(&envelope, params.relative_threshold);
    debug!(
        "Envelope window {} samples, threshold {:.6} ({} x max)",
        envelope_window, threshold, params.relative_threshold
    );

    let (candidates, events) = match mode {
        DetectorMode::PeakPair => {
            let min_separation = params.min_separation_samples(sample_rate);
            let refine_window = params.refine_window_samples(sample_rate);
            debug!(
                "Peak search: separation {} samples, refine window {} samples",
                min_separation, refine_window
            );
            let candidates = find_peaks(
                &envelope,
                threshold,
                min_separation,
                params.max_candidates,
            );
            let events = candidates
                .iter()
                .map(|&peak| refine_peak(buffer.samples(), peak, refine_window))
                .collect();
            (candidates, events)
        }
        DetectorMode::FirstCrossing => {
            let crossing: Vec<usize> = find_first_crossing(&envelope, threshold).into_iter().collect();
            (crossing.clone(), crossing)
        }
    };

    if events.is_empty() {
        warn!("No event reached threshold {:.6}", threshold);
    }

    Detection {
        envelope,
        threshold,
        candidates,
        events,
    }
}

/// Build the measurement that a detection implies
///
/// Peak-pair mode measures from the first to the second event. First-crossing
/// mode measures from `config.emission_time_s` to the crossing.
pub fn measure(buffer: &SampleBuffer, detection: &Detection, config: &EchoConfig) -> Measurement {
    let mark = |n: usize| {
        detection
            .events
            .get(n)
            .and_then(|&index| EventMark::at(buffer, index))
    };

    let (start, end) = match config.mode {
        DetectorMode::PeakPair => (StartEvent::Mark(mark(0)), mark(1)),
        DetectorMode::FirstCrossing => (StartEvent::Emission(config.emission_time_s), mark(0)),
    };

    let measurement = Measurement::new(buffer.sample_rate(), start, end, config.geometry);
    match (measurement.timing.dt, measurement.speed_mps) {
        (Some(dt), Some(speed)) => info!("dt = {:.6} s, speed = {:.3} m/s", dt, speed),
        (Some(dt), None) => warn!("dt = {:.6} s does not define a speed", dt),
        (None, _) => warn!("Time difference undefined: missing event"),
    }
    measurement
}

/// Full pipeline: envelope, threshold, detection, refinement, timing, speed
///
/// Pure and repeatable; identical inputs give identical results.
pub fn analyze(buffer: &SampleBuffer, config: &EchoConfig) -> Analysis {
    let detection = detect(buffer, &config.detection, config.mode);
    let measurement = measure(buffer, &detection, config);
    Analysis {
        detection,
        measurement,
    }
}
