//! Caller-owned state for one recording.
//!
//! A [`Session`] keeps the recording, the current configuration and the
//! latest analysis so an interactive front end can tweak parameters, switch
//! geometry or re-pick marks without re-deriving anything it does not need
//! to. Geometry and emission changes only recompute timing; detection
//! changes re-run the pipeline; manual picks go through the same refiner as
//! automatic detection.

use log::{debug, info};

use crate::audio::SampleBuffer;
use crate::config::{DetectionParams, DetectorMode, EchoConfig, GeometryModel};
use crate::processing::{Analysis, Detection, analyze};
use crate::signal_processing::refine_peak;
use crate::tof::{Annotation, EventMark, MarkRole, Measurement, StartEvent};

pub struct Session {
    buffer: SampleBuffer,
    config: EchoConfig,
    analysis: Analysis,
}

impl Session {
    /// Start a session and run the automatic pipeline once.
    pub fn new(buffer: SampleBuffer, config: EchoConfig) -> Self {
        let analysis = analyze(&buffer, &config);
        Self {
            buffer,
            config,
            analysis,
        }
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    pub fn config(&self) -> &EchoConfig {
        &self.config
    }

    pub fn detection(&self) -> &Detection {
        &self.analysis.detection
    }

    pub fn measurement(&self) -> &Measurement {
        &self.analysis.measurement
    }

    /// Replace detection parameters and re-run detection.
    ///
    /// Manual picks are discarded.
    pub fn set_detection(&mut self, params: DetectionParams) {
        self.config.detection = params;
        self.rerun();
    }

    /// Switch detector strategy and re-run detection.
    pub fn set_mode(&mut self, mode: DetectorMode) {
        self.config.mode = mode;
        self.rerun();
    }

    /// Change the path model; marks are kept.
    pub fn set_geometry(&mut self, geometry: GeometryModel) {
        self.config.geometry = geometry;
        self.analysis.measurement = self.analysis.measurement.with_geometry(geometry);
    }

    /// Change the emission estimate used in first-crossing mode.
    ///
    /// Has no effect on the start event when it is a picked mark.
    pub fn set_emission_time(&mut self, emission_time_s: Option<f64>) {
        self.config.emission_time_s = emission_time_s;
        let m = self.analysis.measurement;
        if let StartEvent::Emission(_) = m.start {
            self.update_measurement(StartEvent::Emission(emission_time_s), m.end);
        }
    }

    /// Re-run the automatic pipeline from scratch.
    pub fn rerun(&mut self) {
        self.analysis = analyze(&self.buffer, &self.config);
    }

    /// Replace a mark with the loudest raw sample near `approx_index`
    ///
    /// The index is clamped into the buffer and refined with the same window
    /// as automatic detection. Returns the new mark, or `None` for a
    /// degenerate buffer.
    pub fn override_mark(&mut self, role: MarkRole, approx_index: usize) -> Option<EventMark> {
        if self.buffer.is_degenerate() {
            return None;
        }
        let approx = approx_index.min(self.buffer.len() - 1);
        let window = self
            .config
            .detection
            .refine_window_samples(self.buffer.sample_rate());
        let index = refine_peak(self.buffer.samples(), approx, window);
        let mark = EventMark::at(&self.buffer, index)?;
        debug!("Manual {} near {} snapped to {}", role.label(), approx, index);

        let m = self.analysis.measurement;
        match role {
            MarkRole::First => self.update_measurement(StartEvent::Mark(Some(mark)), m.end),
            MarkRole::Second => self.update_measurement(m.start, Some(mark)),
        }
        info!("{} set to {:.6} s", role.label(), mark.time_s);
        Some(mark)
    }

    /// Pick a mark from a horizontal position on a waveform view
    ///
    /// `x` is measured from the left edge of a view `width` units wide that
    /// spans the whole buffer.
    pub fn pick_at(&mut self, role: MarkRole, x: f64, width: f64) -> Option<EventMark> {
        if !width.is_finite() || width <= 0.0 || !x.is_finite() || self.buffer.is_empty() {
            return None;
        }
        let position = (x / width * self.buffer.len() as f64).round().max(0.0);
        self.override_mark(role, position as usize)
    }

    /// Unset a mark. Timing and speed become undefined.
    pub fn clear_mark(&mut self, role: MarkRole) {
        let m = self.analysis.measurement;
        match role {
            MarkRole::First => {
                let start = match m.start {
                    StartEvent::Mark(_) => StartEvent::Mark(None),
                    StartEvent::Emission(_) => StartEvent::Emission(None),
                };
                self.update_measurement(start, m.end);
            }
            MarkRole::Second => self.update_measurement(m.start, None),
        }
    }

    /// Marks to draw over the waveform.
    pub fn annotations(&self) -> Vec<Annotation> {
        self.analysis.measurement.annotations(self.buffer.len())
    }

    fn update_measurement(&mut self, start: StartEvent, end: Option<EventMark>) {
        self.analysis.measurement = Measurement::new(
            self.buffer.sample_rate(),
            start,
            end,
            self.config.geometry,
        );
    }
}
