use super::mark::{Annotation, EventMark, MarkRole};
use super::timing::{Timing, compute_speed};
use crate::config::GeometryModel;

/// Reference point that the time of flight is measured from
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StartEvent {
    /// An event found in the recording (pulse, stimulus)
    Mark(Option<EventMark>),
    /// An emission time estimate in seconds, not tied to a sample
    Emission(Option<f64>),
}

impl StartEvent {
    pub fn time_s(&self) -> Option<f64> {
        match self {
            StartEvent::Mark(mark) => mark.map(|m| m.time_s),
            StartEvent::Emission(time) => *time,
        }
    }

    pub fn mark(&self) -> Option<EventMark> {
        match self {
            StartEvent::Mark(mark) => *mark,
            StartEvent::Emission(_) => None,
        }
    }
}

/// Time-of-flight result for one recording
///
/// Built from a start event, an end mark and a geometry model. Missing
/// marks and invalid time differences leave `speed_mps` as `None`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Measurement {
    pub sample_rate: u32,
    pub start: StartEvent,
    pub end: Option<EventMark>,
    pub timing: Timing,
    pub geometry: GeometryModel,
    pub speed_mps: Option<f64>,
}

impl Measurement {
    pub fn new(
        sample_rate: u32,
        start: StartEvent,
        end: Option<EventMark>,
        geometry: GeometryModel,
    ) -> Self {
        let geometry = geometry.clamped();
        let timing = Timing::between(start.time_s(), end.map(|m| m.time_s));
        let speed_mps = timing.dt.and_then(|dt| compute_speed(dt, &geometry));
        Self {
            sample_rate,
            start,
            end,
            timing,
            geometry,
            speed_mps,
        }
    }

    /// Recompute the speed for a different geometry, keeping the marks.
    pub fn with_geometry(&self, geometry: GeometryModel) -> Self {
        Self::new(self.sample_rate, self.start, self.end, geometry)
    }

    /// True when the start is an emission estimate rather than a mark.
    pub fn is_trigger(&self) -> bool {
        matches!(self.start, StartEvent::Emission(_))
    }

    /// Marks for a waveform view, in role order.
    ///
    /// An emission estimate is drawn at its nearest sample when it falls
    /// inside a buffer of `buffer_len` samples.
    pub fn annotations(&self, buffer_len: usize) -> Vec<Annotation> {
        let first = match self.start {
            StartEvent::Mark(mark) => mark.map(|m| m.index),
            StartEvent::Emission(time) => time
                .filter(|_| self.sample_rate > 0)
                .map(|t| (t * self.sample_rate as f64).round())
                .filter(|&i| i >= 0.0 && i < buffer_len as f64)
                .map(|i| i as usize),
        };

        first
            .map(|index| Annotation {
                index,
                role: MarkRole::First,
            })
            .into_iter()
            .chain(self.end.map(|m| Annotation {
                index: m.index,
                role: MarkRole::Second,
            }))
            .collect()
    }
}
