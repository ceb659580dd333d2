mod csv;
mod json;
mod text;

use serde::Serialize;

use crate::tof::{Measurement, StartEvent};

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Which column layout a record uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Two detected events: `t1_s, A1, t2_s, A2`
    TwoEvent,
    /// Emission estimate plus one detected event: `t_emit_s, t_mic_s`
    Trigger,
}

/// Event columns of an exported record
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventFields {
    TwoEvent {
        t1_s: Option<f64>,
        #[serde(rename = "A1")]
        a1: Option<f32>,
        t2_s: Option<f64>,
        #[serde(rename = "A2")]
        a2: Option<f32>,
    },
    Trigger {
        t_emit_s: Option<f64>,
        t_mic_s: Option<f64>,
    },
}

/// Flat, export-ready view of a [`Measurement`]
///
/// Undefined values stay `None` and are written as empty CSV fields or
/// JSON `null`, never as `NaN` or zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExportRecord {
    #[serde(rename = "sample_rate_Hz")]
    pub sample_rate_hz: u32,
    #[serde(flatten)]
    pub events: EventFields,
    pub delta_t_s: Option<f64>,
    pub mode: &'static str,
    #[serde(rename = "L_m")]
    pub length_m: Option<f64>,
    pub extra_path_m: Option<f64>,
    pub speed_mps: Option<f64>,
}

impl ExportRecord {
    pub fn from_measurement(measurement: &Measurement) -> Self {
        let end = measurement.end;
        let events = match measurement.start {
            StartEvent::Mark(start) => EventFields::TwoEvent {
                t1_s: start.map(|m| m.time_s),
                a1: start.map(|m| m.amplitude),
                t2_s: end.map(|m| m.time_s),
                a2: end.map(|m| m.amplitude),
            },
            StartEvent::Emission(time) => EventFields::Trigger {
                t_emit_s: time,
                t_mic_s: end.map(|m| m.time_s),
            },
        };

        Self {
            sample_rate_hz: measurement.sample_rate,
            events,
            delta_t_s: measurement.timing.dt,
            mode: measurement.geometry.label(),
            length_m: measurement.geometry.length_m(),
            extra_path_m: measurement.geometry.custom_path_m(),
            speed_mps: measurement.speed_mps,
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self.events {
            EventFields::TwoEvent { .. } => RecordKind::TwoEvent,
            EventFields::Trigger { .. } => RecordKind::Trigger,
        }
    }
}

pub trait Formatter: Send {
    fn format(&self, record: &ExportRecord) -> String;

    fn header(&self, _kind: RecordKind) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}
