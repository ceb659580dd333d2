use super::{EventFields, ExportRecord, Formatter};

pub struct TextFormatter;

fn show(value: Option<f64>, precision: usize, unit: &str) -> String {
    value
        .filter(|v| v.is_finite())
        .map_or("-".to_string(), |v| format!("{:.*}{}", precision, v, unit))
}

impl Formatter for TextFormatter {
    fn format(&self, record: &ExportRecord) -> String {
        let events = match record.events {
            EventFields::TwoEvent { t1_s, a1, t2_s, a2 } => format!(
                "t1: {} (A {})  t2: {} (A {})",
                show(t1_s, 6, " s"),
                show(a1.map(f64::from), 4, ""),
                show(t2_s, 6, " s"),
                show(a2.map(f64::from), 4, "")
            ),
            EventFields::Trigger { t_emit_s, t_mic_s } => format!(
                "emit: {}  mic: {}",
                show(t_emit_s, 6, " s"),
                show(t_mic_s, 6, " s")
            ),
        };
        let path = match (record.length_m, record.extra_path_m) {
            (Some(l), _) => format!("L = {:.3} m", l),
            (None, Some(p)) => format!("path = {:.3} m", p),
            (None, None) => "-".to_string(),
        };
        format!(
            "{} Hz  {}  dt: {}  [{}, {}]  speed: {}",
            record.sample_rate_hz,
            events,
            show(record.delta_t_s, 6, " s"),
            record.mode,
            path,
            show(record.speed_mps, 3, " m/s")
        )
    }
}
