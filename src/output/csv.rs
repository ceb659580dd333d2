use super::{EventFields, ExportRecord, Formatter, RecordKind};

pub struct CsvFormatter;

fn field<T: Into<f64>>(value: Option<T>) -> String {
    value
        .map(Into::into)
        .filter(|v: &f64| v.is_finite())
        .map_or(String::new(), |v| format!("{:.6}", v))
}

impl Formatter for CsvFormatter {
    fn format(&self, record: &ExportRecord) -> String {
        let events = match record.events {
            EventFields::TwoEvent { t1_s, a1, t2_s, a2 } => {
                format!("{},{},{},{}", field(t1_s), field(a1), field(t2_s), field(a2))
            }
            EventFields::Trigger { t_emit_s, t_mic_s } => {
                format!("{},{}", field(t_emit_s), field(t_mic_s))
            }
        };
        format!(
            "{},{},{},{},{},{},{}",
            record.sample_rate_hz,
            events,
            field(record.delta_t_s),
            record.mode,
            field(record.length_m),
            field(record.extra_path_m),
            field(record.speed_mps)
        )
    }

    fn header(&self, kind: RecordKind) -> Option<&'static str> {
        Some(match kind {
            RecordKind::TwoEvent => {
                "sample_rate_Hz,t1_s,A1,t2_s,A2,delta_t_s,mode,L_m,extra_path_m,speed_mps"
            }
            RecordKind::Trigger => {
                "sample_rate_Hz,t_emit_s,t_mic_s,delta_t_s,mode,L_m,extra_path_m,speed_mps"
            }
        })
    }
}
