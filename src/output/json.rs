use super::{ExportRecord, Formatter};

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, record: &ExportRecord) -> String {
        serde_json::to_string(record).unwrap_or_else(|e| {
            log::error!("Failed to serialize record: {}", e);
            String::new()
        })
    }
}
