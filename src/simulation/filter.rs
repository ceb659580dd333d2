use crate::error::{EchoError, Result};
use iir_filters::filter::{DirectForm2Transposed, Filter};
use iir_filters::filter_design::{FilterType, butter};
use iir_filters::sos::zpk2sos;

/// Butterworth bandpass used to shape synthetic calibration pulses
pub struct BandLimiter {
    filter: DirectForm2Transposed,
}

impl BandLimiter {
    pub fn new(low_hz: f32, high_hz: f32, sample_rate: f32, order: usize) -> Result<Self> {
        if !(low_hz > 0.0 && low_hz < high_hz && high_hz < sample_rate / 2.0) {
            return Err(EchoError::FilterDesign(format!(
                "band {}-{} Hz invalid at {} Hz",
                low_hz, high_hz, sample_rate
            )));
        }

        let zpk = butter(
            order as u32,
            FilterType::BandPass(low_hz as f64, high_hz as f64),
            sample_rate as f64,
        )
        .map_err(|e| EchoError::FilterDesign(format!("{:?}", e)))?;

        let sos = zpk2sos(&zpk, None).map_err(|e| EchoError::FilterDesign(format!("{:?}", e)))?;

        Ok(Self {
            filter: DirectForm2Transposed::new(&sos),
        })
    }

    pub fn process(&mut self, sample: f32) -> f32 {
        self.filter.filter(sample as f64) as f32
    }

    pub fn process_buffer(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}
