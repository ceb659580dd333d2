use crate::error::{EchoError, Result};

/// A finished mono recording
///
/// Samples are nominally in `[-1, 1]`. The buffer is immutable once built;
/// every analysis stage borrows it read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Extract one channel from interleaved samples `[c0, c1, .., c0, c1, ..]`
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(
        data: &[f32],
        channels: usize,
        channel: usize,
        sample_rate: u32,
    ) -> Result<Self> {
        if channel >= channels {
            return Err(EchoError::ChannelOutOfRange {
                requested: channel,
                available: channels,
            });
        }
        let samples = data
            .chunks_exact(channels)
            .map(|frame| frame[channel])
            .collect();
        Ok(Self::new(samples, sample_rate))
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Empty buffers and a zero sample rate cannot be analyzed.
    pub fn is_degenerate(&self) -> bool {
        self.samples.is_empty() || self.sample_rate == 0
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Absolute amplitude at `index`, if it is inside the buffer.
    pub fn amplitude_at(&self, index: usize) -> Option<f32> {
        self.samples.get(index).map(|s| s.abs())
    }

    /// Nearest sample index for a time in seconds, clamped to the buffer.
    ///
    /// Returns `None` for degenerate buffers and non-finite times.
    pub fn index_at_time(&self, time_s: f64) -> Option<usize> {
        if self.is_degenerate() || !time_s.is_finite() {
            return None;
        }
        let index = (time_s * self.sample_rate as f64).round().max(0.0) as usize;
        Some(index.min(self.samples.len() - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_interleaved_selects_channel() {
        let data = [0.1, -0.1, 0.2, -0.2, 0.3, -0.3, 0.4];

        let left = SampleBuffer::from_interleaved(&data, 2, 0, 48000).unwrap();
        assert_eq!(left.samples(), &[0.1, 0.2, 0.3]);

        let right = SampleBuffer::from_interleaved(&data, 2, 1, 48000).unwrap();
        assert_eq!(right.samples(), &[-0.1, -0.2, -0.3]);
    }

    #[test]
    fn test_from_interleaved_rejects_bad_channel() {
        let result = SampleBuffer::from_interleaved(&[0.0; 4], 2, 2, 48000);
        assert!(matches!(
            result,
            Err(EchoError::ChannelOutOfRange {
                requested: 2,
                available: 2
            })
        ));
    }

    #[test]
    fn test_degenerate_buffers() {
        assert!(SampleBuffer::new(Vec::new(), 48000).is_degenerate());
        assert!(SampleBuffer::new(vec![0.5; 10], 0).is_degenerate());
        assert!(!SampleBuffer::new(vec![0.5; 10], 48000).is_degenerate());
        assert_eq!(SampleBuffer::new(vec![0.5; 10], 0).duration_secs(), 0.0);
    }

    #[test]
    fn test_index_at_time() {
        let buffer = SampleBuffer::new(vec![0.0; 4800], 48000);
        assert_eq!(buffer.index_at_time(0.01), Some(480));
        assert_eq!(buffer.index_at_time(-1.0), Some(0));
        assert_eq!(buffer.index_at_time(10.0), Some(4799));
        assert_eq!(buffer.index_at_time(f64::NAN), None);
        assert_eq!(SampleBuffer::new(Vec::new(), 48000).index_at_time(0.0), None);
    }

    #[test]
    fn test_amplitude_at() {
        let buffer = SampleBuffer::new(vec![0.0, -0.75], 8000);
        assert_eq!(buffer.amplitude_at(1), Some(0.75));
        assert_eq!(buffer.amplitude_at(2), None);
    }
}
