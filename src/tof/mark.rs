use crate::audio::SampleBuffer;

/// Which event a mark stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkRole {
    /// Earlier event: emitted pulse, stimulus, or emission estimate
    First,
    /// Later event: echo or reaction
    Second,
}

impl MarkRole {
    pub fn label(&self) -> &'static str {
        match self {
            MarkRole::First => "t1",
            MarkRole::Second => "t2",
        }
    }
}

/// A detected or user-picked event in a recording
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct EventMark {
    /// Sample index inside the buffer
    pub index: usize,
    /// `index / sample_rate` in seconds
    pub time_s: f64,
    /// Absolute raw amplitude at `index`
    pub amplitude: f32,
}

impl EventMark {
    /// Build a mark for `index`, or `None` if the index is outside the
    /// buffer or the buffer cannot be analyzed.
    pub fn at(buffer: &SampleBuffer, index: usize) -> Option<Self> {
        if buffer.sample_rate() == 0 {
            return None;
        }
        let amplitude = buffer.amplitude_at(index)?;
        Some(Self {
            index,
            time_s: index as f64 / buffer.sample_rate() as f64,
            amplitude,
        })
    }
}

/// Index and role of a mark, for drawing on a waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Annotation {
    pub index: usize,
    pub role: MarkRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_mark_derives_time_and_amplitude() {
        let mut samples = vec![0.0; 4800];
        samples[480] = -0.9;
        let buffer = SampleBuffer::new(samples, 48000);

        let mark = EventMark::at(&buffer, 480).unwrap();
        assert_eq!(mark.index, 480);
        assert!((mark.time_s - 0.01).abs() < 1e-12);
        assert_eq!(mark.amplitude, 0.9);
    }

    #[test]
    fn test_event_mark_out_of_range() {
        let buffer = SampleBuffer::new(vec![0.0; 10], 48000);
        assert!(EventMark::at(&buffer, 10).is_none());

        let no_rate = SampleBuffer::new(vec![0.0; 10], 0);
        assert!(EventMark::at(&no_rate, 3).is_none());
    }
}
