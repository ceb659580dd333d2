#![allow(dead_code)]

use echoscope::SampleBuffer;

pub const SAMPLE_RATE: u32 = 48000;

/// Silent buffer with single-sample impulses at the given indices
pub fn impulse_buffer(len: usize, impulses: &[(usize, f32)]) -> SampleBuffer {
    let mut samples = vec![0.0f32; len];
    for &(index, amplitude) in impulses {
        if index < len {
            samples[index] = amplitude;
        }
    }
    SampleBuffer::new(samples, SAMPLE_RATE)
}

/// 100 ms recording at 48 kHz: pulse of 0.9 at sample 480, echo of 0.5 at 960
pub fn pulse_echo_buffer() -> SampleBuffer {
    impulse_buffer(4800, &[(480, 0.9), (960, 0.5)])
}

/// Envelope that is zero before `rise_index` and `level` from there on
pub fn step_envelope(len: usize, rise_index: usize, level: f32) -> Vec<f32> {
    (0..len)
        .map(|i| if i >= rise_index { level } else { 0.0 })
        .collect()
}
