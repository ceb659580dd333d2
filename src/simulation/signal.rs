use super::noise::{add_background_noise, create_rng};
use super::pulse::{PulseConfig, generate_pulse};
use crate::audio::SampleBuffer;
use crate::error::Result;

/// Nominal speed of sound in dry air at 20 °C, in m/s.
pub const SPEED_OF_SOUND_MPS: f64 = 343.0;

/// A delayed, scaled copy of the emitted pulse
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct EchoComponent {
    /// Delay after emission in milliseconds
    pub delay_ms: f64,
    /// Linear gain relative to the direct pulse (may be negative for inversion)
    pub gain: f32,
}

/// Synthetic recording parameters
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct RecordingConfig {
    pub sample_rate: u32,
    /// Total recording length in milliseconds
    pub duration_ms: f64,
    /// Silence before the pulse is emitted, in milliseconds
    pub pre_delay_ms: f64,
    pub pulse: PulseConfig,
    pub echoes: Vec<EchoComponent>,
    /// Standard deviation of Gaussian background noise
    pub noise_std: f32,
    pub seed: Option<u64>,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            duration_ms: 1200.0,
            pre_delay_ms: 150.0,
            pulse: PulseConfig::default(),
            echoes: Vec::new(),
            noise_std: 0.0,
            seed: None,
        }
    }
}

impl RecordingConfig {
    /// Add an echo that travelled `path_m` meters at `speed_mps`.
    pub fn with_echo_over_path(mut self, path_m: f64, speed_mps: f64, gain: f32) -> Self {
        self.echoes.push(EchoComponent {
            delay_ms: 1000.0 * path_m / speed_mps,
            gain,
        });
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_noise(mut self, noise_std: f32) -> Self {
        self.noise_std = noise_std;
        self
    }
}

/// Generated recording plus the ground truth that produced it
#[derive(Clone, Debug)]
pub struct SimulatedRecording {
    pub buffer: SampleBuffer,
    /// Sample where the direct pulse starts
    pub emission_index: usize,
    /// Sample where each echo starts, in `echoes` order
    pub echo_indices: Vec<usize>,
}

impl SimulatedRecording {
    pub fn emission_time_s(&self) -> f64 {
        self.emission_index as f64 / self.buffer.sample_rate() as f64
    }
}

fn ms_to_index(ms: f64, sample_rate: u32) -> usize {
    (ms * sample_rate as f64 / 1000.0).round().max(0.0) as usize
}

fn mix_in(signal: &mut [f32], pulse: &[f32], offset: usize, gain: f32) {
    if offset >= signal.len() {
        return;
    }
    for (out, &p) in signal[offset..].iter_mut().zip(pulse) {
        *out += gain * p;
    }
}

/// Render a pulse-and-echo recording
///
/// The direct pulse starts at `pre_delay_ms`; each echo is the same pulse
/// shifted by its delay and scaled by its gain. Echoes falling past the end
/// of the recording are truncated.
pub fn generate_recording(config: &RecordingConfig) -> Result<SimulatedRecording> {
    let mut rng = create_rng(config.seed);
    let sample_rate = config.sample_rate;
    let len = ms_to_index(config.duration_ms, sample_rate);
    let mut samples = vec![0.0f32; len];

    let pulse = generate_pulse(&config.pulse, sample_rate, &mut rng)?;
    let emission_index = ms_to_index(config.pre_delay_ms, sample_rate);
    mix_in(&mut samples, &pulse, emission_index, 1.0);

    let echo_indices: Vec<usize> = config
        .echoes
        .iter()
        .map(|echo| {
            let index = emission_index.saturating_add(ms_to_index(echo.delay_ms, sample_rate));
            mix_in(&mut samples, &pulse, index, echo.gain);
            index
        })
        .collect();

    add_background_noise(&mut samples, config.noise_std, &mut rng);

    Ok(SimulatedRecording {
        buffer: SampleBuffer::new(samples, sample_rate),
        emission_index,
        echo_indices,
    })
}
