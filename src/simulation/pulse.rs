use rand::RngExt;
use rand_chacha::ChaCha8Rng;

use super::filter::BandLimiter;
use crate::error::Result;

/// Waveform of the emitted calibration pulse
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PulseShape {
    /// Band-limited white noise burst (what a speaker calibration emits)
    #[default]
    NoiseBurst,
    /// Single full-scale sample, useful for exact timing checks
    Click,
}

/// Calibration pulse parameters
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct PulseConfig {
    pub shape: PulseShape,
    /// Total burst length in milliseconds
    pub duration_ms: f32,
    /// Peak gain (0-1)
    pub amplitude: f32,
    /// Linear attack time in milliseconds
    pub attack_ms: f32,
    /// Gain reached at the end of the exponential decay
    pub decay_floor: f32,
    /// Bandpass lower edge in Hz
    pub band_low_hz: f32,
    /// Bandpass upper edge in Hz
    pub band_high_hz: f32,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            shape: PulseShape::NoiseBurst,
            duration_ms: 8.0,
            amplitude: 0.8,
            attack_ms: 2.0,
            decay_floor: 0.001,
            band_low_hz: 800.0,
            band_high_hz: 6000.0,
        }
    }
}

/// Gain envelope: linear ramp to `amplitude`, then exponential decay to
/// `amplitude * decay_floor` at the end of the burst.
fn pulse_gain(t_ms: f32, config: &PulseConfig) -> f32 {
    let attack = config.attack_ms.max(0.0);
    if t_ms < attack {
        return config.amplitude * t_ms / attack;
    }
    let decay_span = (config.duration_ms - attack).max(f32::EPSILON);
    let progress = ((t_ms - attack) / decay_span).clamp(0.0, 1.0);
    config.amplitude * config.decay_floor.max(f32::MIN_POSITIVE).powf(progress)
}

/// Render one calibration pulse
///
/// A click is a single sample of `amplitude`. A noise burst is uniform white
/// noise, bandpass filtered, then shaped by the attack/decay gain envelope.
pub fn generate_pulse(
    config: &PulseConfig,
    sample_rate: u32,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<f32>> {
    if config.shape == PulseShape::Click {
        return Ok(vec![config.amplitude]);
    }

    let len = ((sample_rate as f32 * config.duration_ms / 1000.0).floor() as usize).max(1);
    let mut burst: Vec<f32> = (0..len)
        .map(|_| rng.random::<f32>() * 2.0 - 1.0)
        .collect();

    let mut band = BandLimiter::new(
        config.band_low_hz,
        config.band_high_hz,
        sample_rate as f32,
        2,
    )?;
    band.process_buffer(&mut burst);

    for (i, sample) in burst.iter_mut().enumerate() {
        let t_ms = i as f32 * 1000.0 / sample_rate as f32;
        *sample *= pulse_gain(t_ms, config);
    }

    Ok(burst)
}
