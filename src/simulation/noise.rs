use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

pub fn signal_power(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }
    signal.iter().map(|&x| x * x).sum::<f32>() / signal.len() as f32
}

/// Add zero-mean Gaussian room noise with the given standard deviation.
pub fn add_background_noise(signal: &mut [f32], noise_std: f32, rng: &mut ChaCha8Rng) {
    if !(noise_std > 0.0 && noise_std.is_finite()) {
        return;
    }
    let Ok(normal) = Normal::new(0.0, noise_std as f64) else {
        return;
    };
    for sample in signal.iter_mut() {
        *sample += normal.sample(rng) as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_noise_level() {
        let mut rng = create_rng(Some(42));
        let mut signal = vec![0.0; 48000];
        add_background_noise(&mut signal, 0.01, &mut rng);

        let power = signal_power(&signal);
        assert!((power.sqrt() - 0.01).abs() < 0.001, "noise RMS {}", power.sqrt());
    }

    #[test]
    fn test_zero_noise_is_noop() {
        let mut rng = create_rng(Some(1));
        let mut signal = vec![0.25; 16];
        add_background_noise(&mut signal, 0.0, &mut rng);
        add_background_noise(&mut signal, f32::NAN, &mut rng);
        assert!(signal.iter().all(|&x| x == 0.25));
    }
}
