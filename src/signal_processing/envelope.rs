/// Causal moving average of absolute sample values
///
/// Output `i` is the mean of `|x|` over `[max(0, i - window + 1), i]`. The
/// first `window - 1` outputs divide by the number of samples seen so far
/// rather than by `window`, so the envelope does not start biased toward
/// silence.
///
/// Runs in a single pass with a sliding sum: the value leaving the window is
/// subtracted instead of re-summing the window at every index.
///
/// # Arguments
/// * `samples` - Raw audio samples
/// * `window_samples` - Window length in samples (values below 1 are treated as 1)
///
/// # Returns
/// Envelope with one non-negative value per input sample
pub fn compute_envelope(samples: &[f32], window_samples: usize) -> Vec<f32> {
    let window = window_samples.max(1);
    let mut envelope = Vec::with_capacity(samples.len());
    let mut sum = 0.0f64;

    for (i, &sample) in samples.iter().enumerate() {
        sum += sample.abs() as f64;
        if i >= window {
            sum -= samples[i - window].abs() as f64;
        }
        let count = (i + 1).min(window);
        // Rounding in the running sum can leave a tiny negative residue after silence.
        envelope.push((sum / count as f64).max(0.0) as f32);
    }

    envelope
}
