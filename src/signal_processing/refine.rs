/// Snap an approximate index to the loudest raw sample nearby
///
/// Searches `|samples[k]|` for `k` in
/// `[approx_index - window_samples, approx_index + window_samples]`, clipped
/// to the buffer, and returns the index of the first maximum. If the window
/// is empty or holds only zeros, `approx_index` is returned unchanged.
///
/// Automatic peak detection and manual marking both go through this
/// function so the two paths snap identically.
///
/// # Arguments
/// * `samples` - Raw (unsmoothed) audio samples
/// * `approx_index` - Starting estimate, e.g. an envelope peak or a clicked position
/// * `window_samples` - Half-width of the search window
pub fn refine_peak(samples: &[f32], approx_index: usize, window_samples: usize) -> usize {
    let start = approx_index.saturating_sub(window_samples);
    let end = approx_index
        .saturating_add(window_samples)
        .saturating_add(1)
        .min(samples.len());

    let mut best_index = approx_index;
    let mut best_value = 0.0f32;
    for k in start..end {
        let value = samples[k].abs();
        if value > best_value {
            best_value = value;
            best_index = k;
        }
    }

    best_index
}
