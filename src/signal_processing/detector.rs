use log::trace;

/// Find local envelope maxima above a threshold
///
/// Scans forward from index 1 to `len - 2` and accepts `i` when
/// `env[i] >= threshold` and `env[i]` is not below either neighbour. Ties
/// are allowed, so the first sample of a plateau wins.
///
/// After each accepted peak the scan jumps ahead by `min_separation_samples`.
/// This is a greedy single pass: an earlier qualifying peak is kept even if
/// a larger one follows inside its exclusion zone.
///
/// # Arguments
/// * `envelope` - Smoothed magnitude trace
/// * `threshold` - Absolute detection threshold
/// * `min_separation_samples` - Exclusion zone after an accepted peak (at least 1)
/// * `max_candidates` - Stop once this many peaks are collected
///
/// # Returns
/// Peak indices in strictly increasing order
pub fn find_peaks(
    envelope: &[f32],
    threshold: f32,
    min_separation_samples: usize,
    max_candidates: usize,
) -> Vec<usize> {
    let step = min_separation_samples.max(1);
    let mut peaks = Vec::new();
    if max_candidates == 0 || envelope.len() < 3 {
        return peaks;
    }

    let mut i = 1;
    while i < envelope.len() - 1 && peaks.len() < max_candidates {
        let value = envelope[i];
        if value >= threshold && value >= envelope[i - 1] && value >= envelope[i + 1] {
            trace!("Accepted envelope peak at {} ({:.6})", i, value);
            peaks.push(i);
            i = i.saturating_add(step);
        } else {
            i += 1;
        }
    }

    peaks
}

/// Find the first index where the envelope reaches a threshold
///
/// Unlike [`find_peaks`] there is no local-maximum or separation constraint:
/// a rising, non-maximal sample is accepted as soon as it reaches the
/// threshold.
///
/// Returns `None` if the threshold is never reached.
pub fn find_first_crossing(envelope: &[f32], threshold: f32) -> Option<usize> {
    envelope.iter().position(|&value| value >= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_detection() {
        let mut envelope = vec![0.0; 100];
        envelope[20] = 0.8;
        envelope[25] = 0.9; // Inside exclusion zone, skipped
        envelope[50] = 0.7;

        let peaks = find_peaks(&envelope, 0.5, 10, 8);

        assert_eq!(peaks, vec![20, 50]);
    }

    #[test]
    fn test_peak_detector_threshold() {
        let envelope = vec![0.3, 0.4, 0.6, 0.7, 0.4, 0.2, 0.3, 0.4, 0.8, 0.3];

        let peaks = find_peaks(&envelope, 0.5, 2, 8);

        assert_eq!(peaks, vec![3, 8]);
    }

    #[test]
    fn test_peak_detector_first_of_plateau_wins() {
        let envelope = vec![0.0, 0.2, 0.5, 0.5, 0.5, 0.1, 0.0];
        assert_eq!(find_peaks(&envelope, 0.3, 4, 8), vec![2]);
    }

    #[test]
    fn test_peak_detector_excludes_endpoints() {
        let envelope = vec![1.0, 0.5, 0.2, 0.5, 1.0];
        assert!(find_peaks(&envelope, 0.1, 1, 8).is_empty());
        assert!(find_peaks(&[1.0, 0.0], 0.1, 1, 8).is_empty());
        assert!(find_peaks(&[], 0.1, 1, 8).is_empty());
    }

    #[test]
    fn test_peak_detector_respects_max_candidates() {
        let mut envelope = vec![0.0; 100];
        for idx in [10, 30, 50, 70, 90] {
            envelope[idx] = 1.0;
        }
        assert_eq!(find_peaks(&envelope, 0.5, 5, 2), vec![10, 30]);
        assert_eq!(find_peaks(&envelope, 0.5, 5, 8).len(), 5);
        assert!(find_peaks(&envelope, 0.5, 5, 0).is_empty());
    }

    #[test]
    fn test_peak_detector_enforces_separation() {
        let envelope: Vec<f32> = (0..2000)
            .map(|i| ((i as f32) * 0.05).sin().abs())
            .collect();
        let min_sep = 97;

        let peaks = find_peaks(&envelope, 0.5, min_sep, 100);

        assert!(peaks.len() > 2);
        for pair in peaks.windows(2) {
            assert!(pair[1] - pair[0] >= min_sep, "peaks {:?} too close", pair);
        }
    }

    #[test]
    fn test_peak_detector_huge_separation_stops_after_first() {
        let mut envelope = vec![0.0; 100];
        envelope[20] = 1.0;
        envelope[60] = 1.0;
        assert_eq!(find_peaks(&envelope, 0.5, usize::MAX, 8), vec![20]);
    }

    #[test]
    fn test_peak_detector_zero_separation_advances() {
        let envelope = vec![0.0, 1.0, 1.0, 1.0, 0.0];
        assert_eq!(find_peaks(&envelope, 0.5, 0, 8), vec![1, 2, 3]);
    }

    #[test]
    fn test_first_crossing_on_step() {
        let envelope: Vec<f32> = (0..2000).map(|i| if i < 1000 { 0.0 } else { 1.0 }).collect();
        assert_eq!(find_first_crossing(&envelope, 0.5), Some(1000));
    }

    #[test]
    fn test_first_crossing_accepts_rising_sample() {
        let envelope = vec![0.0, 0.1, 0.3, 0.6, 0.9, 1.0, 0.4];
        // Index 3 is still rising, so it is not a local maximum.
        assert_eq!(find_first_crossing(&envelope, 0.5), Some(3));
        assert_eq!(find_peaks(&envelope, 0.5, 1, 1), vec![5]);
    }

    #[test]
    fn test_first_crossing_none() {
        assert_eq!(find_first_crossing(&[0.1, 0.2, 0.3], 0.5), None);
        assert_eq!(find_first_crossing(&[], 0.5), None);
    }
}
