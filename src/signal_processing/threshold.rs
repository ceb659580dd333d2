/// Derive an absolute detection threshold from an envelope.
///
/// Returns `relative * max(envelope)`. When the envelope is identically zero
/// (silent or empty buffer) the raw `relative` fraction is returned instead,
/// so silence never satisfies `env >= threshold`.
pub fn compute_threshold(envelope: &[f32], relative_threshold: f32) -> f32 {
    let max = envelope.iter().fold(0.0f32, |acc, &v| acc.max(v));
    if max > 0.0 {
        relative_threshold * max
    } else {
        relative_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_scales_with_maximum() {
        let envelope = [0.0, 0.1, 0.5, 0.2];
        assert!((compute_threshold(&envelope, 0.1) - 0.05).abs() < 1e-7);
        assert!((compute_threshold(&envelope, 1.0) - 0.5).abs() < 1e-7);
    }

    #[test]
    fn test_threshold_falls_back_on_silence() {
        assert_eq!(compute_threshold(&[0.0; 32], 0.08), 0.08);
        assert_eq!(compute_threshold(&[], 0.08), 0.08);
    }
}
