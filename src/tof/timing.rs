use crate::config::GeometryModel;

/// Event times and their difference
///
/// Any missing input leaves the dependent fields as `None`. A negative `dt`
/// (marks out of temporal order) is kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct Timing {
    pub t_a: Option<f64>,
    pub t_b: Option<f64>,
    pub dt: Option<f64>,
}

impl Timing {
    /// Timing between two event times in seconds.
    pub fn between(t_a: Option<f64>, t_b: Option<f64>) -> Self {
        let t_a = t_a.filter(|t| t.is_finite());
        let t_b = t_b.filter(|t| t.is_finite());
        let dt = match (t_a, t_b) {
            (Some(a), Some(b)) => Some(b - a),
            _ => None,
        };
        Self { t_a, t_b, dt }
    }
}

/// Convert a sample index to seconds. `None` for a zero sample rate.
pub fn index_to_time(index: usize, sample_rate: u32) -> Option<f64> {
    if sample_rate == 0 {
        return None;
    }
    Some(index as f64 / sample_rate as f64)
}

/// Times of two marks and `dt = t_b - t_a`
///
/// # Arguments
/// * `mark_a` - Earlier event index, if detected
/// * `mark_b` - Later event index, if detected
/// * `sample_rate` - Sample rate in Hz
pub fn compute_timing(mark_a: Option<usize>, mark_b: Option<usize>, sample_rate: u32) -> Timing {
    Timing::between(
        mark_a.and_then(|i| index_to_time(i, sample_rate)),
        mark_b.and_then(|i| index_to_time(i, sample_rate)),
    )
}

/// Propagation speed in m/s for a time difference
///
/// Returns `None` unless `dt` is finite and strictly positive. A negative
/// `dt` is never negated.
pub fn compute_speed(dt: f64, geometry: &GeometryModel) -> Option<f64> {
    if !dt.is_finite() || dt <= 0.0 {
        return None;
    }
    let speed = geometry.path_length_m() / dt;
    speed.is_finite().then_some(speed)
}
