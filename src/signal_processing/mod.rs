pub mod detector;
pub mod envelope;
pub mod refine;
pub mod threshold;

pub use detector::{find_first_crossing, find_peaks};
pub use envelope::compute_envelope;
pub use refine::refine_peak;
pub use threshold::compute_threshold;
