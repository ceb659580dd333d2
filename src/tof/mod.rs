pub mod mark;
pub mod measurement;
pub mod timing;

pub use mark::{Annotation, EventMark, MarkRole};
pub use measurement::{Measurement, StartEvent};
pub use timing::{Timing, compute_speed, compute_timing, index_to_time};
