pub mod buffer;
pub mod source;

pub use buffer::SampleBuffer;
pub use source::{load_wav, read_wav};
