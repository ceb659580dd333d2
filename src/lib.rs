pub mod audio;
pub mod config;
pub mod constants;
pub mod error;
pub mod output;
pub mod processing;
pub mod session;
pub mod signal_processing;
pub mod tof;
pub mod wav;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use audio::{SampleBuffer, load_wav};
pub use config::{DetectionParams, DetectorMode, EchoConfig, GeometryModel};
pub use error::{EchoError, Result};
pub use processing::{Analysis, Detection, analyze, detect, measure};
pub use session::Session;
pub use wav::save_wav;
