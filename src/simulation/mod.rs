mod filter;
mod noise;
mod pulse;
mod signal;

pub use filter::BandLimiter;
pub use noise::{add_background_noise, create_rng, signal_power};
pub use pulse::{PulseConfig, PulseShape, generate_pulse};
pub use signal::{
    EchoComponent, RecordingConfig, SPEED_OF_SOUND_MPS, SimulatedRecording, generate_recording,
};
