pub mod generate;

pub use generate::{impulse_buffer, pulse_echo_buffer, step_envelope};
