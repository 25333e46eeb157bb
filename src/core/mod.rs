//! Core audio types and constants

/// Waveform types and pipeline defaults
pub mod audio;

pub use audio::{
    DEFAULT_LOWPASS_ORDER, DEFAULT_PREEMPHASIS, DEFAULT_SAMPLE_RATE, Emphasized, Waveform,
};
