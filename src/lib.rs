#![warn(missing_docs)]

//! # speech-enhance: batched speech enhancement inference
//!
//! Runs a trained enhancement model over speech recordings and writes the
//! enhanced audio back out as 32-bit float mono WAV.
//!
//! ## Features
//!
//! - **Decode** - any format Symphonia reads, downmixed and resampled to the pipeline rate
//! - **Emphasis** - first-order pre-emphasis before the model, exact inverse after
//! - **Batch** - variable-length items collated into one zero-padded tensor
//! - **Post-process** - truncation, optional Butterworth lowpass, clipping, on a worker pool
//! - **Modes** - single file, paired validation corpus, whole directory tree
//!
//! ## Quick Start
//!
//! ```ignore
//! use speech_enhance::{Device, InferenceRunner, SeparateConfig};
//! use speech_enhance::pipeline::separate;
//!
//! let runner = InferenceRunner::load("fir_denoiser", "model.json", Device::Cpu)?;
//! let mut config = SeparateConfig::new("noisy.wav", "enhanced.wav");
//! config.lowpass_freq = 8000;
//! separate::run(&runner, &config)?;
//! ```

/// Waveform types and pipeline constants
pub mod core;
/// Error types
pub mod error;
/// Per-mode configuration
pub mod config;
/// Audio file decoding
pub mod decoder;
/// WAV output
pub mod encoder;
/// Signal transforms: emphasis, lowpass, resampling, channel remix
pub mod filter;
/// Padded batch collation
pub mod batch;
/// Models, checkpoints and the inference runner
pub mod model;
/// Post-processing tasks and the worker pool
pub mod processor;
/// Orchestration modes
pub mod pipeline;

pub use batch::{Batch, collate};
pub use config::{PipelineSettings, SeparateConfig, TestDirConfig, ValidateConfig};
pub use core::{Emphasized, Waveform};
pub use error::{EnhanceError, EnhanceResult};
pub use model::{Device, InferenceRunner};
pub use processor::RunReport;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
