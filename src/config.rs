//! Per-mode configuration
//!
//! Each orchestration mode takes one of these structs. They are plain data
//! filled in by the CLI; `validate` catches nonsense before any model is loaded.

use crate::core::{DEFAULT_LOWPASS_ORDER, DEFAULT_PREEMPHASIS, DEFAULT_SAMPLE_RATE};
use crate::error::{EnhanceError, EnhanceResult};
use crate::filter::{Lowpass, PreEmphasis};
use crate::model::Device;
use std::path::PathBuf;

/// Settings shared by every mode
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    /// Pre-emphasis coefficient, strictly in (0, 1)
    pub preemphasis: f32,
    /// Butterworth order of the optional lowpass
    pub lowpass_order: usize,
    /// Device the model runs on
    pub device: Device,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        PipelineSettings {
            preemphasis: DEFAULT_PREEMPHASIS,
            lowpass_order: DEFAULT_LOWPASS_ORDER,
            device: Device::Cpu,
        }
    }
}

impl PipelineSettings {
    /// Emphasis transform pair for these settings
    pub fn emphasis(&self) -> EnhanceResult<PreEmphasis> {
        PreEmphasis::new(self.preemphasis)
    }

    fn validate(&self) -> EnhanceResult<()> {
        self.emphasis()?;
        if self.lowpass_order == 0 {
            return Err(EnhanceError::ConfigError(
                "lowpass order must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn require_nonzero(value: usize, name: &str) -> EnhanceResult<()> {
    if value == 0 {
        return Err(EnhanceError::ConfigError(format!("{} must be at least 1", name)));
    }
    Ok(())
}

fn require_rate(rate: u32) -> EnhanceResult<()> {
    if rate == 0 {
        return Err(EnhanceError::InvalidSampleRate { rate });
    }
    Ok(())
}

/// Single-file separation
#[derive(Debug, Clone)]
pub struct SeparateConfig {
    /// Input audio file
    pub audio_file: PathBuf,
    /// Output WAV path
    pub out_path: PathBuf,
    /// Lowpass cutoff in Hz, 0 disables the filter
    pub lowpass_freq: u32,
    /// Pipeline sample rate
    pub sample_rate: u32,
    /// Shared settings
    pub settings: PipelineSettings,
}

impl SeparateConfig {
    /// Config with default sample rate, no lowpass and default settings
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(audio_file: P, out_path: Q) -> Self {
        SeparateConfig {
            audio_file: audio_file.into(),
            out_path: out_path.into(),
            lowpass_freq: 0,
            sample_rate: DEFAULT_SAMPLE_RATE,
            settings: PipelineSettings::default(),
        }
    }

    /// Check values and build the optional lowpass
    pub fn validate(&self) -> EnhanceResult<Option<Lowpass>> {
        self.settings.validate()?;
        require_rate(self.sample_rate)?;
        Lowpass::from_cutoff(
            Some(self.lowpass_freq),
            self.sample_rate,
            self.settings.lowpass_order,
        )
    }
}

/// Validation over a paired noisy/clean corpus
#[derive(Debug, Clone)]
pub struct ValidateConfig {
    /// Corpus root holding `noisy/` and `clean/`
    pub meta_dir: PathBuf,
    /// Output directory
    pub out_dir: PathBuf,
    /// Items per inference batch
    pub batch_size: usize,
    /// Post-processing threads
    pub num_workers: usize,
    /// Pipeline sample rate
    pub sample_rate: u32,
    /// Shared settings
    pub settings: PipelineSettings,
}

impl ValidateConfig {
    /// Config with the default batch size (64) and worker count (16)
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(meta_dir: P, out_dir: Q) -> Self {
        ValidateConfig {
            meta_dir: meta_dir.into(),
            out_dir: out_dir.into(),
            batch_size: 64,
            num_workers: 16,
            sample_rate: DEFAULT_SAMPLE_RATE,
            settings: PipelineSettings::default(),
        }
    }

    /// Check values
    pub fn validate(&self) -> EnhanceResult<()> {
        self.settings.validate()?;
        require_rate(self.sample_rate)?;
        require_nonzero(self.batch_size, "batch size")?;
        require_nonzero(self.num_workers, "worker count")
    }
}

/// Directory batch test
#[derive(Debug, Clone)]
pub struct TestDirConfig {
    /// Input root, searched recursively
    pub in_dir: PathBuf,
    /// Output root mirroring `in_dir`
    pub out_dir: PathBuf,
    /// Pipeline sample rate
    pub sample_rate: u32,
    /// Post-processing threads
    pub num_workers: usize,
    /// Items per inference batch
    pub batch_size: usize,
    /// Shared settings
    pub settings: PipelineSettings,
}

impl TestDirConfig {
    /// Config with the default worker count (4) and batch size (64)
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(in_dir: P, out_dir: Q) -> Self {
        TestDirConfig {
            in_dir: in_dir.into(),
            out_dir: out_dir.into(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            num_workers: 4,
            batch_size: 64,
            settings: PipelineSettings::default(),
        }
    }

    /// Check values
    pub fn validate(&self) -> EnhanceResult<()> {
        self.settings.validate()?;
        require_rate(self.sample_rate)?;
        require_nonzero(self.batch_size, "batch size")?;
        require_nonzero(self.num_workers, "worker count")
    }
}
