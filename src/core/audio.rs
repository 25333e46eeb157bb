use crate::error::{EnhanceError, EnhanceResult};
use std::time::Duration;

/// Default pipeline sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 22050;

/// Default pre-emphasis coefficient
pub const DEFAULT_PREEMPHASIS: f32 = 0.97;

/// Default Butterworth order for the optional lowpass
pub const DEFAULT_LOWPASS_ORDER: usize = 5;

/// Mono waveform with its sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// Samples, nominally in -1.0..=1.0
    samples: Vec<f32>,
    /// Sample rate in Hz
    sample_rate: u32,
}

impl Waveform {
    /// Create a new waveform
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> EnhanceResult<Self> {
        if sample_rate == 0 {
            return Err(EnhanceError::InvalidSampleRate { rate: sample_rate });
        }

        Ok(Waveform {
            samples,
            sample_rate,
        })
    }

    /// Same sample rate, different samples
    pub(crate) fn with_samples(&self, samples: Vec<f32>) -> Waveform {
        Waveform {
            samples,
            sample_rate: self.sample_rate,
        }
    }

    /// Get reference to the samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Get owned samples (consumes waveform)
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Get sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if waveform is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get duration of this waveform
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

/// A waveform that has passed pre-emphasis exactly once.
///
/// Only [`crate::filter::PreEmphasis::apply`] and [`Emphasized::from_model_output`]
/// produce this type, and only [`crate::filter::PreEmphasis::invert`] turns it back
/// into a plain [`Waveform`]. Every pipeline boundary therefore states which
/// transform stage its audio is in.
#[derive(Debug, Clone, PartialEq)]
pub struct Emphasized(Waveform);

impl Emphasized {
    pub(crate) fn wrap(waveform: Waveform) -> Self {
        Emphasized(waveform)
    }

    /// Wrap model output, which lives in the pre-emphasized domain.
    pub fn from_model_output(samples: Vec<f32>, sample_rate: u32) -> EnhanceResult<Self> {
        Ok(Emphasized(Waveform::new(samples, sample_rate)?))
    }

    /// Get reference to the samples
    pub fn samples(&self) -> &[f32] {
        self.0.samples()
    }

    /// Get sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.0.sample_rate()
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if waveform is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn into_inner(self) -> Waveform {
        self.0
    }
}

impl AsRef<[f32]> for Emphasized {
    fn as_ref(&self) -> &[f32] {
        self.samples()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waveform_creation() {
        let wav = Waveform::new(vec![0.1, 0.2, 0.3, 0.4], 22050).unwrap();

        assert_eq!(wav.sample_rate(), 22050);
        assert_eq!(wav.len(), 4);
        assert!(!wav.is_empty());
    }

    #[test]
    fn test_waveform_invalid_rate() {
        let result = Waveform::new(vec![0.1], 0);
        assert!(matches!(
            result,
            Err(EnhanceError::InvalidSampleRate { rate: 0 })
        ));
    }

    #[test]
    fn test_waveform_duration() {
        let wav = Waveform::new(vec![0.0; 22050], 22050).unwrap();
        assert_eq!(wav.duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_model_output_is_emphasized() {
        let out = Emphasized::from_model_output(vec![0.5, -0.5], 16000).unwrap();
        assert_eq!(out.samples(), &[0.5, -0.5]);
        assert_eq!(out.sample_rate(), 16000);
    }
}
