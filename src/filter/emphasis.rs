use crate::core::{Emphasized, Waveform};
use crate::error::{EnhanceError, EnhanceResult};

/// First-order pre-emphasis: `y[0] = x[0]`, `y[n] = x[n] - a * x[n - 1]`.
pub fn pre_emphasis(input: &[f32], coeff: f32) -> Vec<f32> {
    let mut output = Vec::with_capacity(input.len());
    let mut prev = 0.0f32;
    for &x in input {
        output.push(x - coeff * prev);
        prev = x;
    }
    output
}

/// Exact inverse of [`pre_emphasis`]: `x[0] = y[0]`, `x[n] = y[n] + a * x[n - 1]`.
pub fn de_emphasis(input: &[f32], coeff: f32) -> Vec<f32> {
    let mut output = Vec::with_capacity(input.len());
    let mut prev = 0.0f32;
    for &y in input {
        prev = y + coeff * prev;
        output.push(prev);
    }
    output
}

/// Pre-emphasis / de-emphasis pair sharing one coefficient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreEmphasis {
    coeff: f32,
}

impl PreEmphasis {
    /// Create the transform pair; the coefficient must lie strictly in (0, 1)
    pub fn new(coeff: f32) -> EnhanceResult<Self> {
        if !(coeff > 0.0 && coeff < 1.0) {
            return Err(EnhanceError::ConfigError(format!(
                "Pre-emphasis coefficient must be in (0, 1), got {}",
                coeff
            )));
        }
        Ok(PreEmphasis { coeff })
    }

    /// Get the coefficient
    pub fn coeff(&self) -> f32 {
        self.coeff
    }

    /// Forward transform, marking the result as emphasized
    pub fn apply(&self, waveform: &Waveform) -> Emphasized {
        Emphasized::wrap(waveform.with_samples(pre_emphasis(waveform.samples(), self.coeff)))
    }

    /// Inverse transform back to the plain waveform domain
    pub fn invert(&self, emphasized: Emphasized) -> Waveform {
        let inner = emphasized.into_inner();
        inner.with_samples(de_emphasis(inner.samples(), self.coeff))
    }
}

impl Default for PreEmphasis {
    fn default() -> Self {
        PreEmphasis {
            coeff: crate::core::DEFAULT_PREEMPHASIS,
        }
    }
}
