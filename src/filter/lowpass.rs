//! Zero-phase Butterworth lowpass
//!
//! The filter is a cascade of second-order sections (plus one first-order
//! section for odd orders) run forward and then backward over the signal,
//! so the result has no phase shift and the magnitude response is squared.

use crate::error::{EnhanceError, EnhanceResult};
use std::f64::consts::PI;

/// One filter section in Transposed Direct Form II
#[derive(Debug, Clone, Copy)]
struct Section {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Section {
    /// Second-order lowpass section with bilinear prewarping at `freq`
    fn second_order(freq: f64, q: f64, sample_rate: f64) -> Self {
        let omega = 2.0 * PI * freq / sample_rate;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();
        let alpha = sin_omega / (2.0 * q);

        let a0 = 1.0 + alpha;
        Section {
            b0: (1.0 - cos_omega) / 2.0 / a0,
            b1: (1.0 - cos_omega) / a0,
            b2: (1.0 - cos_omega) / 2.0 / a0,
            a1: -2.0 * cos_omega / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    /// First-order lowpass section (real pole of odd-order designs)
    fn first_order(freq: f64, sample_rate: f64) -> Self {
        let k = (PI * freq / sample_rate).tan();
        Section {
            b0: k / (1.0 + k),
            b1: k / (1.0 + k),
            b2: 0.0,
            a1: (k - 1.0) / (k + 1.0),
            a2: 0.0,
        }
    }

    /// Run the section over `signal` in place, starting from the steady state
    /// for a constant input equal to the first sample.
    fn run(&self, signal: &mut [f64]) {
        let Some(&x0) = signal.first() else {
            return;
        };
        let mut z2 = (self.b2 - self.a2) * x0;
        let mut z1 = (self.b1 - self.a1) * x0 + z2;

        for sample in signal.iter_mut() {
            let x = *sample;
            let y = self.b0 * x + z1;
            z1 = self.b1 * x - self.a1 * y + z2;
            z2 = self.b2 * x - self.a2 * y;
            *sample = y;
        }
    }
}

/// Zero-phase Butterworth lowpass filter
#[derive(Debug, Clone)]
pub struct Lowpass {
    cutoff: f64,
    sample_rate: u32,
    order: usize,
    sections: Vec<Section>,
}

impl Lowpass {
    /// Design a lowpass of the given order
    ///
    /// # Arguments
    /// * `cutoff` - Cutoff frequency in Hz, strictly below Nyquist
    /// * `sample_rate` - Sample rate in Hz
    /// * `order` - Butterworth order (at least 1)
    pub fn new(cutoff: f64, sample_rate: u32, order: usize) -> EnhanceResult<Self> {
        if sample_rate == 0 {
            return Err(EnhanceError::InvalidSampleRate { rate: 0 });
        }
        let nyquist = sample_rate as f64 / 2.0;
        if !(cutoff > 0.0 && cutoff < nyquist) {
            return Err(EnhanceError::ConfigError(format!(
                "Lowpass cutoff must be in (0, {}) Hz, got {}",
                nyquist, cutoff
            )));
        }
        if order == 0 {
            return Err(EnhanceError::ConfigError(
                "Lowpass order must be at least 1".to_string(),
            ));
        }

        let fs = sample_rate as f64;
        let mut sections: Vec<Section> = (0..order / 2)
            .map(|k| {
                let q = 1.0 / (2.0 * (PI * (2 * k + 1) as f64 / (2 * order) as f64).sin());
                Section::second_order(cutoff, q, fs)
            })
            .collect();
        if order % 2 == 1 {
            sections.push(Section::first_order(cutoff, fs));
        }

        Ok(Lowpass {
            cutoff,
            sample_rate,
            order,
            sections,
        })
    }

    /// Build the optional post-processing lowpass: a cutoff of 0 or none means no filtering.
    pub fn from_cutoff(
        cutoff: Option<u32>,
        sample_rate: u32,
        order: usize,
    ) -> EnhanceResult<Option<Self>> {
        match cutoff {
            None | Some(0) => Ok(None),
            Some(freq) => Lowpass::new(freq as f64, sample_rate, order).map(Some),
        }
    }

    /// Get the cutoff frequency in Hz
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Get the sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the filter order
    pub fn order(&self) -> usize {
        self.order
    }

    fn run_cascade(&self, signal: &mut [f64]) {
        for section in &self.sections {
            section.run(signal);
        }
    }

    /// Filter forward and backward. Output length equals input length.
    pub fn apply(&self, input: &[f32]) -> Vec<f32> {
        let n = input.len();
        if n < 2 {
            return input.to_vec();
        }

        // odd reflection about the end points keeps the edges free of start-up transients
        let pad = (3 * (2 * self.sections.len() + 1)).min(n - 1);
        let first = input[0] as f64;
        let last = input[n - 1] as f64;

        let mut ext = Vec::with_capacity(n + 2 * pad);
        ext.extend((1..=pad).rev().map(|i| 2.0 * first - input[i] as f64));
        ext.extend(input.iter().map(|&s| s as f64));
        ext.extend((1..=pad).map(|i| 2.0 * last - input[n - 1 - i] as f64));

        self.run_cascade(&mut ext);
        ext.reverse();
        self.run_cascade(&mut ext);
        ext.reverse();

        ext[pad..pad + n].iter().map(|&s| s as f32).collect()
    }
}

impl super::Filter for Lowpass {
    fn process(&self, input: &[f32]) -> EnhanceResult<Vec<f32>> {
        Ok(self.apply(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freq: f64, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f64 / sample_rate as f64).sin() as f32 * 0.5)
            .collect()
    }

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    #[test]
    fn test_zero_cutoff_is_passthrough() {
        assert!(Lowpass::from_cutoff(Some(0), 22050, 5).unwrap().is_none());
        assert!(Lowpass::from_cutoff(None, 22050, 5).unwrap().is_none());
    }

    #[test]
    fn test_invalid_cutoff() {
        assert!(Lowpass::new(11025.0, 22050, 5).is_err());
        assert!(Lowpass::new(-1.0, 22050, 5).is_err());
        assert!(Lowpass::new(1000.0, 22050, 0).is_err());
        assert!(Lowpass::new(1000.0, 0, 5).is_err());
    }

    #[test]
    fn test_section_count() {
        assert_eq!(Lowpass::new(1000.0, 22050, 5).unwrap().sections.len(), 3);
        assert_eq!(Lowpass::new(1000.0, 22050, 4).unwrap().sections.len(), 2);
    }

    #[test]
    fn test_dc_passes_unchanged() {
        let lp = Lowpass::new(2000.0, 22050, 5).unwrap();
        let out = lp.apply(&vec![0.25; 512]);
        assert_eq!(out.len(), 512);
        for s in out {
            assert!((s - 0.25).abs() < 1e-4, "{}", s);
        }
    }

    #[test]
    fn test_passband_preserved_stopband_attenuated() {
        let lp = Lowpass::new(2000.0, 22050, 5).unwrap();

        let low = tone(200.0, 22050, 4096);
        let low_out = lp.apply(&low);
        let ratio = rms(&low_out[512..3584]) / rms(&low[512..3584]);
        assert!((ratio - 1.0).abs() < 0.02, "passband ratio {}", ratio);

        let high = tone(8000.0, 22050, 4096);
        let high_out = lp.apply(&high);
        let ratio = rms(&high_out[512..3584]) / rms(&high[512..3584]);
        assert!(ratio < 0.01, "stopband ratio {}", ratio);
    }

    #[test]
    fn test_short_inputs() {
        let lp = Lowpass::new(2000.0, 22050, 5).unwrap();
        assert!(lp.apply(&[]).is_empty());
        assert_eq!(lp.apply(&[0.3]), vec![0.3]);
        assert_eq!(lp.apply(&[0.3, 0.1, -0.2]).len(), 3);
    }
}
