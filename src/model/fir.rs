use super::{Checkpoint, Model};
use crate::batch::Batch;
use crate::error::{EnhanceError, EnhanceResult};

const WEIGHT: &str = "conv.weight";
const BIAS: &str = "conv.bias";

/// Single-channel 1-D convolution with a learned odd-length kernel.
///
/// The kernel is centred so output sample `n` lines up with input sample `n`
/// and the sequence length never changes.
#[derive(Debug, Clone)]
pub struct FirDenoiser {
    weight: Vec<f32>,
    bias: f32,
}

impl Default for FirDenoiser {
    fn default() -> Self {
        FirDenoiser {
            weight: vec![1.0],
            bias: 0.0,
        }
    }
}

impl FirDenoiser {
    /// Kernel taps
    pub fn weight(&self) -> &[f32] {
        &self.weight
    }

    fn convolve(&self, input: &[f32], output: &mut [f32]) {
        let half = self.weight.len() / 2;
        let n = input.len();
        for (i, out) in output.iter_mut().enumerate() {
            let mut acc = self.bias;
            for (j, &w) in self.weight.iter().enumerate() {
                let idx = i + j;
                if idx >= half && idx - half < n {
                    acc += w * input[idx - half];
                }
            }
            *out = acc;
        }
    }
}

impl Model for FirDenoiser {
    fn name(&self) -> &str {
        "fir_denoiser"
    }

    fn load_weights(&mut self, checkpoint: &Checkpoint) -> EnhanceResult<()> {
        checkpoint.expect_exactly(&[WEIGHT, BIAS])?;

        // presence checked above
        let (Some(weight), Some(bias)) = (checkpoint.get(WEIGHT), checkpoint.get(BIAS)) else {
            return Err(EnhanceError::ModelLoadError(
                "fir_denoiser parameters missing".to_string(),
            ));
        };

        if weight.shape.len() != 1 || weight.shape[0] % 2 == 0 {
            return Err(EnhanceError::ModelLoadError(format!(
                "{} must be a 1-D kernel of odd length, got shape {:?}",
                WEIGHT, weight.shape
            )));
        }
        if bias.shape != [1] {
            return Err(EnhanceError::ModelLoadError(format!(
                "{} must have shape [1], got {:?}",
                BIAS, bias.shape
            )));
        }

        self.weight = weight.data.clone();
        self.bias = bias.data[0];
        Ok(())
    }

    fn forward(&self, batch: &Batch) -> EnhanceResult<Batch> {
        let mut data = vec![0.0f32; batch.data().len()];
        for (input, output) in batch
            .rows()
            .zip(data.chunks_exact_mut(batch.max_len()))
        {
            self.convolve(input, output);
        }
        batch.with_data(data)
    }
}
