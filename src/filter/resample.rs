use crate::error::{EnhanceError, EnhanceResult};
use rubato::{FftFixedIn, Resampler};

const CHUNK_SIZE: usize = 1024;
const SUB_CHUNKS: usize = 2;

/// Mono resampler from one sample rate to another
#[derive(Debug, Clone, Copy)]
pub struct Resample {
    input_rate: u32,
    output_rate: u32,
}

impl Resample {
    /// Create a new resampler
    ///
    /// # Arguments
    /// * `input_rate` - Input sample rate in Hz
    /// * `output_rate` - Output sample rate in Hz
    pub fn new(input_rate: u32, output_rate: u32) -> EnhanceResult<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(EnhanceError::InvalidSampleRate { rate: 0 });
        }

        Ok(Resample {
            input_rate,
            output_rate,
        })
    }

    /// Get the input sample rate
    pub fn input_rate(&self) -> u32 {
        self.input_rate
    }

    /// Get the output sample rate
    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }

    /// Number of output samples produced for `input_len` input samples
    pub fn output_len(&self, input_len: usize) -> usize {
        (input_len as u64 * self.output_rate as u64).div_ceil(self.input_rate as u64) as usize
    }

    fn resample(&self, input: &[f32]) -> EnhanceResult<Vec<f32>> {
        let mut resampler = FftFixedIn::<f32>::new(
            self.input_rate as usize,
            self.output_rate as usize,
            CHUNK_SIZE,
            SUB_CHUNKS,
            1,
        )
        .map_err(|e| EnhanceError::ResamplingError(e.to_string()))?;

        let delay = resampler.output_delay();
        let expected = self.output_len(input.len());
        let mut output = Vec::with_capacity(expected + delay + CHUNK_SIZE);

        let mut pos = 0;
        while input.len() - pos >= resampler.input_frames_next() {
            let need = resampler.input_frames_next();
            let frame: &[&[f32]] = &[&input[pos..pos + need]];
            let chunk = resampler
                .process(frame, None)
                .map_err(|e| EnhanceError::ResamplingError(e.to_string()))?;
            output.extend_from_slice(&chunk[0]);
            pos += need;
        }
        if pos < input.len() {
            let tail: &[&[f32]] = &[&input[pos..]];
            let chunk = resampler
                .process_partial(Some(tail), None)
                .map_err(|e| EnhanceError::ResamplingError(e.to_string()))?;
            output.extend_from_slice(&chunk[0]);
        }
        // drain the resampler's internal delay line
        while output.len() < expected + delay {
            let chunk = resampler
                .process_partial::<&[f32]>(None, None)
                .map_err(|e| EnhanceError::ResamplingError(e.to_string()))?;
            if chunk[0].is_empty() {
                break;
            }
            output.extend_from_slice(&chunk[0]);
        }

        output.drain(..delay.min(output.len()));
        output.resize(expected, 0.0);
        Ok(output)
    }
}

impl super::Filter for Resample {
    fn process(&self, input: &[f32]) -> EnhanceResult<Vec<f32>> {
        if self.input_rate == self.output_rate || input.is_empty() {
            // No resampling needed
            return Ok(input.to_vec());
        }
        self.resample(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;

    #[test]
    fn test_resample_creation() {
        let r = Resample::new(44100, 22050).unwrap();
        assert_eq!(r.input_rate(), 44100);
        assert_eq!(r.output_rate(), 22050);
    }

    #[test]
    fn test_resample_invalid_rate() {
        assert!(Resample::new(0, 16000).is_err());
        assert!(Resample::new(16000, 0).is_err());
    }

    #[test]
    fn test_same_rate_is_identity() {
        let r = Resample::new(22050, 22050).unwrap();
        let input = vec![0.1, -0.2, 0.3];
        assert_eq!(r.process(&input).unwrap(), input);
    }

    #[test]
    fn test_output_length() {
        let r = Resample::new(44100, 22050).unwrap();
        let input = vec![0.0f32; 44100 + 17];
        let out = r.process(&input).unwrap();
        assert_eq!(out.len(), r.output_len(input.len()));
        assert_eq!(out.len(), 22059);
    }

    #[test]
    fn test_dc_level_survives_resampling() {
        let r = Resample::new(16000, 22050).unwrap();
        let out = r.process(&vec![0.5f32; 8000]).unwrap();
        let mid = &out[out.len() / 4..3 * out.len() / 4];
        for s in mid {
            assert!((s - 0.5).abs() < 0.01, "{}", s);
        }
    }
}
