//! Audio encoding

/// WAV writer
pub mod wav;

pub use wav::WavEncoder;

use crate::error::EnhanceResult;
use std::path::Path;

/// Trait for audio encoders
pub trait Encoder {
    /// Append samples to the output
    fn encode(&mut self, samples: &[f32]) -> EnhanceResult<()>;

    /// Finalize encoding (flush any remaining data)
    fn finalize(&mut self) -> EnhanceResult<()> {
        Ok(())
    }
}

/// Write a whole mono buffer to a WAV file in one go
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], sample_rate: u32) -> EnhanceResult<()> {
    let mut encoder = WavEncoder::new(path, sample_rate)?;
    encoder.encode(samples)?;
    encoder.finalize()
}
