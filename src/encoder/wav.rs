use crate::error::{EnhanceError, EnhanceResult};
use hound::{WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Mono 32-bit float WAV encoder
pub struct WavEncoder {
    writer: Option<WavWriter<BufWriter<File>>>,
    path: PathBuf,
    sample_rate: u32,
}

impl WavEncoder {
    /// Create a new WAV encoder writing to `path`
    pub fn new<P: AsRef<Path>>(path: P, sample_rate: u32) -> EnhanceResult<Self> {
        let path = path.as_ref();
        if sample_rate == 0 {
            return Err(EnhanceError::InvalidSampleRate { rate: 0 });
        }

        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };

        let writer = WavWriter::create(path, spec)
            .map_err(|e| EnhanceError::WriteError(format!("{}: {}", path.display(), e)))?;

        Ok(WavEncoder {
            writer: Some(writer),
            path: path.to_path_buf(),
            sample_rate,
        })
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the number of samples written
    pub fn samples_written(&self) -> u32 {
        self.writer.as_ref().map(|w| w.len()).unwrap_or(0)
    }
}

impl super::Encoder for WavEncoder {
    fn encode(&mut self, samples: &[f32]) -> EnhanceResult<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            EnhanceError::WriteError(format!("{}: encoder already finalized", self.path.display()))
        })?;

        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| EnhanceError::WriteError(format!("{}: {}", self.path.display(), e)))?;
        }

        Ok(())
    }

    fn finalize(&mut self) -> EnhanceResult<()> {
        if let Some(writer) = self.writer.take() {
            writer
                .finalize()
                .map_err(|e| EnhanceError::WriteError(format!("{}: {}", self.path.display(), e)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Encoder;
    use tempfile::NamedTempFile;

    #[test]
    fn test_wav_encoder_write() {
        let temp_file = NamedTempFile::new().unwrap();
        let mut encoder = WavEncoder::new(temp_file.path(), 22050).unwrap();

        assert!(encoder.encode(&[0.0, 0.1, -0.1, 0.5]).is_ok());
        assert_eq!(encoder.samples_written(), 4);
        assert!(encoder.finalize().is_ok());

        let reader = hound::WavReader::open(temp_file.path()).unwrap();
        assert_eq!(reader.spec().sample_rate, 22050);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len(), 4);
    }

    #[test]
    fn test_wav_encoder_after_finalize() {
        let temp_file = NamedTempFile::new().unwrap();
        let mut encoder = WavEncoder::new(temp_file.path(), 22050).unwrap();
        encoder.finalize().unwrap();
        assert!(matches!(
            encoder.encode(&[0.1]),
            Err(EnhanceError::WriteError(_))
        ));
    }

    #[test]
    fn test_wav_encoder_bad_destination() {
        let result = WavEncoder::new("/nonexistent/dir/out.wav", 22050);
        assert!(matches!(result, Err(EnhanceError::WriteError(_))));
    }
}
