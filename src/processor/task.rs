use super::paths::ensure_parent;
use crate::core::Emphasized;
use crate::encoder::write_wav;
use crate::error::{EnhanceError, EnhanceResult};
use crate::filter::{Filter, Lowpass, PreEmphasis, clip};
use std::fs;
use std::path::PathBuf;

/// An owned unit of post-processing work
pub trait Task: Send + 'static {
    /// Human-readable item name used in failure reports
    fn label(&self) -> String;

    /// Do the work, returning every file written
    fn run(self) -> EnhanceResult<Vec<PathBuf>>;
}

/// Turns padded model output back into writable audio
#[derive(Debug, Clone)]
pub struct PostProcess {
    emphasis: PreEmphasis,
    lowpass: Option<Lowpass>,
    sample_rate: u32,
}

impl PostProcess {
    /// Reconstruction without a lowpass
    pub fn new(emphasis: PreEmphasis, sample_rate: u32) -> Self {
        PostProcess {
            emphasis,
            lowpass: None,
            sample_rate,
        }
    }

    /// Add an optional lowpass after de-emphasis
    pub fn with_lowpass(mut self, lowpass: Option<Lowpass>) -> Self {
        self.lowpass = lowpass;
        self
    }

    /// Output sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Truncate to `length`, de-emphasize, lowpass if configured, clip to `[-1, 1]`
    pub fn reconstruct(&self, padded: &[f32], length: usize) -> EnhanceResult<Vec<f32>> {
        if length == 0 || length > padded.len() {
            return Err(EnhanceError::ShapeError(format!(
                "valid length {} outside padded row of {}",
                length,
                padded.len()
            )));
        }

        let valid = &padded[..length];
        if let Some(pos) = valid.iter().position(|s| !s.is_finite()) {
            return Err(EnhanceError::ShapeError(format!(
                "non-finite model output at sample {}",
                pos
            )));
        }

        let emphasized = Emphasized::from_model_output(valid.to_vec(), self.sample_rate)?;
        let restored = self.emphasis.invert(emphasized).into_samples();
        let filtered = match &self.lowpass {
            Some(lowpass) => lowpass.process(&restored)?,
            None => restored,
        };
        Ok(clip(&filtered))
    }
}

/// Reconstruct one model output and write it to its destination
#[derive(Debug)]
pub struct ReconstructTask {
    /// Item name for reports, usually the input path
    pub label: String,
    /// Padded output row
    pub output: Vec<f32>,
    /// True length of the item
    pub length: usize,
    /// Where to write
    pub destination: PathBuf,
    /// Reconstruction settings
    pub post: PostProcess,
}

impl Task for ReconstructTask {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn run(self) -> EnhanceResult<Vec<PathBuf>> {
        let samples = self.post.reconstruct(&self.output, self.length)?;
        ensure_parent(&self.destination)?;
        write_wav(&self.destination, &samples, self.post.sample_rate())?;
        Ok(vec![self.destination])
    }
}

/// Write the noisy / predicted / clean triple for one validation item
#[derive(Debug)]
pub struct ValidationTask {
    /// Global item index
    pub index: usize,
    /// Pre-emphasized noisy input row, padded
    pub noisy: Vec<f32>,
    /// Model output row, padded
    pub pred: Vec<f32>,
    /// True length of the noisy input and of the prediction
    pub length: usize,
    /// Clean reference, already at its true length
    pub clean: Vec<f32>,
    /// Destinations for noise, pred and clean, in that order
    pub destinations: [PathBuf; 3],
    /// Reconstruction settings
    pub post: PostProcess,
}

impl Task for ValidationTask {
    fn label(&self) -> String {
        format!("item {}", self.index)
    }

    fn run(self) -> EnhanceResult<Vec<PathBuf>> {
        let noise = self.post.reconstruct(&self.noisy, self.length)?;
        let pred = self.post.reconstruct(&self.pred, self.length)?;
        let rate = self.post.sample_rate();

        let [noise_path, pred_path, clean_path] = self.destinations;
        ensure_parent(&noise_path)?;

        let mut written = Vec::with_capacity(3);
        for (path, samples) in [
            (noise_path, noise.as_slice()),
            (pred_path, pred.as_slice()),
            (clean_path, self.clean.as_slice()),
        ] {
            if let Err(e) = write_wav(&path, samples, rate) {
                // an item is written whole or not at all
                for partial in &written {
                    let _ = fs::remove_file(partial);
                }
                let _ = fs::remove_file(&path);
                return Err(e);
            }
            written.push(path);
        }
        Ok(written)
    }
}
