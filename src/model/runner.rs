use super::{Checkpoint, Device, Model, build_model};
use crate::batch::Batch;
use crate::error::{EnhanceError, EnhanceResult};
use log::{debug, info};
use std::path::Path;
use std::time::Instant;

/// Owns a loaded model and runs forward passes over padded batches.
///
/// The model is only ever reached through `&self`, so once loaded its
/// parameters are read-only for the lifetime of the runner.
pub struct InferenceRunner {
    model: Box<dyn Model>,
    device: Device,
}

impl InferenceRunner {
    /// Build the named architecture, load its checkpoint and bind it to `device`
    pub fn load<P: AsRef<Path>>(
        model_name: &str,
        checkpoint_path: P,
        device: Device,
    ) -> EnhanceResult<Self> {
        let checkpoint_path = checkpoint_path.as_ref();
        info!(
            "Loading model '{}' from {} on {}",
            model_name,
            checkpoint_path.display(),
            device
        );
        device.ensure_available()?;

        let mut model = build_model(model_name)?;
        let checkpoint = Checkpoint::load(checkpoint_path)?.into_loadable();
        model.load_weights(&checkpoint)?;

        Ok(InferenceRunner { model, device })
    }

    /// Wrap an already-built model
    pub fn new(model: Box<dyn Model>, device: Device) -> EnhanceResult<Self> {
        device.ensure_available()?;
        Ok(InferenceRunner { model, device })
    }

    /// Name of the loaded architecture
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Device the model is bound to
    pub fn device(&self) -> Device {
        self.device
    }

    /// One forward pass. Output has the input's shape with padding zeroed.
    pub fn infer(&self, batch: &Batch) -> EnhanceResult<Batch> {
        let started = Instant::now();
        let mut output = self.model.forward(batch)?;

        if output.shape() != batch.shape() || output.lengths() != batch.lengths() {
            return Err(EnhanceError::ShapeError(format!(
                "model '{}' returned shape {:?} for input {:?}",
                self.model.name(),
                output.shape(),
                batch.shape()
            )));
        }
        output.zero_padding();

        debug!(
            "Inference over {:?} took {:.1} ms",
            batch.shape(),
            started.elapsed().as_secs_f64() * 1000.0
        );
        Ok(output)
    }
}
