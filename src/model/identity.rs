use super::{Checkpoint, Model};
use crate::batch::Batch;
use crate::error::EnhanceResult;

/// Parameterless model that returns its input unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityModel;

impl Model for IdentityModel {
    fn name(&self) -> &str {
        "identity"
    }

    fn load_weights(&mut self, checkpoint: &Checkpoint) -> EnhanceResult<()> {
        checkpoint.expect_exactly(&[])
    }

    fn forward(&self, batch: &Batch) -> EnhanceResult<Batch> {
        Ok(batch.clone())
    }
}
