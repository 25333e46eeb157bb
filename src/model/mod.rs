//! Model capability, checkpoints and the inference runner
//!
//! A model is anything that can take its weights from a [`Checkpoint`] and map
//! a padded [`Batch`] to a batch of the same shape. Architectures are chosen by
//! name through [`build_model`]; the runner owns exactly one of them.

/// Serialized weights
pub mod checkpoint;
/// Compute devices
pub mod device;
/// Learned FIR denoiser
pub mod fir;
/// Pass-through model
pub mod identity;
/// Forward passes over padded batches
pub mod runner;

pub use checkpoint::{Checkpoint, Tensor};
pub use device::Device;
pub use fir::FirDenoiser;
pub use identity::IdentityModel;
pub use runner::InferenceRunner;

use crate::batch::Batch;
use crate::error::{EnhanceError, EnhanceResult};

/// Architecture names understood by [`build_model`]
pub const MODEL_NAMES: &[&str] = &["identity", "fir_denoiser"];

/// Trait for enhancement models
pub trait Model: Send + Sync {
    /// Architecture name
    fn name(&self) -> &str;

    /// Copy parameters out of a checkpoint, rejecting anything that does not fit
    fn load_weights(&mut self, checkpoint: &Checkpoint) -> EnhanceResult<()>;

    /// Map a padded batch to a batch of identical shape
    fn forward(&self, batch: &Batch) -> EnhanceResult<Batch>;
}

/// Instantiate an architecture by name with default parameters
pub fn build_model(name: &str) -> EnhanceResult<Box<dyn Model>> {
    match name {
        "identity" => Ok(Box::new(IdentityModel)),
        "fir_denoiser" => Ok(Box::new(FirDenoiser::default())),
        other => Err(EnhanceError::ModelLoadError(format!(
            "unknown architecture '{}' (available: {})",
            other,
            MODEL_NAMES.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_builds_every_name() {
        for name in MODEL_NAMES {
            assert_eq!(build_model(name).unwrap().name(), *name);
        }
    }

    #[test]
    fn test_identity_accepts_empty_checkpoint() {
        let mut model = build_model("identity").unwrap();
        assert!(model.load_weights(&Checkpoint::default()).is_ok());
    }
}
