//! Signal transforms applied to single mono buffers
//!
//! Every transform here is a pure function of its input, so independent
//! buffers can be processed from any number of threads at once.

/// Pre-emphasis and its inverse
pub mod emphasis;
/// Zero-phase Butterworth lowpass
pub mod lowpass;
/// Channel downmix and clipping
pub mod remix;
/// Sample rate conversion
pub mod resample;

pub use emphasis::{PreEmphasis, de_emphasis, pre_emphasis};
pub use lowpass::Lowpass;
pub use remix::{clip, downmix};
pub use resample::Resample;

use crate::error::EnhanceResult;

/// Trait for buffer-to-buffer filters
pub trait Filter: Send + Sync {
    /// Process one mono buffer through this filter
    fn process(&self, input: &[f32]) -> EnhanceResult<Vec<f32>>;
}
