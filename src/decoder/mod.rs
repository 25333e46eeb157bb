//! Audio decoding: any symphonia-supported file to mono f32 at a target rate

/// Symphonia backend
pub mod symphonia;

pub use self::symphonia::SymphoniaDecoder;

use crate::core::Waveform;
use crate::error::EnhanceResult;
use std::path::Path;

/// Result of decoding one file
#[derive(Debug, Clone)]
pub struct Decoded {
    /// Mono audio at the requested sample rate
    pub waveform: Waveform,
    /// Sample rate the file was stored at
    pub source_rate: u32,
}

/// Trait for audio decoders
pub trait Decoder: Send + Sync {
    /// Decode `path` to mono audio resampled to `target_rate`
    fn decode(&self, path: &Path, target_rate: u32) -> EnhanceResult<Decoded>;
}

/// Decode a file with the default decoder
pub fn load<P: AsRef<Path>>(path: P, target_rate: u32) -> EnhanceResult<Decoded> {
    SymphoniaDecoder.decode(path.as_ref(), target_rate)
}
