//! Orchestration modes
//!
//! - [`separate`]: one file in, one file out, optional lowpass
//! - [`validate`]: paired noisy/clean corpus, writes noise/pred/clean triples
//! - [`test_dir`]: every WAV under a directory, mirrored into an output tree
//!
//! Inference always runs on the calling thread, one batch at a time. Writing
//! happens on a [`crate::processor::WorkerPool`] so files from batch *k* are
//! written while batch *k + 1* is being decoded and inferred.

/// Paired noisy/clean corpus
pub mod corpus;
/// Single-file mode
pub mod separate;
/// Directory mode
pub mod test_dir;
/// Validation mode
pub mod validate;

pub use corpus::{PairedCorpus, PairedItem};

use crate::error::{EnhanceError, EnhanceResult};
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively find `*.wav` files (any letter case) under `root`, sorted
pub fn discover_wavs(root: &Path) -> EnhanceResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(EnhanceError::ConfigError(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let is_wav = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
        if entry.file_type().is_file() && is_wav {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::encoder::write_wav;
    use std::path::Path;

    /// Write a mono float WAV, creating parent directories
    pub fn write_tone(path: &Path, len: usize, amplitude: f32, sample_rate: u32) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let samples: Vec<f32> = (0..len)
            .map(|i| amplitude * ((i as f32) * 0.05).sin())
            .collect();
        write_wav(path, &samples, sample_rate).unwrap();
    }

    /// Read back a WAV written by this crate
    pub fn read_samples(path: &Path) -> Vec<f32> {
        hound::WavReader::open(path)
            .unwrap()
            .samples::<f32>()
            .map(|s| s.unwrap())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::write_tone;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_recursive_sorted() {
        let dir = TempDir::new().unwrap();
        write_tone(&dir.path().join("b/2.wav"), 10, 0.1, 22050);
        write_tone(&dir.path().join("a/1.WAV"), 10, 0.1, 22050);
        write_tone(&dir.path().join("0.wav"), 10, 0.1, 22050);
        std::fs::write(dir.path().join("notes.txt"), "skip me").unwrap();

        let files = discover_wavs(dir.path()).unwrap();
        let relative: Vec<PathBuf> = files
            .iter()
            .map(|f| f.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("0.wav"),
                PathBuf::from("a/1.WAV"),
                PathBuf::from("b/2.wav"),
            ]
        );
    }

    #[test]
    fn test_discover_missing_root() {
        assert!(matches!(
            discover_wavs(Path::new("/nonexistent/input")),
            Err(EnhanceError::ConfigError(_))
        ));
    }
}
