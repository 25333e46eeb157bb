use super::discover_wavs;
use crate::core::Waveform;
use crate::decoder;
use crate::error::{EnhanceError, EnhanceResult};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Subdirectory holding noisy inputs
pub const NOISY_DIR: &str = "noisy";
/// Subdirectory holding clean references
pub const CLEAN_DIR: &str = "clean";

/// One noisy file and its clean reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedItem {
    /// Path relative to the noisy and clean roots
    pub name: PathBuf,
    /// Noisy file
    pub noisy: PathBuf,
    /// Clean file
    pub clean: PathBuf,
}

/// Validation corpus laid out as `<root>/noisy/**.wav` + `<root>/clean/**.wav`,
/// paired by relative path.
#[derive(Debug, Clone)]
pub struct PairedCorpus {
    pairs: Vec<PairedItem>,
}

impl PairedCorpus {
    /// Index the corpus under `root`
    pub fn open<P: AsRef<Path>>(root: P) -> EnhanceResult<Self> {
        let root = root.as_ref();
        let noisy_root = root.join(NOISY_DIR);
        let clean_root = root.join(CLEAN_DIR);
        if !clean_root.is_dir() {
            return Err(EnhanceError::ConfigError(format!(
                "{} is not a directory",
                clean_root.display()
            )));
        }

        let mut pairs = Vec::new();
        for noisy in discover_wavs(&noisy_root)? {
            let Ok(name) = noisy.strip_prefix(&noisy_root).map(Path::to_path_buf) else {
                continue;
            };
            let clean = clean_root.join(&name);
            if !clean.is_file() {
                warn!("No clean reference for {}, skipping", noisy.display());
                continue;
            }
            pairs.push(PairedItem { name, noisy, clean });
        }

        info!("Found {} noisy/clean pairs under {}", pairs.len(), root.display());
        Ok(PairedCorpus { pairs })
    }

    /// All pairs, sorted by relative path
    pub fn pairs(&self) -> &[PairedItem] {
        &self.pairs
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when no pairs were found
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Decode both sides of a pair at `sample_rate`. Neither is pre-emphasized.
    pub fn load(&self, item: &PairedItem, sample_rate: u32) -> EnhanceResult<(Waveform, Waveform)> {
        let noisy = decoder::load(&item.noisy, sample_rate)?.waveform;
        let clean = decoder::load(&item.clean, sample_rate)?.waveform;
        Ok((noisy, clean))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::write_tone;
    use tempfile::TempDir;

    #[test]
    fn test_pairs_by_relative_path() {
        let dir = TempDir::new().unwrap();
        write_tone(&dir.path().join("noisy/p232_001.wav"), 40, 0.2, 22050);
        write_tone(&dir.path().join("clean/p232_001.wav"), 40, 0.1, 22050);
        write_tone(&dir.path().join("noisy/spk/p257_002.wav"), 30, 0.2, 22050);
        write_tone(&dir.path().join("clean/spk/p257_002.wav"), 30, 0.1, 22050);
        // no clean partner
        write_tone(&dir.path().join("noisy/orphan.wav"), 30, 0.2, 22050);

        let corpus = PairedCorpus::open(dir.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.pairs()[0].name, PathBuf::from("p232_001.wav"));
        assert_eq!(corpus.pairs()[1].name, PathBuf::from("spk/p257_002.wav"));

        let (noisy, clean) = corpus.load(&corpus.pairs()[1], 22050).unwrap();
        assert_eq!(noisy.len(), 30);
        assert_eq!(clean.len(), 30);
    }

    #[test]
    fn test_missing_layout() {
        let dir = TempDir::new().unwrap();
        assert!(PairedCorpus::open(dir.path()).is_err());
    }
}
