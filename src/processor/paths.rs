use crate::error::{EnhanceError, EnhanceResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Which file of a validation triple is being written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Noisy model input
    Noise,
    /// Model prediction
    Pred,
    /// Ground-truth clean reference
    Clean,
}

impl OutputKind {
    /// Filename suffix
    pub fn suffix(&self) -> &'static str {
        match self {
            OutputKind::Noise => "noise",
            OutputKind::Pred => "pred",
            OutputKind::Clean => "clean",
        }
    }
}

/// Maps inputs to destinations under one output root
#[derive(Debug, Clone)]
pub struct OutputPathPlan {
    out_root: PathBuf,
}

impl OutputPathPlan {
    /// Plan destinations under `out_root`
    pub fn new<P: Into<PathBuf>>(out_root: P) -> Self {
        OutputPathPlan {
            out_root: out_root.into(),
        }
    }

    /// `out_root/<path of input relative to in_root>`
    pub fn mirror(&self, in_root: &Path, input: &Path) -> EnhanceResult<PathBuf> {
        let relative = input.strip_prefix(in_root).map_err(|_| {
            EnhanceError::WriteError(format!(
                "{} is not inside {}",
                input.display(),
                in_root.display()
            ))
        })?;
        if relative.as_os_str().is_empty() {
            return Err(EnhanceError::WriteError(format!(
                "{} has no file name below {}",
                input.display(),
                in_root.display()
            )));
        }
        Ok(self.out_root.join(relative))
    }

    /// `out_root/<index>_<kind>.wav`
    pub fn indexed(&self, index: usize, kind: OutputKind) -> PathBuf {
        self.out_root
            .join(format!("{}_{}.wav", index, kind.suffix()))
    }
}

/// Create the parent directory of `path`; succeeds if it already exists
pub fn ensure_parent(path: &Path) -> EnhanceResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| EnhanceError::WriteError(format!("{}: {}", parent.display(), e)))?;
    }
    Ok(())
}
