//! Serialized model weights
//!
//! A checkpoint is a JSON document whose top-level `"model"` key maps parameter
//! names to tensors; any other top-level keys (optimizer state, step counters)
//! are ignored:
//!
//! ```json
//! { "model": { "conv.weight": { "shape": [3], "data": [0.25, 0.5, 0.25] } } }
//! ```

use crate::error::{EnhanceError, EnhanceResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Name prefix left on parameters by data-parallel training wrappers
const DATA_PARALLEL_PREFIX: &str = "module.";

/// Dense f32 tensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    /// Dimensions, outermost first
    pub shape: Vec<usize>,
    /// Row-major values
    pub data: Vec<f32>,
}

impl Tensor {
    /// Create a tensor, checking that `data` fills `shape` exactly
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> EnhanceResult<Self> {
        let tensor = Tensor { shape, data };
        tensor.check()?;
        Ok(tensor)
    }

    /// Number of elements implied by the shape
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    fn check(&self) -> EnhanceResult<()> {
        if self.numel() != self.data.len() {
            return Err(EnhanceError::ModelLoadError(format!(
                "tensor of shape {:?} holds {} values",
                self.shape,
                self.data.len()
            )));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct CheckpointFile {
    model: BTreeMap<String, Tensor>,
}

/// Parameter name to tensor mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Checkpoint {
    params: BTreeMap<String, Tensor>,
}

impl Checkpoint {
    /// Build a checkpoint from parameters
    pub fn from_params(params: BTreeMap<String, Tensor>) -> EnhanceResult<Self> {
        for (name, tensor) in &params {
            tensor
                .check()
                .map_err(|e| EnhanceError::ModelLoadError(format!("{}: {}", name, e)))?;
        }
        Ok(Checkpoint { params })
    }

    /// Read a checkpoint file
    pub fn load<P: AsRef<Path>>(path: P) -> EnhanceResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            EnhanceError::ModelLoadError(format!("cannot open checkpoint {}: {}", path.display(), e))
        })?;

        let parsed: CheckpointFile = serde_json::from_reader(BufReader::new(file))?;
        debug!(
            "Read {} parameters from {}",
            parsed.model.len(),
            path.display()
        );
        Checkpoint::from_params(parsed.model)
    }

    /// Write this checkpoint under the `"model"` key
    pub fn save<P: AsRef<Path>>(&self, path: P) -> EnhanceResult<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| EnhanceError::WriteError(format!("{}: {}", path.display(), e)))?;
        let doc = CheckpointFile {
            model: self.params.clone(),
        };
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &doc)
            .map_err(|e| EnhanceError::WriteError(format!("{}: {}", path.display(), e)))?;
        writer
            .flush()
            .map_err(|e| EnhanceError::WriteError(format!("{}: {}", path.display(), e)))
    }

    /// Strip the data-parallel `module.` prefix so names match a bare model
    pub fn into_loadable(self) -> Self {
        let params = self
            .params
            .into_iter()
            .map(|(name, tensor)| match name.strip_prefix(DATA_PARALLEL_PREFIX) {
                Some(bare) => (bare.to_string(), tensor),
                None => (name, tensor),
            })
            .collect();
        Checkpoint { params }
    }

    /// Look up a parameter
    pub fn get(&self, name: &str) -> Option<&Tensor> {
        self.params.get(name)
    }

    /// Parameter names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True when the checkpoint holds no parameters
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Strict loading: the checkpoint must hold exactly `expected` parameters
    pub fn expect_exactly(&self, expected: &[&str]) -> EnhanceResult<()> {
        let missing: Vec<&str> = expected
            .iter()
            .copied()
            .filter(|name| !self.params.contains_key(*name))
            .collect();
        let unexpected: Vec<&str> = self
            .names()
            .filter(|name| !expected.contains(name))
            .collect();

        if missing.is_empty() && unexpected.is_empty() {
            return Ok(());
        }
        Err(EnhanceError::ModelLoadError(format!(
            "parameter mismatch: missing {:?}, unexpected {:?}",
            missing, unexpected
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Checkpoint {
        let mut params = BTreeMap::new();
        params.insert(
            "module.conv.weight".to_string(),
            Tensor::new(vec![3], vec![0.25, 0.5, 0.25]).unwrap(),
        );
        params.insert(
            "module.conv.bias".to_string(),
            Tensor::new(vec![1], vec![0.0]).unwrap(),
        );
        Checkpoint::from_params(params).unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        sample().save(&path).unwrap();

        let loaded = Checkpoint::load(&path).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_missing_checkpoint() {
        let result = Checkpoint::load("/nonexistent/checkpoint.json");
        assert!(matches!(result, Err(EnhanceError::ModelLoadError(_))));
    }

    #[test]
    fn test_corrupt_checkpoint() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"model\": [1, 2").unwrap();
        assert!(matches!(
            Checkpoint::load(&path),
            Err(EnhanceError::ModelLoadError(_))
        ));
    }

    #[test]
    fn test_missing_model_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no_model.json");
        std::fs::write(&path, "{\"optimizer\": {}}").unwrap();
        assert!(matches!(
            Checkpoint::load(&path),
            Err(EnhanceError::ModelLoadError(_))
        ));
    }

    #[test]
    fn test_extra_top_level_keys_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("full.json");
        std::fs::write(
            &path,
            r#"{"step": 1200, "model": {"w": {"shape": [2], "data": [1.0, 2.0]}}}"#,
        )
        .unwrap();
        let loaded = Checkpoint::load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get("w").unwrap().data, vec![1.0, 2.0]);
    }

    #[test]
    fn test_shape_data_mismatch() {
        assert!(Tensor::new(vec![2, 2], vec![1.0; 3]).is_err());

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mismatch.json");
        std::fs::write(
            &path,
            r#"{"model": {"w": {"shape": [4], "data": [1.0]}}}"#,
        )
        .unwrap();
        assert!(Checkpoint::load(&path).is_err());
    }

    #[test]
    fn test_prefix_reconciliation() {
        let loadable = sample().into_loadable();
        let names: Vec<&str> = loadable.names().collect();
        assert_eq!(names, vec!["conv.bias", "conv.weight"]);
        assert!(loadable.expect_exactly(&["conv.weight", "conv.bias"]).is_ok());
    }

    #[test]
    fn test_strict_names() {
        let loadable = sample().into_loadable();
        assert!(loadable.expect_exactly(&["conv.weight"]).is_err());
        assert!(
            loadable
                .expect_exactly(&["conv.weight", "conv.bias", "norm.gain"])
                .is_err()
        );
    }
}
