use super::discover_wavs;
use crate::batch::collate;
use crate::config::TestDirConfig;
use crate::core::Emphasized;
use crate::decoder;
use crate::error::{EnhanceError, EnhanceResult};
use crate::model::InferenceRunner;
use crate::processor::{OutputPathPlan, PostProcess, ReconstructTask, RunReport, WorkerPool};
use log::{info, warn};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Directory mode: enhance every WAV under `in_dir` into the same relative
/// path under `out_dir`. Per-item failures end up in the report; only
/// configuration, model and inference errors abort the run.
pub fn run(runner: &InferenceRunner, config: &TestDirConfig) -> EnhanceResult<RunReport> {
    config.validate()?;
    let emphasis = config.settings.emphasis()?;

    info!("Lookup wave files in {}", config.in_dir.display());
    let files = discover_wavs(&config.in_dir)?;
    info!("Found {} files", files.len());

    fs::create_dir_all(&config.out_dir)
        .map_err(|e| EnhanceError::WriteError(format!("{}: {}", config.out_dir.display(), e)))?;

    let plan = OutputPathPlan::new(&config.out_dir);
    let post = PostProcess::new(emphasis, config.sample_rate);
    let mut pool = WorkerPool::new(config.num_workers)?;
    let mut report = RunReport::default();
    let start = Instant::now();

    for (batch_index, chunk) in files.chunks(config.batch_size).enumerate() {
        let mut paths: Vec<&PathBuf> = Vec::with_capacity(chunk.len());
        let mut items: Vec<Emphasized> = Vec::with_capacity(chunk.len());
        for path in chunk {
            match decoder::load(path, config.sample_rate) {
                Ok(decoded) => {
                    paths.push(path);
                    items.push(emphasis.apply(&decoded.waveform));
                }
                Err(e) => {
                    warn!("{}: {}", path.display(), e);
                    report.record(path.display().to_string(), Err(e));
                }
            }
        }
        if items.is_empty() {
            continue;
        }

        let batch = collate(&items)?;
        let (rows, cols) = batch.shape();
        info!("Batch {}: {} x {} samples", batch_index, rows, cols);
        let output = runner.infer(&batch)?;

        for (path, (row, length)) in paths.into_iter().zip(output.into_rows()) {
            let label = path.display().to_string();
            let destination = match plan.mirror(&config.in_dir, path) {
                Ok(destination) => destination,
                Err(e) => {
                    report.record(label, Err(e));
                    continue;
                }
            };
            pool.submit(ReconstructTask {
                label,
                output: row,
                length,
                destination,
                post: post.clone(),
            })?;
        }
    }

    report.merge(pool.finish());
    info!(
        "Wrote {} of {} files in {:.2?}",
        report.written_items,
        files.len(),
        start.elapsed()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Device, IdentityModel};
    use crate::pipeline::test_support::{read_samples, write_tone};
    use std::path::Path;
    use tempfile::TempDir;

    fn identity_runner() -> InferenceRunner {
        InferenceRunner::new(Box::new(IdentityModel), Device::Cpu).unwrap()
    }

    fn populate(in_dir: &Path) {
        write_tone(&in_dir.join("a.wav"), 120, 0.2, 22050);
        write_tone(&in_dir.join("b.wav"), 80, 0.2, 22050);
        write_tone(&in_dir.join("spk/c.wav"), 200, 0.2, 22050);
        write_tone(&in_dir.join("spk/deep/d.wav"), 50, 0.2, 22050);
    }

    fn config(in_dir: &Path, out_dir: &Path) -> TestDirConfig {
        let mut config = TestDirConfig::new(in_dir, out_dir);
        config.batch_size = 3;
        config.num_workers = 2;
        config
    }

    #[test]
    fn test_mirrors_tree_and_lengths() {
        let dir = TempDir::new().unwrap();
        let in_dir = dir.path().join("in");
        let out_dir = dir.path().join("out");
        populate(&in_dir);

        let report = run(&identity_runner(), &config(&in_dir, &out_dir)).unwrap();
        assert!(report.is_success());
        assert_eq!(report.written_items, 4);

        for (name, len) in [("a.wav", 120), ("b.wav", 80), ("spk/c.wav", 200), ("spk/deep/d.wav", 50)] {
            let out = read_samples(&out_dir.join(name));
            assert_eq!(out.len(), len, "{}", name);
            let input = read_samples(&in_dir.join(name));
            for (a, b) in out.iter().zip(&input) {
                assert!((a - b).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_rerun_overwrites_identically() {
        let dir = TempDir::new().unwrap();
        let in_dir = dir.path().join("in");
        let out_dir = dir.path().join("out");
        populate(&in_dir);
        let config = config(&in_dir, &out_dir);

        run(&identity_runner(), &config).unwrap();
        let first = read_samples(&out_dir.join("spk/c.wav"));
        let report = run(&identity_runner(), &config).unwrap();
        assert!(report.is_success());
        assert_eq!(read_samples(&out_dir.join("spk/c.wav")), first);
    }

    #[test]
    fn test_unwritable_item_does_not_stop_others() {
        let dir = TempDir::new().unwrap();
        let in_dir = dir.path().join("in");
        let out_dir = dir.path().join("out");
        populate(&in_dir);
        // a plain file where spk/deep/ should be created
        fs::create_dir_all(out_dir.join("spk")).unwrap();
        fs::write(out_dir.join("spk/deep"), b"not a directory").unwrap();

        let report = run(&identity_runner(), &config(&in_dir, &out_dir)).unwrap();
        assert_eq!(report.written_items, 3);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].item.ends_with("d.wav"));
        assert!(matches!(report.failures[0].error, EnhanceError::WriteError(_)));
        assert!(out_dir.join("spk/c.wav").is_file());
    }

    #[test]
    fn test_undecodable_item_is_reported() {
        let dir = TempDir::new().unwrap();
        let in_dir = dir.path().join("in");
        let out_dir = dir.path().join("out");
        populate(&in_dir);
        fs::write(in_dir.join("broken.wav"), b"definitely not RIFF").unwrap();

        let report = run(&identity_runner(), &config(&in_dir, &out_dir)).unwrap();
        assert_eq!(report.written_items, 4);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].error, EnhanceError::DecodeError(_)));
        assert!(!out_dir.join("broken.wav").exists());
    }

    #[test]
    fn test_missing_input_dir_is_fatal() {
        let dir = TempDir::new().unwrap();
        let result = run(
            &identity_runner(),
            &config(&dir.path().join("nope"), &dir.path().join("out")),
        );
        assert!(matches!(result, Err(EnhanceError::ConfigError(_))));
    }
}
