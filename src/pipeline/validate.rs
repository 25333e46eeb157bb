use super::corpus::PairedCorpus;
use crate::batch::collate;
use crate::config::ValidateConfig;
use crate::core::Emphasized;
use crate::error::{EnhanceError, EnhanceResult};
use crate::model::InferenceRunner;
use crate::processor::{
    OutputKind, OutputPathPlan, PostProcess, RunReport, ValidationTask, WorkerPool,
};
use log::{info, warn};
use std::fs;
use std::time::Instant;

/// Validation mode: run the model over a paired corpus and write
/// `<index>_noise.wav`, `<index>_pred.wav` and `<index>_clean.wav` per item.
///
/// The index of an item is `batch_index * batch_size + position`, fixed by
/// corpus order, so an item that fails to decode leaves a gap rather than
/// shifting the names of its neighbours.
pub fn run(runner: &InferenceRunner, config: &ValidateConfig) -> EnhanceResult<RunReport> {
    config.validate()?;
    let emphasis = config.settings.emphasis()?;
    let corpus = PairedCorpus::open(&config.meta_dir)?;

    fs::create_dir_all(&config.out_dir)
        .map_err(|e| EnhanceError::WriteError(format!("{}: {}", config.out_dir.display(), e)))?;

    let plan = OutputPathPlan::new(&config.out_dir);
    let post = PostProcess::new(emphasis, config.sample_rate);
    let mut pool = WorkerPool::new(config.num_workers)?;
    let mut report = RunReport::default();
    let start = Instant::now();

    info!("Process validation dataset ({} items)", corpus.len());
    for (batch_index, chunk) in corpus.pairs().chunks(config.batch_size).enumerate() {
        let mut indices = Vec::with_capacity(chunk.len());
        let mut noisy: Vec<Emphasized> = Vec::with_capacity(chunk.len());
        let mut clean = Vec::with_capacity(chunk.len());

        for (position, item) in chunk.iter().enumerate() {
            let index = batch_index * config.batch_size + position;
            match corpus.load(item, config.sample_rate) {
                Ok((noisy_wave, clean_wave)) => {
                    indices.push(index);
                    noisy.push(emphasis.apply(&noisy_wave));
                    clean.push(clean_wave.into_samples());
                }
                Err(e) => {
                    warn!("item {} ({}): {}", index, item.name.display(), e);
                    report.record(format!("item {} ({})", index, item.name.display()), Err(e));
                }
            }
        }
        if indices.is_empty() {
            continue;
        }

        let batch = collate(&noisy)?;
        let output = runner.infer(&batch)?;
        info!("Batch {} done", batch_index);

        let inputs = batch.into_rows();
        let preds = output.into_rows();
        for (((index, (noisy_row, length)), (pred_row, _)), clean) in
            indices.into_iter().zip(inputs).zip(preds).zip(clean)
        {
            pool.submit(ValidationTask {
                index,
                noisy: noisy_row,
                pred: pred_row,
                length,
                clean,
                destinations: [
                    plan.indexed(index, OutputKind::Noise),
                    plan.indexed(index, OutputKind::Pred),
                    plan.indexed(index, OutputKind::Clean),
                ],
                post: post.clone(),
            })?;
        }
    }

    report.merge(pool.finish());
    info!(
        "Validation wrote {} of {} items in {:.2?}",
        report.written_items,
        corpus.len(),
        start.elapsed()
    );
    Ok(report)
}
