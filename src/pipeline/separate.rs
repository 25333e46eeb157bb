use crate::batch::collate;
use crate::config::SeparateConfig;
use crate::core::{Emphasized, Waveform};
use crate::decoder;
use crate::error::{EnhanceError, EnhanceResult};
use crate::filter::PreEmphasis;
use crate::model::InferenceRunner;
use crate::processor::{PostProcess, ReconstructTask, Task};
use log::info;
use std::path::PathBuf;

/// Enhance one in-memory waveform: pre-emphasis, a batch of one, inference,
/// then reconstruction through `post`.
pub fn enhance(
    runner: &InferenceRunner,
    emphasis: PreEmphasis,
    waveform: &Waveform,
    post: &PostProcess,
) -> EnhanceResult<Vec<f32>> {
    let (row, length) = infer_single(runner, emphasis.apply(waveform))?;
    post.reconstruct(&row, length)
}

fn infer_single(runner: &InferenceRunner, item: Emphasized) -> EnhanceResult<(Vec<f32>, usize)> {
    let batch = collate(&[item])?;
    runner
        .infer(&batch)?
        .into_rows()
        .into_iter()
        .next()
        .ok_or_else(|| EnhanceError::ShapeError("model returned an empty batch".to_string()))
}

/// Single-file mode: decode, enhance and write one file
pub fn run(runner: &InferenceRunner, config: &SeparateConfig) -> EnhanceResult<PathBuf> {
    let lowpass = config.validate()?;
    let emphasis = config.settings.emphasis()?;

    info!("Loading audio file {}", config.audio_file.display());
    let decoded = decoder::load(&config.audio_file, config.sample_rate)?;

    info!(
        "Inference on {:.2}s of audio with '{}'",
        decoded.waveform.duration().as_secs_f64(),
        runner.model_name()
    );
    let (row, length) = infer_single(runner, emphasis.apply(&decoded.waveform))?;

    let task = ReconstructTask {
        label: config.audio_file.display().to_string(),
        output: row,
        length,
        destination: config.out_path.clone(),
        post: PostProcess::new(emphasis, config.sample_rate).with_lowpass(lowpass),
    };
    task.run()?;

    info!("Finished: {}", config.out_path.display());
    Ok(config.out_path.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::write_wav;
    use crate::model::{Device, IdentityModel};
    use crate::pipeline::test_support::{read_samples, write_tone};
    use tempfile::TempDir;

    fn identity_runner() -> InferenceRunner {
        InferenceRunner::new(Box::new(IdentityModel), Device::Cpu).unwrap()
    }

    #[test]
    fn test_identity_model_reproduces_input_in_memory() {
        let emphasis = PreEmphasis::new(0.97).unwrap();
        let post = PostProcess::new(emphasis, 22050);
        let input = Waveform::new(vec![0.1, 0.2, -0.1, 0.05], 22050).unwrap();

        let out = enhance(&identity_runner(), emphasis, &input, &post).unwrap();
        assert_eq!(out.len(), 4);
        for (a, b) in out.iter().zip(input.samples()) {
            assert!((a - b).abs() < 1e-5, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_identity_model_end_to_end_file() {
        let dir = TempDir::new().unwrap();
        let input_path = dir.path().join("in.wav");
        let input = [0.1, 0.2, -0.1, 0.05];
        write_wav(&input_path, &input, 22050).unwrap();

        let out_path = dir.path().join("out/enhanced.wav");
        let config = SeparateConfig::new(&input_path, &out_path);
        let written = run(&identity_runner(), &config).unwrap();
        assert_eq!(written, out_path);

        let out = read_samples(&out_path);
        assert_eq!(out.len(), input.len());
        for (a, b) in out.iter().zip(input) {
            assert!((a - b).abs() < 1e-5, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_lowpass_keeps_length() {
        let dir = TempDir::new().unwrap();
        let input_path = dir.path().join("tone.wav");
        write_tone(&input_path, 1000, 0.3, 22050);

        let out_path = dir.path().join("tone_lp.wav");
        let mut config = SeparateConfig::new(&input_path, &out_path);
        config.lowpass_freq = 3000;
        run(&identity_runner(), &config).unwrap();

        let out = read_samples(&out_path);
        assert_eq!(out.len(), 1000);
        assert!(out.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn test_unreadable_input() {
        let dir = TempDir::new().unwrap();
        let config = SeparateConfig::new(dir.path().join("missing.wav"), dir.path().join("o.wav"));
        assert!(matches!(
            run(&identity_runner(), &config),
            Err(EnhanceError::DecodeError(_))
        ));
    }
}
