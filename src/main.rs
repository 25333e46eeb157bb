//! speech-enhance command line interface
//!
//! Exit status: 0 on success, 1 on a fatal error, 2 when the run finished but
//! some items could not be produced.

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use speech_enhance::core::{DEFAULT_LOWPASS_ORDER, DEFAULT_PREEMPHASIS, DEFAULT_SAMPLE_RATE};
use speech_enhance::model::MODEL_NAMES;
use speech_enhance::pipeline::{separate, test_dir, validate};
use speech_enhance::{
    Device, EnhanceError, InferenceRunner, PipelineSettings, RunReport, SeparateConfig, TestDirConfig,
    ValidateConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "speech-enhance")]
#[command(about = "Batched speech enhancement inference", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Device to run the model on (cpu, cuda, cuda:N)
    #[arg(long, global = true, default_value = "cpu")]
    device: Device,

    /// Pre-emphasis coefficient
    #[arg(long, global = true, default_value_t = DEFAULT_PREEMPHASIS)]
    preemphasis: f32,

    /// Butterworth order of the lowpass filter
    #[arg(long, global = true, default_value_t = DEFAULT_LOWPASS_ORDER)]
    lowpass_order: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enhance a single audio file
    Separate {
        /// Input audio file
        #[arg(value_name = "FILE")]
        audio_file: PathBuf,

        /// Output WAV file
        #[arg(value_name = "OUT")]
        out_path: PathBuf,

        /// Model architecture
        #[arg(value_name = "MODEL", value_parser = clap::builder::PossibleValuesParser::new(MODEL_NAMES.iter().copied()))]
        model: String,

        /// Model checkpoint (JSON)
        #[arg(value_name = "CHECKPOINT")]
        checkpoint: PathBuf,

        /// Lowpass cutoff in Hz, 0 disables
        #[arg(short, long, default_value_t = 0)]
        lowpass_freq: u32,

        /// Pipeline sample rate
        #[arg(short, long, default_value_t = DEFAULT_SAMPLE_RATE)]
        sample_rate: u32,
    },

    /// Run over a paired noisy/clean corpus and write noise/pred/clean triples
    Validate {
        /// Corpus root holding noisy/ and clean/
        #[arg(value_name = "DIR")]
        meta_dir: PathBuf,

        /// Output directory
        #[arg(value_name = "OUT_DIR")]
        out_dir: PathBuf,

        /// Model architecture
        #[arg(value_name = "MODEL", value_parser = clap::builder::PossibleValuesParser::new(MODEL_NAMES.iter().copied()))]
        model: String,

        /// Model checkpoint (JSON)
        #[arg(value_name = "CHECKPOINT")]
        checkpoint: PathBuf,

        /// Items per inference batch
        #[arg(short, long, default_value_t = 64)]
        batch_size: usize,

        /// Post-processing threads
        #[arg(short = 'w', long, default_value_t = 16)]
        num_workers: usize,

        /// Pipeline sample rate
        #[arg(short, long, default_value_t = DEFAULT_SAMPLE_RATE)]
        sample_rate: u32,
    },

    /// Enhance every WAV under a directory into a mirrored output tree
    TestDir {
        /// Input directory, searched recursively
        #[arg(value_name = "DIR")]
        in_dir: PathBuf,

        /// Output directory
        #[arg(value_name = "OUT_DIR")]
        out_dir: PathBuf,

        /// Model architecture
        #[arg(value_name = "MODEL", value_parser = clap::builder::PossibleValuesParser::new(MODEL_NAMES.iter().copied()))]
        model: String,

        /// Model checkpoint (JSON)
        #[arg(value_name = "CHECKPOINT")]
        checkpoint: PathBuf,

        /// Pipeline sample rate
        #[arg(short, long, default_value_t = DEFAULT_SAMPLE_RATE)]
        sample_rate: u32,

        /// Post-processing threads
        #[arg(short = 'w', long, default_value_t = 4)]
        num_workers: usize,

        /// Items per inference batch
        #[arg(short, long, default_value_t = 64)]
        batch_size: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    info!("speech-enhance {}", speech_enhance::VERSION);

    match run(cli) {
        Ok(None) => ExitCode::SUCCESS,
        Ok(Some(report)) if report.is_success() => ExitCode::SUCCESS,
        Ok(Some(report)) => {
            warn!("{} item(s) failed:", report.failures.len());
            for failure in &report.failures {
                warn!("  {}: {}", failure.item, failure.error);
            }
            ExitCode::from(2)
        }
        Err(e) => {
            match e.downcast_ref::<EnhanceError>() {
                Some(err) if err.is_fatal() => error!("Startup failed, nothing written: {}", err),
                _ => error!("Run aborted: {}", e),
            }
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<Option<RunReport>, Box<dyn std::error::Error>> {
    let settings = PipelineSettings {
        preemphasis: cli.preemphasis,
        lowpass_order: cli.lowpass_order,
        device: cli.device,
    };

    match cli.command {
        Commands::Separate {
            model,
            checkpoint,
            audio_file,
            out_path,
            lowpass_freq,
            sample_rate,
        } => {
            let config = SeparateConfig {
                audio_file,
                out_path,
                lowpass_freq,
                sample_rate,
                settings,
            };
            config.validate()?;
            let runner = InferenceRunner::load(&model, &checkpoint, config.settings.device)?;
            separate::run(&runner, &config)?;
            Ok(None)
        }
        Commands::Validate {
            model,
            checkpoint,
            meta_dir,
            out_dir,
            batch_size,
            num_workers,
            sample_rate,
        } => {
            let config = ValidateConfig {
                meta_dir,
                out_dir,
                batch_size,
                num_workers,
                sample_rate,
                settings,
            };
            config.validate()?;
            let runner = InferenceRunner::load(&model, &checkpoint, config.settings.device)?;
            Ok(Some(validate::run(&runner, &config)?))
        }
        Commands::TestDir {
            model,
            checkpoint,
            in_dir,
            out_dir,
            sample_rate,
            num_workers,
            batch_size,
        } => {
            let config = TestDirConfig {
                in_dir,
                out_dir,
                sample_rate,
                num_workers,
                batch_size,
                settings,
            };
            config.validate()?;
            let runner = InferenceRunner::load(&model, &checkpoint, config.settings.device)?;
            Ok(Some(test_dir::run(&runner, &config)?))
        }
    }
}
