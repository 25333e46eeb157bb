use super::{Decoded, Decoder};
use crate::core::Waveform;
use crate::error::{EnhanceError, EnhanceResult};
use crate::filter::{Filter, Resample, downmix};
use log::debug;
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Symphonia-based decoder producing mono f32 audio
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    /// Decode every packet of the first audio track into interleaved samples
    fn read_interleaved(path: &Path) -> EnhanceResult<(Vec<f32>, usize, u32)> {
        let file = File::open(path)
            .map_err(|e| EnhanceError::DecodeError(format!("{}: {}", path.display(), e)))?;

        // Create media source stream
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // Probe the file to detect format
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| EnhanceError::DecodeError(format!("{}: {}", path.display(), e)))?;

        let mut reader = probed.format;

        // Find the first audio track
        let track = reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| {
                EnhanceError::DecodeError(format!("{}: no audio track found", path.display()))
            })?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let sample_rate = codec_params.sample_rate.ok_or_else(|| {
            EnhanceError::DecodeError(format!("{}: unknown sample rate", path.display()))
        })?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| EnhanceError::DecodeError(format!("{}: {}", path.display(), e)))?;

        let mut interleaved = Vec::new();
        let mut channels = codec_params.channels.map(|c| c.count()).unwrap_or(1);

        loop {
            let packet = match reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => {
                    return Err(EnhanceError::DecodeError(format!(
                        "{}: {}",
                        path.display(),
                        e
                    )));
                }
            };

            // Only process packets from our audio track
            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    channels = spec.channels.count();
                    let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                    buf.copy_interleaved_ref(decoded);
                    interleaved.extend_from_slice(buf.samples());
                }
                Err(SymphoniaError::DecodeError(e)) => {
                    // Skip corrupt packets and try the next one
                    debug!("{}: skipping undecodable packet: {}", path.display(), e);
                    continue;
                }
                Err(e) => {
                    return Err(EnhanceError::DecodeError(format!(
                        "{}: {}",
                        path.display(),
                        e
                    )));
                }
            }
        }

        Ok((interleaved, channels, sample_rate))
    }
}

impl Decoder for SymphoniaDecoder {
    fn decode(&self, path: &Path, target_rate: u32) -> EnhanceResult<Decoded> {
        let (interleaved, channels, source_rate) = Self::read_interleaved(path)?;

        let mono = downmix(&interleaved, channels)
            .map_err(|e| EnhanceError::DecodeError(format!("{}: {}", path.display(), e)))?;
        if mono.is_empty() {
            return Err(EnhanceError::DecodeError(format!(
                "{}: no audio samples",
                path.display()
            )));
        }

        let samples = Resample::new(source_rate, target_rate)?.process(&mono)?;
        debug!(
            "Decoded {} ({} ch, {} Hz -> {} Hz, {} samples)",
            path.display(),
            channels,
            source_rate,
            target_rate,
            samples.len()
        );

        Ok(Decoded {
            waveform: Waveform::new(samples, target_rate)?,
            source_rate,
        })
    }
}
