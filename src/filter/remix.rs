use crate::error::{EnhanceError, EnhanceResult};

/// Average interleaved multi-channel samples down to mono
pub fn downmix(interleaved: &[f32], channels: usize) -> EnhanceResult<Vec<f32>> {
    if channels == 0 {
        return Err(EnhanceError::DecodeError(
            "Channel count must be at least 1".to_string(),
        ));
    }
    if interleaved.len() % channels != 0 {
        return Err(EnhanceError::DecodeError(
            "Sample count not divisible by channel count".to_string(),
        ));
    }
    if channels == 1 {
        return Ok(interleaved.to_vec());
    }

    let scale = 1.0 / channels as f32;
    Ok(interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect())
}

/// Clamp every sample into the valid audio range `[-1.0, 1.0]`
pub fn clip(samples: &[f32]) -> Vec<f32> {
    samples.iter().map(|&s| s.clamp(-1.0, 1.0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_stereo() {
        // Create test stereo samples: [L1, R1, L2, R2]
        let output = downmix(&[0.0, 1.0, 0.5, 0.5], 2).unwrap();

        assert_eq!(output.len(), 2);
        assert!((output[0] - 0.5).abs() < 0.001);
        assert!((output[1] - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_downmix_mono_passthrough() {
        assert_eq!(downmix(&[0.2, 0.4], 1).unwrap(), vec![0.2, 0.4]);
    }

    #[test]
    fn test_downmix_invalid_layout() {
        assert!(downmix(&[0.1, 0.2, 0.3], 2).is_err());
        assert!(downmix(&[0.1], 0).is_err());
    }

    #[test]
    fn test_clip_clamps_without_wrapping() {
        let out = clip(&[1.7, -2.5, 0.3, 1.0, -1.0]);
        assert_eq!(out, vec![1.0, -1.0, 0.3, 1.0, -1.0]);
        assert!(out.iter().all(|s| (-1.0..=1.0).contains(s)));
    }
}
