//! Mono sample-rate conversion for the speech models

use crate::{Result, VoicebotError};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

/// Sample rate Whisper expects
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

const CHUNK_FRAMES: usize = 1024;

/// Convert mono audio from `from_rate` to `to_rate`.
///
/// Input is processed in fixed chunks; the last chunk is zero padded and
/// its output trimmed back to the proportional length.
pub fn resample_mono(input: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == 0 || to_rate == 0 {
        return Err(VoicebotError::AudioProcessingError(
            "Sample rates must be greater than 0".into(),
        ));
    }
    if input.is_empty() || from_rate == to_rate {
        return Ok(input.to_vec());
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, CHUNK_FRAMES, 1).map_err(
        |e| VoicebotError::AudioProcessingError(format!("Failed to create resampler: {}", e)),
    )?;

    let mut output = Vec::with_capacity((input.len() as f64 * ratio * 1.1) as usize);
    for chunk in input.chunks(CHUNK_FRAMES) {
        let mut planar = vec![vec![0.0f32; CHUNK_FRAMES]];
        planar[0][..chunk.len()].copy_from_slice(chunk);

        let processed = resampler
            .process(&planar, None)
            .map_err(|e| VoicebotError::AudioProcessingError(format!("Resampling failed: {}", e)))?;

        let produced = &processed[0];
        let keep = if chunk.len() < CHUNK_FRAMES {
            ((chunk.len() as f64) * ratio).ceil() as usize
        } else {
            produced.len()
        };
        output.extend_from_slice(&produced[..keep.min(produced.len())]);
    }

    debug!(
        "Resampled {} samples at {} Hz -> {} samples at {} Hz",
        input.len(),
        from_rate,
        output.len(),
        to_rate
    );
    Ok(output)
}
