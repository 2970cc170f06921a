use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use level_vision::core_modules::cue::CuePlayer;
use level_vision::error::CueError;
use tracing::{debug, warn};

/// Extra time the stream is kept open after the last sample, so the device can drain.
const DRAIN_MARGIN: Duration = Duration::from_millis(150);

/// A decoded WAV clip, interleaved and normalised to `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
struct Clip {
    samples: Vec<f32>,
    channels: usize,
    sample_rate: u32,
}

impl Clip {
    fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1)
    }

    fn load(path: &Path) -> Result<Self, CueError> {
        let decode_err = |err: hound::Error| CueError::Decode {
            path: path.to_path_buf(),
            reason: err.to_string(),
        };

        let mut reader = hound::WavReader::open(path).map_err(decode_err)?;
        let spec = reader.spec();

        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<Vec<f32>, _>>()
                .map_err(decode_err)?,
            hound::SampleFormat::Int => {
                let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
                match spec.bits_per_sample {
                    8 | 16 => reader
                        .samples::<i16>()
                        .map(|sample| sample.map(|value| f32::from(value) / max))
                        .collect::<Result<Vec<f32>, _>>()
                        .map_err(decode_err)?,
                    24 | 32 => reader
                        .samples::<i32>()
                        .map(|sample| sample.map(|value| value as f32 / max))
                        .collect::<Result<Vec<f32>, _>>()
                        .map_err(decode_err)?,
                    other => {
                        return Err(CueError::Decode {
                            path: path.to_path_buf(),
                            reason: format!("unsupported bits per sample {other}"),
                        });
                    }
                }
            }
        };

        Ok(Self {
            samples,
            channels: usize::from(spec.channels),
            sample_rate: spec.sample_rate,
        })
    }

    /// Re-lays the clip out for a device: nearest-sample rate conversion, and each
    /// output channel takes the matching source channel (or the last one).
    fn render_for_output(&self, channels: usize, sample_rate: u32) -> Vec<f32> {
        if self.channels == 0 || channels == 0 || sample_rate == 0 {
            return Vec::new();
        }
        let source_frames = self.frames();
        let output_frames =
            (source_frames as u64 * u64::from(sample_rate) / u64::from(self.sample_rate.max(1))) as usize;

        let mut output = Vec::with_capacity(output_frames * channels);
        for frame in 0..output_frames {
            let source_frame = (frame as u64 * u64::from(self.sample_rate) / u64::from(sample_rate)) as usize;
            let source_frame = source_frame.min(source_frames.saturating_sub(1));
            for channel in 0..channels {
                let source_channel = channel.min(self.channels - 1);
                output.push(self.samples[source_frame * self.channels + source_channel]);
            }
        }
        output
    }
}

/// Plays WAV cues on the default output device.
#[derive(Debug, Default, Clone, Copy)]
pub struct WavCuePlayer;

impl CuePlayer for WavCuePlayer {
    fn play(&self, path: &Path) -> Result<(), CueError> {
        if !path.is_file() {
            return Err(CueError::MissingAsset { path: path.to_path_buf() });
        }
        let clip = Clip::load(path)?;

        let output_err = |reason: String| CueError::Output { reason };

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| output_err("no default output device".to_string()))?;
        let supported = device
            .default_output_config()
            .map_err(|err| output_err(err.to_string()))?;
        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(output_err(format!(
                "unsupported output sample format {:?}",
                supported.sample_format()
            )));
        }

        let stream_config: cpal::StreamConfig = supported.config();
        let channels = usize::from(stream_config.channels);
        let sample_rate = stream_config.sample_rate.0;
        if channels == 0 || sample_rate == 0 {
            return Err(output_err(format!("device reports {channels} channels at {sample_rate} Hz")));
        }
        let rendered = Arc::new(clip.render_for_output(channels, sample_rate));
        let duration = Duration::from_secs_f64(rendered.len() as f64 / (channels as f64 * f64::from(sample_rate)));

        let position = Arc::new(AtomicUsize::new(0));
        let callback_samples = Arc::clone(&rendered);
        let callback_position = Arc::clone(&position);

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let start = callback_position.load(Ordering::Relaxed);
                    for (offset, slot) in data.iter_mut().enumerate() {
                        *slot = callback_samples.get(start + offset).copied().unwrap_or(0.0);
                    }
                    callback_position.store(start + data.len(), Ordering::Relaxed);
                },
                |err| warn!(error = %err, "cue output stream error"),
                None,
            )
            .map_err(|err| output_err(err.to_string()))?;
        stream.play().map_err(|err| output_err(err.to_string()))?;

        debug!(path = %path.display(), ?duration, "playing cue");
        std::thread::sleep(duration + DRAIN_MARGIN);
        Ok(())
    }
}
