//! Blocking capture from the default input device.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use super::{AudioCaptureError, AudioSource};
use crate::params::CaptureConfig;

/// Longest backlog kept between captures (seconds of audio)
const MAX_BACKLOG_SECS: usize = 1;

/// Samples delivered by the input callback and not yet handed out
#[derive(Default)]
struct Pending {
    samples: Vec<i16>,
    failure: Option<String>,
}

type SharedPending = Arc<(Mutex<Pending>, Condvar)>;

/// Capture source backed by a cpal input stream
pub struct CpalCapture {
    /// Shared between the input callback and `capture`
    pending: SharedPending,

    config: CaptureConfig,

    /// Input stream (kept alive)
    _stream: cpal::Stream,
}

impl CpalCapture {
    /// Open the default input device as interleaved stereo at the configured rate
    pub fn open(config: &CaptureConfig) -> Result<Self, AudioCaptureError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(AudioCaptureError::NoInputDevice)?;

        let supported = device.default_input_config()?;
        let stream_config = cpal::StreamConfig {
            channels: config.channels,
            sample_rate: cpal::SampleRate(config.sample_rate_hz),
            buffer_size: cpal::BufferSize::Default,
        };

        log::info!(
            "Audio input: {} @ {}Hz x{} ({:?})",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            config.sample_rate_hz,
            config.channels,
            supported.sample_format()
        );

        let pending: SharedPending = Arc::new((Mutex::new(Pending::default()), Condvar::new()));
        let one_second = config.sample_rate_hz as usize * usize::from(config.channels);
        let backlog = (one_second * MAX_BACKLOG_SECS).max(2 * config.samples_for(config.capture_ms));

        let stream = match supported.sample_format() {
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &stream_config, Arc::clone(&pending), backlog)?
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &stream_config, Arc::clone(&pending), backlog)?
            }
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &stream_config, Arc::clone(&pending), backlog)?
            }
            other => return Err(AudioCaptureError::UnsupportedFormat(format!("{:?}", other))),
        };

        stream.play()?;

        Ok(Self {
            pending,
            config: config.clone(),
            _stream: stream,
        })
    }
}

impl AudioSource for CpalCapture {
    fn capture(&mut self, duration_ms: u32) -> Result<Vec<i16>, AudioCaptureError> {
        let wanted = self.config.samples_for(duration_ms);
        let wait = Duration::from_millis(
            u64::from(duration_ms) + u64::from(self.config.capture_timeout_ms),
        );

        let (lock, ready) = &*self.pending;
        let mut pending = lock.lock().map_err(|_| AudioCaptureError::Poisoned)?;

        // Start from fresh audio, like reopening the device
        pending.samples.clear();

        let (mut pending, status) = ready
            .wait_timeout_while(pending, wait, |p| {
                p.samples.len() < wanted && p.failure.is_none()
            })
            .map_err(|_| AudioCaptureError::Poisoned)?;

        if let Some(reason) = pending.failure.take() {
            return Err(AudioCaptureError::Stream(reason));
        }
        if status.timed_out() {
            return Err(AudioCaptureError::Timeout {
                wanted,
                received: pending.samples.len(),
            });
        }

        Ok(pending.samples.drain(..wanted).collect())
    }
}

/// Build an input stream converting `T` samples to i16 into the shared backlog
fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    pending: SharedPending,
    backlog: usize,
) -> Result<cpal::Stream, AudioCaptureError>
where
    T: SizedSample + 'static,
    i16: FromSample<T>,
{
    let errors = Arc::clone(&pending);

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let (lock, ready) = &*pending;
            if let Ok(mut p) = lock.lock() {
                p.samples.extend(data.iter().map(|&s| i16::from_sample(s)));
                if p.samples.len() > backlog {
                    let excess = p.samples.len() - backlog;
                    p.samples.drain(..excess);
                }
                ready.notify_all();
            }
        },
        move |err| {
            log::error!("Audio input stream error: {}", err);
            let (lock, ready) = &*errors;
            if let Ok(mut p) = lock.lock() {
                p.failure = Some(err.to_string());
                ready.notify_all();
            }
        },
        None,
    )?;

    Ok(stream)
}
