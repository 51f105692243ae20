use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, RingBuffer};
use thiserror::Error;

use crate::analysis::pitch::FRAME_LEN;

/// Room for several analysis frames; the worker drains far faster than the
/// microphone fills.
const CAPTURE_RING_CAPACITY: usize = FRAME_LEN * 8;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device available")]
    NoDevice,
    #[error("failed to read input config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to open input stream: {0}")]
    Stream(#[from] cpal::BuildStreamError),
    #[error("failed to start input stream: {0}")]
    Start(#[from] cpal::PlayStreamError),
    #[error("failed to spawn analysis worker: {0}")]
    Worker(#[from] std::io::Error),
}

/// An open microphone feeding mono samples into a ring buffer.
///
/// The stream and the ring live and die together: dropping the session stops
/// capture and invalidates the producer side, after which the consumer simply
/// runs dry.
pub struct CaptureSession {
    _stream: cpal::Stream,
    sample_rate: f32,
}

impl CaptureSession {
    /// Open the default input device and start capturing.
    pub fn open() -> Result<(Self, Consumer<f32>), CaptureError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;
        let config = device.default_input_config()?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let (mut tx, rx) = RingBuffer::new(CAPTURE_RING_CAPACITY);
        let stream = device.build_input_stream(
            &config.into(),
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                // Mono analysis: channel 0 of each interleaved frame. A full
                // ring drops samples; the next frame recovers.
                for frame in data.chunks(channels.max(1)) {
                    let _ = tx.push(frame[0]);
                }
            },
            |err| log::warn!("capture stream error: {err}"),
            None,
        )?;
        stream.play()?;

        log::debug!("capture session open: {sample_rate} Hz, {channels} channel(s)");
        Ok((
            Self {
                _stream: stream,
                sample_rate,
            },
            rx,
        ))
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}
