use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rtrb::{Consumer, Producer, RingBuffer};
use thiserror::Error;

use crate::{
    synth::{
        strum_offsets, SynthCommand, SynthEngine, Timbre, CHORD_NOTE_DURATION,
    },
    MAX_BLOCK_SIZE,
};

/// Commands queued ahead of the audio callback; a strummed twelve-string is
/// twelve commands, so this is generous.
const COMMAND_QUEUE_SIZE: usize = 256;

/// Samples mirrored for visualization (a few UI frames worth).
const SCOPE_RING_CAPACITY: usize = MAX_BLOCK_SIZE * 4;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("no output device available")]
    NoDevice,
    #[error("failed to read output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to open output stream: {0}")]
    Stream(#[from] cpal::BuildStreamError),
}

/// Control-side synthesizer: the object the UI talks to.
///
/// Owns the output stream and the command producer; the engine itself lives
/// inside the audio callback. Construction never fails — without an output
/// device the synth runs in silent mode, where every play operation is a
/// cheap no-op. Platforms that start streams suspended get a resume attempt
/// before every note; if that fails too, the note is dropped silently.
pub struct Synth {
    stream: Option<cpal::Stream>,
    tx: Option<Producer<SynthCommand>>,
    scope_rx: Option<Consumer<f32>>,
    sample_rate: f32,
    rng: SmallRng,
}

impl Synth {
    pub fn new() -> Self {
        match Self::open_device() {
            Ok(synth) => synth,
            Err(err) => {
                log::warn!("audio output unavailable, running silent: {err}");
                Self {
                    stream: None,
                    tx: None,
                    scope_rx: None,
                    sample_rate: 44_100.0,
                    rng: SmallRng::from_os_rng(),
                }
            }
        }
    }

    fn open_device() -> Result<Self, OutputError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(OutputError::NoDevice)?;
        let config = device.default_output_config()?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let (tx, rx) = RingBuffer::new(COMMAND_QUEUE_SIZE);
        let (scope_tx, scope_rx) = RingBuffer::new(SCOPE_RING_CAPACITY);
        let mut engine = SynthEngine::new(sample_rate, rx).with_scope(scope_tx);
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let total_frames = data.len() / channels;
                let mut written = 0;

                while written < total_frames {
                    let frames = (total_frames - written).min(MAX_BLOCK_SIZE);
                    let block = &mut render_buf[..frames];
                    engine.render_block(block);

                    // Mono to all channels
                    let offset = written * channels;
                    for (i, &sample) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[offset + i * channels + ch] = sample;
                        }
                    }
                    written += frames;
                }
            },
            |err| log::warn!("output stream error: {err}"),
            None,
        )?;

        log::debug!("output device open: {sample_rate} Hz, {channels} channel(s)");
        Ok(Self {
            stream: Some(stream),
            tx: Some(tx),
            scope_rx: Some(scope_rx),
            sample_rate,
            rng: SmallRng::from_os_rng(),
        })
    }

    /// Ask a suspended stream to run. Failure is non-fatal: the play call
    /// that triggered the resume is dropped and the next one retries.
    pub fn resume(&self) {
        if let Some(stream) = &self.stream {
            if let Err(err) = stream.play() {
                log::debug!("output resume failed: {err}");
            }
        }
    }

    /// Play one note. Non-positive frequencies are no-ops; so is silent mode.
    pub fn play_note(&mut self, frequency: f32, duration: f32, timbre: Timbre) {
        if frequency <= 0.0 {
            return;
        }
        self.resume();
        self.send(SynthCommand::NoteOn {
            frequency,
            duration,
            timbre,
            delay: 0.0,
        });
    }

    /// Strum a chord: one note per frequency, staggered in index order.
    pub fn play_chord(&mut self, frequencies: &[f32], timbre: Timbre) {
        if frequencies.is_empty() {
            return;
        }
        self.resume();

        let offsets = strum_offsets(frequencies.len(), &mut self.rng);
        for (&frequency, &delay) in frequencies.iter().zip(&offsets) {
            if frequency <= 0.0 {
                continue;
            }
            self.send(SynthCommand::NoteOn {
                frequency,
                duration: CHORD_NOTE_DURATION,
                timbre,
                delay,
            });
        }
    }

    fn send(&mut self, command: SynthCommand) {
        if let Some(tx) = &mut self.tx {
            // Full queue means a wildly fast caller; dropping is glitch-free.
            let _ = tx.push(command);
        }
    }

    /// Take the visualization tap (rendered output samples). Yields `None` in
    /// silent mode or when already taken.
    pub fn take_scope(&mut self) -> Option<Consumer<f32>> {
        self.scope_rx.take()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// True when no output device could be opened.
    pub fn is_silent(&self) -> bool {
        self.stream.is_none()
    }
}

impl Default for Synth {
    fn default() -> Self {
        Self::new()
    }
}
