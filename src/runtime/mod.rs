//! Audio device plumbing.
//!
//! Everything that touches cpal lives here: the output half that carries the
//! synthesizer, and the capture half that feeds the tuner. Both degrade
//! rather than fail — no audio hardware means silent playback and a single
//! recoverable capture error, never a crash.

pub mod capture;
pub mod output;

pub use capture::{CaptureError, CaptureSession};
pub use output::Synth;
