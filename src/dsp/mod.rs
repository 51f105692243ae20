//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components are allocation-free after construction and realtime-safe,
//! making them safe to embed directly inside voice structs. They intentionally
//! stay focused on the signal-processing math so graph combinators can layer
//! on orchestration and modulation.

/// Breakpoint envelope programs (linear and exponential ramps).
pub mod envelope;
/// State-variable filter with lowpass and bandpass responses.
pub mod filter;
/// Oscillator waveforms and the white-noise source.
pub mod oscillator;

pub use envelope::EnvelopeState;
