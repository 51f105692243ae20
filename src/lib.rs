pub mod analysis; // Pitch detection and tuner lifecycle
pub mod dsp;
pub mod graph; // Composable audio graph nodes
pub mod runtime; // Audio device plumbing (output + capture)
pub mod synth; // Note scheduling, voice lifetime, mixing
pub mod voices; // Instrument timbre graphs

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
