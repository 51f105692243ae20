use crate::synth::timbre::Timbre;

/// Commands crossing from the control thread to the audio callback.
///
/// Kept `Copy` so pushing into the ring buffer never allocates or drops
/// anything interesting on the audio side.
#[derive(Debug, Copy, Clone)]
pub enum SynthCommand {
    NoteOn {
        /// Pitch in Hz; must be positive to sound.
        frequency: f32,
        /// Requested note length in seconds (timbre tail not included).
        duration: f32,
        timbre: Timbre,
        /// Seconds to wait before the note starts (strum offset).
        delay: f32,
    },
}
