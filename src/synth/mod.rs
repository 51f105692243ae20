// Purpose: note scheduling, voice lifetime, and mixing
// This layer sits above graph nodes and below the audio device.

pub mod engine;
pub mod message;
pub mod timbre;
pub mod voice;

pub use engine::SynthEngine;
pub use message::SynthCommand;
pub use timbre::Timbre;

use rand::Rng;

/// Gap between successive chord notes.
pub const STRUM_INTERVAL: f32 = 0.05;
/// Upper bound on the random per-note strum offset.
pub const STRUM_JITTER_MAX: f32 = 0.01;
/// Chord notes ring longer than single notes.
pub const CHORD_NOTE_DURATION: f32 = 3.5;
/// Fixed gain on the output bus.
pub const MASTER_GAIN: f32 = 0.5;

/// Start offsets for an N-note strum, in seconds.
///
/// Note i starts at `i * STRUM_INTERVAL` plus a small random push, so the
/// strum lands like a hand rather than a sequencer. The interval always
/// exceeds the jitter bound, so offsets are strictly increasing and string
/// order is preserved.
pub fn strum_offsets(count: usize, rng: &mut impl Rng) -> Vec<f32> {
    (0..count)
        .map(|i| i as f32 * STRUM_INTERVAL + rng.random_range(0.0..STRUM_JITTER_MAX))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn strum_offsets_are_strictly_increasing() {
        let mut rng = SmallRng::seed_from_u64(7);

        for count in [1usize, 2, 6, 12] {
            let offsets = strum_offsets(count, &mut rng);
            assert_eq!(offsets.len(), count);
            for pair in offsets.windows(2) {
                assert!(pair[1] > pair[0], "offsets must preserve string order");
            }
        }
    }

    #[test]
    fn strum_offsets_stay_within_jitter_bound() {
        let mut rng = SmallRng::seed_from_u64(42);
        let offsets = strum_offsets(8, &mut rng);

        for (i, &offset) in offsets.iter().enumerate() {
            let nominal = i as f32 * STRUM_INTERVAL;
            assert!(offset >= nominal, "jitter is always a positive push");
            assert!(
                offset < nominal + STRUM_JITTER_MAX,
                "note {i} drifted {}s past its slot",
                offset - nominal
            );
        }
    }
}
