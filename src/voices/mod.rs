//! Instrument timbres as ready-to-trigger node graphs.
//!
//! Each module builds the fixed topology for one instrument. A timbre is a
//! set of *layers*; most instruments are a single layer, the piano is three
//! (detuned oscillators with independent envelopes). The engine turns each
//! layer into one voice on the mix bus.
//!
//! Durations are baked into the envelope program at build time because a
//! played note knows its length up front — there is no release gate.

mod flute;
mod guitar;
mod metallophone;
mod piano;

pub use flute::flute;
pub use guitar::guitar;
pub use metallophone::metallophone;
pub use piano::piano;

use crate::graph::GraphNode;
use crate::synth::Timbre;

/// Build the layer graphs for `timbre`, each shaped for `duration` seconds.
///
/// `duration` must already include the timbre tail (see
/// [`Timbre::tail_seconds`]); the engine handles that.
pub fn build(timbre: Timbre, duration: f32) -> Vec<Box<dyn GraphNode>> {
    match timbre {
        Timbre::Metallophone => vec![Box::new(metallophone(duration))],
        Timbre::Piano => piano(duration),
        Timbre::Guitar => vec![Box::new(guitar(duration))],
        Timbre::Flute => vec![Box::new(flute(duration))],
    }
}
