//! Guitar - plucked string.
//!
//! A sawtooth (all harmonics, like a fresh pluck) through a lowpass whose
//! cutoff falls from 6x the note frequency down to the fundamental within
//! 300 ms - the string losing its brightness. The amplitude envelope has a
//! fast attack, a body decay to 0.1 by half a second, then a long linear fade
//! across the remaining duration (the engine extends guitar notes by a one
//! second tail for that fade).

use crate::{
    dsp::envelope::Envelope,
    graph::{envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode, GraphNode},
};

/// Create a guitar voice shaped for `duration` seconds (tail included).
pub fn guitar(duration: f32) -> impl GraphNode {
    let pluck = Envelope::program()
        .linear(0.5, 0.015)
        .exponential(0.1, 0.485)
        .linear(0.0, duration - 0.5);

    let damping = FilterNode::lowpass_tracking(6.0).sweep_to(1.0, 0.3);

    OscNode::sawtooth()
        .through(damping)
        .amplify(EnvNode::new(pluck))
}
