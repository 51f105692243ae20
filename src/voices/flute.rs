//! Flute - blown pipe.
//!
//! A sine carrying the tone, with 5 Hz vibrato swinging the pitch five cents
//! either way, plus a quiet breath layer: white noise through a bandpass
//! centered at twice the note frequency, mixed in at 0.05. One soft envelope
//! shapes the sum: 100 ms attack, sustained body, 200 ms release at the end
//! of the note.

use crate::{
    dsp::envelope::Envelope,
    graph::{
        envelope::EnvNode,
        extensions::NodeExt,
        filter::FilterNode,
        lfo::LfoNode,
        oscillator::{OscNode, OscParam},
        GraphNode,
    },
};

/// Create a flute voice shaped for `duration` seconds.
pub fn flute(duration: f32) -> impl GraphNode {
    let breath_env = Envelope::program()
        .linear(0.5, 0.1)
        .hold(duration - 0.3)
        .linear(0.0, 0.2);

    let tone = OscNode::sine().modulate(LfoNode::sine(5.0), OscParam::Detune, 5.0);
    let breath = OscNode::noise().through(FilterNode::bandpass_tracking(2.0).with_resonance(0.5));

    tone.mix(breath, 1.0, 0.05).amplify(EnvNode::new(breath_env))
}
