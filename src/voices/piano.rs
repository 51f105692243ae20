//! Piano - hammered string with body resonance.
//!
//! Three layers of the same note:
//!
//!   triangle @  0 cents, peak 0.4   (fundamental)
//!   sine     @ +5 cents, peak 0.3   (body resonance, slightly sharp)
//!   sine     @ -5 cents, peak 0.3   (body resonance, slightly flat)
//!
//! The +-5 cent layers beat against the fundamental a few times per second,
//! which reads as the resonance of a real soundboard. Each layer carries its
//! own hammer envelope: 20 ms linear attack, then an exponential decay to
//! near-silence over the note.

use crate::{
    dsp::{envelope::Envelope, oscillator::Waveform},
    graph::{envelope::EnvNode, extensions::NodeExt, oscillator::OscNode, GraphNode},
};

fn layer(waveform: Waveform, detune_cents: f32, peak: f32, duration: f32) -> Box<dyn GraphNode> {
    let hammer = Envelope::program()
        .linear(peak, 0.02)
        .exponential(0.01, duration - 0.02);

    let osc = match waveform {
        Waveform::Triangle => OscNode::triangle(),
        _ => OscNode::sine(),
    };

    Box::new(osc.with_detune(detune_cents).amplify(EnvNode::new(hammer)))
}

/// Create the three piano layers shaped for `duration` seconds.
pub fn piano(duration: f32) -> Vec<Box<dyn GraphNode>> {
    vec![
        layer(Waveform::Triangle, 0.0, 0.4, duration),
        layer(Waveform::Sine, 5.0, 0.3, duration),
        layer(Waveform::Sine, -5.0, 0.3, duration),
    ]
}
