//! Metallophone - struck metal bar.
//!
//! A single pure sine with a near-instant attack and a long exponential ring:
//! hit hard, then let the bar lose energy on its own. No filter; the sine has
//! no harmonics to shape.

use crate::{
    dsp::envelope::Envelope,
    graph::{envelope::EnvNode, extensions::NodeExt, oscillator::OscNode, GraphNode},
};

/// Create a metallophone voice shaped for `duration` seconds.
pub fn metallophone(duration: f32) -> impl GraphNode {
    let strike = Envelope::program()
        .linear(0.6, 0.005)
        .exponential(0.001, duration - 0.005);

    OscNode::sine().amplify(EnvNode::new(strike))
}
