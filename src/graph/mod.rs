//! Composable building blocks for constructing per-note audio graphs.
//!
//! Graph nodes wrap the low-level DSP primitives with what instrument design
//! needs: trigger events, modulation, and block-based rendering. The
//! `extensions` module adds fluent helpers so a timbre can be authored as a
//! single chainable expression.

/// Multiply two signals together (envelope application).
pub mod amplify;
/// Envelope program node.
pub mod envelope;
/// Fluent combinators (`.amplify()`, `.through()`, `.mix()`, `.modulate()`).
pub mod extensions;
/// Filter node with an optional cutoff sweep.
pub mod filter;
/// Low frequency oscillators for parameter modulation.
pub mod lfo;
/// Weighted parallel layering of two graphs.
pub mod mix;
/// Connect modulation sources to node parameters.
pub mod modulate;
/// Core traits shared by all graph nodes.
pub mod node;
/// Audio-band oscillators and the noise source.
pub mod oscillator;
/// Serial chaining of two nodes (source into effect).
pub mod through;

pub use extensions::NodeExt;
pub use node::{GraphNode, RenderCtx};
