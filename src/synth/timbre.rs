#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The four instrument timbres.
///
/// A closed set: each variant maps to one fixed graph topology in
/// [`crate::voices`]. Immutable per note — changing instrument affects the
/// next note, never a sounding one.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timbre {
    Metallophone,
    Piano,
    Guitar,
    Flute,
}

impl Timbre {
    pub const ALL: [Timbre; 4] = [
        Timbre::Metallophone,
        Timbre::Piano,
        Timbre::Guitar,
        Timbre::Flute,
    ];

    /// Extra ring-out added beyond the requested note duration.
    ///
    /// The guitar fade is written against a one second tail; the others stop
    /// with their envelope.
    pub fn tail_seconds(self) -> f32 {
        match self {
            Timbre::Guitar => 1.0,
            _ => 0.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Timbre::Metallophone => "metallophone",
            Timbre::Piano => "piano",
            Timbre::Guitar => "guitar",
            Timbre::Flute => "flute",
        }
    }
}
