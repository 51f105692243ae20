//! Live pitch detection: frame analysis, note mapping, and the tuner
//! lifecycle that drives them from a microphone.

/// Frequency to pitch-class/cents mapping.
pub mod note;
/// Autocorrelation fundamental-frequency estimator.
pub mod pitch;
/// Start/stop lifecycle around the capture device and analysis loop.
pub mod tuner;

pub use note::{PitchClass, TunerReading};
pub use pitch::{PitchDetector, FRAME_LEN};
pub use tuner::{AnalysisTask, TunerController, TunerState};
