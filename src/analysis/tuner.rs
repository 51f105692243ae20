use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rtrb::Consumer;

use crate::analysis::note::TunerReading;
use crate::analysis::pitch::{PitchDetector, FRAME_LEN};
use crate::runtime::capture::{CaptureError, CaptureSession};

/// How often the analysis worker wakes to look for a completed frame.
/// Display-refresh rate; a 2048-sample frame at 44.1 kHz arrives every ~46 ms
/// anyway, so polling faster buys nothing.
const ANALYSIS_TICK: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunerState {
    Idle,
    Listening,
}

/// One step of the analysis loop, separated from the device and the thread so
/// it can be driven directly in tests.
///
/// Assembles fixed-size frames from the capture ring and runs the detector on
/// each completed frame.
pub struct AnalysisTask {
    rx: Consumer<f32>,
    detector: PitchDetector,
    frame: Vec<f32>,
    filled: usize,
}

impl AnalysisTask {
    pub fn new(rx: Consumer<f32>, sample_rate: f32) -> Self {
        Self {
            rx,
            detector: PitchDetector::new(sample_rate),
            frame: vec![0.0; FRAME_LEN],
            filled: 0,
        }
    }

    /// Pull samples until a frame completes, then analyze it.
    ///
    /// Returns `None` while the frame is still filling. Returns
    /// `Some(display)` once a frame was analyzed, where `display` is the new
    /// reading or `None` for no-signal (the display resets to neutral rather
    /// than holding a stale note).
    pub fn poll(&mut self) -> Option<Option<TunerReading>> {
        while self.filled < FRAME_LEN {
            match self.rx.pop() {
                Ok(sample) => {
                    self.frame[self.filled] = sample;
                    self.filled += 1;
                }
                Err(_) => return None,
            }
        }
        self.filled = 0;

        let estimate = self.detector.estimate(&self.frame);
        Some(estimate.map(TunerReading::from_frequency))
    }
}

/// Drives the microphone-to-display loop: `Idle -> Listening -> Idle`.
///
/// While Listening it exclusively owns the capture session (microphone stream
/// plus its sample ring) and a worker thread running [`AnalysisTask`]; all
/// three are released together by `stop()`. Only the latest reading is
/// retained — per-frame outcomes are absorbed here and never surface as
/// errors.
pub struct TunerController {
    state: TunerState,
    session: Option<CaptureSession>,
    worker: Option<JoinHandle<()>>,
    stop_flag: Arc<AtomicBool>,
    reading: Arc<Mutex<Option<TunerReading>>>,
}

impl TunerController {
    pub fn new() -> Self {
        Self {
            state: TunerState::Idle,
            session: None,
            worker: None,
            stop_flag: Arc::new(AtomicBool::new(false)),
            reading: Arc::new(Mutex::new(None)),
        }
    }

    /// Open the microphone and begin the analysis loop.
    ///
    /// A no-op when already Listening (never a second session). On failure
    /// the controller stays Idle with nothing half-initialized; the error
    /// surfaces exactly once, to this caller.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.state == TunerState::Listening {
            return Ok(());
        }

        let (session, rx) = CaptureSession::open()?;
        let sample_rate = session.sample_rate();

        let stop_flag = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop_flag);
        let reading = Arc::clone(&self.reading);

        let worker = thread::Builder::new()
            .name("aula-tuner".into())
            .spawn(move || {
                let mut task = AnalysisTask::new(rx, sample_rate);
                while !flag.load(Ordering::Relaxed) {
                    while let Some(display) = task.poll() {
                        *reading.lock().unwrap() = display;
                    }
                    thread::sleep(ANALYSIS_TICK);
                }
            })?;

        self.session = Some(session);
        self.worker = Some(worker);
        self.stop_flag = stop_flag;
        self.state = TunerState::Listening;
        log::info!("tuner listening at {sample_rate} Hz");
        Ok(())
    }

    /// Cancel the analysis loop and release the microphone.
    ///
    /// Idempotent: safe to call when already Idle. Resets the display to
    /// neutral.
    pub fn stop(&mut self) {
        if self.state == TunerState::Idle {
            return;
        }

        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        // Dropping the session stops the stream and frees the ring.
        self.session = None;
        *self.reading.lock().unwrap() = None;
        self.state = TunerState::Idle;
        log::info!("tuner stopped");
    }

    /// Latest display value; `None` is the neutral no-signal state.
    pub fn reading(&self) -> Option<TunerReading> {
        *self.reading.lock().unwrap()
    }

    pub fn state(&self) -> TunerState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == TunerState::Listening
    }
}

impl Default for TunerController {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TunerController {
    fn drop(&mut self) {
        self.stop();
    }
}
