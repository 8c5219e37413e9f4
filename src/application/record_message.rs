//! Record voice message use case
//!
//! Drives one recorder session against a capture backend. Every
//! mutation of the session happens on a single event loop: user
//! commands, fragment deliveries, and once-per-second ticks arrive on
//! one queue and are processed one event at a time.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::recording::{
    AudioFormat, RecorderPhase, RecorderSession, VoiceNote, DEFAULT_ADVISORY_LIMIT_SECS,
};

use super::ports::{CaptureBackend, CaptureError, CaptureHandle, CapturePrefs, PreviewPlayer};

/// User-initiated recorder commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderCommand {
    Pause,
    Resume,
    Stop,
    TogglePreview,
    Send,
    Cancel,
}

/// Events on the session's single inbound queue
enum SessionEvent {
    Command(RecorderCommand),
    Fragment(Vec<u8>),
    Tick,
}

/// How a recorder session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderOutcome {
    /// The user sent the message; ownership of the note transfers here
    Sent(VoiceNote),
    /// The user cancelled; nothing is emitted
    Cancelled,
}

/// Clonable handle for injecting commands into a running session
#[derive(Clone)]
pub struct RecorderCommands {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl RecorderCommands {
    fn send(&self, command: RecorderCommand) {
        // A closed queue means the session already ended; late
        // commands are dropped, matching idempotent cancel semantics.
        let _ = self.tx.send(SessionEvent::Command(command));
    }

    pub fn pause(&self) {
        self.send(RecorderCommand::Pause);
    }

    pub fn resume(&self) {
        self.send(RecorderCommand::Resume);
    }

    pub fn stop(&self) {
        self.send(RecorderCommand::Stop);
    }

    pub fn toggle_preview(&self) {
        self.send(RecorderCommand::TogglePreview);
    }

    pub fn send_message(&self) {
        self.send(RecorderCommand::Send);
    }

    pub fn cancel(&self) {
        self.send(RecorderCommand::Cancel);
    }
}

/// Callbacks for progress and status updates
#[derive(Default)]
pub struct RecorderCallbacks {
    /// Called once per second of recorded time with the elapsed total
    pub on_tick: Option<Box<dyn Fn(u32) + Send>>,
    /// Called when elapsed time crosses the advisory limit
    pub on_advisory: Option<Box<dyn Fn(u32) + Send>>,
    /// Called when the note is finalized and ready for preview/send
    pub on_ready: Option<Box<dyn Fn(&VoiceNote) + Send>>,
    /// Called with a human-readable message on non-fatal errors
    /// (currently preview playback failures)
    pub on_error: Option<Box<dyn Fn(&str) + Send>>,
}

/// Drives one recorder session from acquisition to send or cancel.
///
/// `start()` may be retried after a failed acquisition (the session
/// stays idle); `run()` then processes events until a terminal
/// transition.
pub struct RecorderDriver<B, P>
where
    B: CaptureBackend,
    P: PreviewPlayer,
{
    backend: B,
    preview: P,
    session: RecorderSession,
    tx: mpsc::UnboundedSender<SessionEvent>,
    rx: mpsc::UnboundedReceiver<SessionEvent>,
    handle: Option<Box<dyn CaptureHandle>>,
    ticker: Option<JoinHandle<()>>,
}

impl<B, P> RecorderDriver<B, P>
where
    B: CaptureBackend,
    P: PreviewPlayer,
{
    /// Create a driver with the default advisory limit
    pub fn new(backend: B, preview: P) -> Self {
        Self::with_advisory_limit(backend, preview, DEFAULT_ADVISORY_LIMIT_SECS as u32)
    }

    /// Create a driver with a custom advisory limit in seconds
    pub fn with_advisory_limit(backend: B, preview: P, advisory_limit_secs: u32) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            backend,
            preview,
            session: RecorderSession::with_advisory_limit(advisory_limit_secs),
            tx,
            rx,
            handle: None,
            ticker: None,
        }
    }

    /// Get a command handle usable from outside the event loop
    pub fn commands(&self) -> RecorderCommands {
        RecorderCommands {
            tx: self.tx.clone(),
        }
    }

    /// Current session phase
    pub fn phase(&self) -> RecorderPhase {
        self.session.phase()
    }

    /// Acquire the microphone and begin recording.
    ///
    /// Fails fast with `CapabilityUnsupported` before any device
    /// access when the runtime cannot capture audio. Acquisition
    /// failures leave the session idle so the user may retry.
    pub async fn start(&mut self) -> Result<(), CaptureError> {
        if self.session.phase() != RecorderPhase::Idle {
            return Err(CaptureError::AcquisitionFailed(
                "a recording session is already active".to_string(),
            ));
        }
        if !self.backend.is_supported() {
            return Err(CaptureError::CapabilityUnsupported);
        }

        let format = AudioFormat::negotiate(|f| self.backend.supports_format(f));

        let sink = {
            let tx = self.tx.clone();
            Arc::new(move |bytes: Vec<u8>| {
                let _ = tx.send(SessionEvent::Fragment(bytes));
            })
        };

        let handle = self.backend.acquire(CapturePrefs::default(), sink).await?;

        self.session
            .begin(format)
            .expect("session was verified idle above");
        self.handle = Some(handle);
        self.start_ticker();
        Ok(())
    }

    /// Process events until the session reaches a terminal transition.
    /// Must be called after a successful `start()`.
    pub async fn run(mut self, callbacks: RecorderCallbacks) -> Result<RecorderOutcome, CaptureError> {
        while let Some(event) = self.rx.recv().await {
            match event {
                SessionEvent::Fragment(bytes) => self.session.push_fragment(bytes),

                SessionEvent::Tick => {
                    if self.session.phase() != RecorderPhase::Recording {
                        continue;
                    }
                    let report = self.session.tick();
                    if let Some(cb) = &callbacks.on_tick {
                        cb(report.elapsed_secs);
                    }
                    if report.advisory_crossed {
                        if let Some(cb) = &callbacks.on_advisory {
                            cb(report.elapsed_secs);
                        }
                    }
                }

                SessionEvent::Command(RecorderCommand::Pause) => {
                    if self.session.pause().is_ok() {
                        if let Some(handle) = &self.handle {
                            handle.pause();
                        }
                        self.stop_ticker();
                    }
                }

                SessionEvent::Command(RecorderCommand::Resume) => {
                    if self.session.resume().is_ok() {
                        if let Some(handle) = &self.handle {
                            handle.resume();
                        }
                        self.start_ticker();
                    }
                }

                SessionEvent::Command(RecorderCommand::Stop) => {
                    if !matches!(
                        self.session.phase(),
                        RecorderPhase::Recording | RecorderPhase::Paused
                    ) {
                        continue;
                    }
                    self.stop_ticker();

                    // Release the device before finalizing; stop()
                    // returns only once capture has ceased.
                    if let Some(mut handle) = self.handle.take() {
                        if let Err(e) = handle.stop().await {
                            self.teardown();
                            return Err(e);
                        }
                    }

                    // Drain fragments flushed during stop so none can
                    // arrive after the artifact is set.
                    while let Ok(pending) = self.rx.try_recv() {
                        if let SessionEvent::Fragment(bytes) = pending {
                            self.session.push_fragment(bytes);
                        }
                    }

                    let backend = &self.backend;
                    self.session
                        .finalize_with(|fragments, format| backend.finalize(fragments, format))
                        .expect("session was verified recording or paused above");

                    if let Some(cb) = &callbacks.on_ready {
                        if let Some(note) = self.session.note() {
                            cb(note);
                        }
                    }
                }

                SessionEvent::Command(RecorderCommand::TogglePreview) => {
                    let Ok(playing) = self.session.toggle_preview() else {
                        continue;
                    };
                    if playing {
                        let note = self
                            .session
                            .note()
                            .expect("ready phase always holds a note");
                        if let Err(e) = self.preview.play(note).await {
                            // Revert the toggle; preview stays off
                            let _ = self.session.toggle_preview();
                            if let Some(cb) = &callbacks.on_error {
                                cb(&e.to_string());
                            }
                        }
                    } else {
                        self.preview.stop();
                    }
                }

                SessionEvent::Command(RecorderCommand::Send) => {
                    if let Ok(note) = self.session.send() {
                        self.preview.stop();
                        return Ok(RecorderOutcome::Sent(note));
                    }
                }

                SessionEvent::Command(RecorderCommand::Cancel) => {
                    self.teardown();
                    return Ok(RecorderOutcome::Cancelled);
                }
            }
        }

        // Queue closed without a terminal command: treat as teardown
        self.teardown();
        Ok(RecorderOutcome::Cancelled)
    }

    /// Exactly one ticking source at a time: starting is a no-op when
    /// a ticker is already running.
    fn start_ticker(&mut self) {
        if self.ticker.is_some() {
            return;
        }
        let tx = self.tx.clone();
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(StdDuration::from_secs(1));
            // The first tick completes immediately; elapsed time
            // starts counting from the next one.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(SessionEvent::Tick).is_err() {
                    break;
                }
            }
        }));
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    /// Best-effort release of every held resource. Safe on every exit
    /// path, including when nothing was ever acquired.
    fn teardown(&mut self) {
        self.stop_ticker();
        if let Some(mut handle) = self.handle.take() {
            handle.release();
        }
        self.preview.stop();
        self.session.cancel();
    }
}
