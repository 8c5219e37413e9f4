//! Recorder session state machine

use std::fmt;
use thiserror::Error;

use super::duration::DEFAULT_ADVISORY_LIMIT_SECS;
use super::format::AudioFormat;
use super::voice_note::VoiceNote;

/// Recorder phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecorderPhase {
    #[default]
    Idle,
    Recording,
    Paused,
    Ready,
    Closed,
}

impl RecorderPhase {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Paused => "paused",
            Self::Ready => "ready",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for RecorderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid phase transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid recorder transition: cannot {action} while in {phase} phase")]
pub struct InvalidTransition {
    pub phase: RecorderPhase,
    pub action: String,
}

/// Result of a tick while recording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Elapsed whole seconds after this tick
    pub elapsed_secs: u32,
    /// True exactly on the tick that crosses the advisory limit
    pub advisory_crossed: bool,
}

/// Recorder session entity.
/// One per voice message; all mutation happens one event at a time.
///
/// Phase machine:
///   IDLE -> RECORDING (begin)
///   RECORDING <-> PAUSED (pause / resume)
///   RECORDING | PAUSED -> READY (finalize, exactly once)
///   READY -> CLOSED (send)
///   any -> CLOSED (cancel, idempotent)
#[derive(Debug)]
pub struct RecorderSession {
    phase: RecorderPhase,
    elapsed_secs: u32,
    fragments: Vec<Vec<u8>>,
    format: AudioFormat,
    note: Option<VoiceNote>,
    preview_playing: bool,
    advisory_limit_secs: u32,
}

impl RecorderSession {
    /// Create a new session in the idle phase with the default advisory limit
    pub fn new() -> Self {
        Self::with_advisory_limit(DEFAULT_ADVISORY_LIMIT_SECS as u32)
    }

    /// Create a new session with a custom advisory limit in seconds
    pub fn with_advisory_limit(advisory_limit_secs: u32) -> Self {
        Self {
            phase: RecorderPhase::Idle,
            elapsed_secs: 0,
            fragments: Vec::new(),
            format: AudioFormat::default(),
            note: None,
            preview_playing: false,
            advisory_limit_secs,
        }
    }

    /// Get the current phase
    pub fn phase(&self) -> RecorderPhase {
        self.phase
    }

    /// Elapsed whole seconds of recorded time (frozen while paused)
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// Negotiated encoding format (meaningful once recording began)
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Number of accumulated fragments
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// The finalized note, present only in the ready phase
    pub fn note(&self) -> Option<&VoiceNote> {
        self.note.as_ref()
    }

    /// Whether preview playback is active (ready phase only)
    pub fn preview_playing(&self) -> bool {
        self.preview_playing
    }

    /// Whether elapsed time has reached the advisory limit
    pub fn over_advisory(&self) -> bool {
        self.elapsed_secs >= self.advisory_limit_secs
    }

    /// Transition from IDLE to RECORDING with the negotiated format
    pub fn begin(&mut self, format: AudioFormat) -> Result<(), InvalidTransition> {
        if self.phase != RecorderPhase::Idle {
            return Err(self.invalid("begin recording"));
        }
        self.format = format;
        self.phase = RecorderPhase::Recording;
        Ok(())
    }

    /// Append a captured fragment.
    /// Accepted only while recording; zero-length fragments and
    /// stragglers delivered in any other phase are dropped.
    pub fn push_fragment(&mut self, bytes: Vec<u8>) {
        if self.phase == RecorderPhase::Recording && !bytes.is_empty() {
            self.fragments.push(bytes);
        }
    }

    /// Advance elapsed time by one second.
    /// A no-op outside the recording phase: ticks arriving around a
    /// pause must never move the frozen value.
    pub fn tick(&mut self) -> TickReport {
        if self.phase == RecorderPhase::Recording {
            self.elapsed_secs += 1;
        }
        TickReport {
            elapsed_secs: self.elapsed_secs,
            advisory_crossed: self.phase == RecorderPhase::Recording
                && self.elapsed_secs == self.advisory_limit_secs,
        }
    }

    /// Transition from RECORDING to PAUSED
    pub fn pause(&mut self) -> Result<(), InvalidTransition> {
        if self.phase != RecorderPhase::Recording {
            return Err(self.invalid("pause"));
        }
        self.phase = RecorderPhase::Paused;
        Ok(())
    }

    /// Transition from PAUSED back to RECORDING
    pub fn resume(&mut self) -> Result<(), InvalidTransition> {
        if self.phase != RecorderPhase::Paused {
            return Err(self.invalid("resume"));
        }
        self.phase = RecorderPhase::Recording;
        Ok(())
    }

    /// Transition from RECORDING or PAUSED to READY, producing the note
    /// through the given finalizer. Set exactly once per session: a
    /// second call fails with an invalid transition.
    pub fn finalize_with<F>(&mut self, finalizer: F) -> Result<&VoiceNote, InvalidTransition>
    where
        F: FnOnce(Vec<Vec<u8>>, AudioFormat) -> VoiceNote,
    {
        if self.phase != RecorderPhase::Recording && self.phase != RecorderPhase::Paused {
            return Err(self.invalid("finalize"));
        }
        let fragments = std::mem::take(&mut self.fragments);
        self.note = Some(finalizer(fragments, self.format));
        self.phase = RecorderPhase::Ready;
        self.preview_playing = false;
        Ok(self.note.as_ref().expect("note was just set"))
    }

    /// Finalize by concatenating fragments into one payload tagged with
    /// the negotiated format.
    pub fn finalize(&mut self) -> Result<&VoiceNote, InvalidTransition> {
        self.finalize_with(VoiceNote::from_fragments)
    }

    /// Toggle preview playback in the READY phase.
    /// Returns the new playing state.
    pub fn toggle_preview(&mut self) -> Result<bool, InvalidTransition> {
        if self.phase != RecorderPhase::Ready {
            return Err(self.invalid("toggle preview"));
        }
        self.preview_playing = !self.preview_playing;
        Ok(self.preview_playing)
    }

    /// Transition from READY to CLOSED, handing the note to the caller.
    /// Ownership of the artifact transfers here.
    pub fn send(&mut self) -> Result<VoiceNote, InvalidTransition> {
        if self.phase != RecorderPhase::Ready {
            return Err(self.invalid("send"));
        }
        let note = self.note.take().expect("ready phase always holds a note");
        self.preview_playing = false;
        self.phase = RecorderPhase::Closed;
        Ok(note)
    }

    /// Close the session from any phase, discarding everything.
    /// Idempotent and infallible, including on a never-started session.
    pub fn cancel(&mut self) {
        self.fragments.clear();
        self.note = None;
        self.preview_playing = false;
        self.phase = RecorderPhase::Closed;
    }

    fn invalid(&self, action: &str) -> InvalidTransition {
        InvalidTransition {
            phase: self.phase,
            action: action.to_string(),
        }
    }
}

impl Default for RecorderSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_session() -> RecorderSession {
        let mut session = RecorderSession::new();
        session.begin(AudioFormat::Webm).unwrap();
        session
    }

    #[test]
    fn new_session_is_idle() {
        let session = RecorderSession::new();
        assert_eq!(session.phase(), RecorderPhase::Idle);
        assert_eq!(session.elapsed_secs(), 0);
        assert_eq!(session.fragment_count(), 0);
        assert!(session.note().is_none());
    }

    #[test]
    fn begin_from_idle() {
        let mut session = RecorderSession::new();
        assert!(session.begin(AudioFormat::Ogg).is_ok());
        assert_eq!(session.phase(), RecorderPhase::Recording);
        assert_eq!(session.format(), AudioFormat::Ogg);
    }

    #[test]
    fn begin_twice_fails() {
        let mut session = recording_session();
        let err = session.begin(AudioFormat::Ogg).unwrap_err();
        assert_eq!(err.phase, RecorderPhase::Recording);
        assert!(err.action.contains("begin"));
    }

    #[test]
    fn tick_increments_while_recording() {
        let mut session = recording_session();
        for expected in 1..=3 {
            let report = session.tick();
            assert_eq!(report.elapsed_secs, expected);
        }
        assert_eq!(session.elapsed_secs(), 3);
    }

    #[test]
    fn tick_frozen_while_paused() {
        let mut session = recording_session();
        session.tick();
        session.tick();
        session.pause().unwrap();

        session.tick();
        session.tick();
        assert_eq!(session.elapsed_secs(), 2);

        session.resume().unwrap();
        session.tick();
        assert_eq!(session.elapsed_secs(), 3);
    }

    #[test]
    fn tick_reports_advisory_crossing_once() {
        let mut session = RecorderSession::with_advisory_limit(3);
        session.begin(AudioFormat::Webm).unwrap();

        assert!(!session.tick().advisory_crossed);
        assert!(!session.tick().advisory_crossed);
        assert!(session.tick().advisory_crossed);
        // Past the limit: persistent advisory, but no repeated crossing
        assert!(!session.tick().advisory_crossed);
        assert!(session.over_advisory());
    }

    #[test]
    fn advisory_never_stops_the_session() {
        let mut session = RecorderSession::with_advisory_limit(1);
        session.begin(AudioFormat::Webm).unwrap();
        for _ in 0..10 {
            session.tick();
            session.push_fragment(vec![0u8; 4]);
        }
        assert_eq!(session.phase(), RecorderPhase::Recording);
        assert_eq!(session.elapsed_secs(), 10);
        assert_eq!(session.fragment_count(), 10);
    }

    #[test]
    fn fragments_accumulate_in_order() {
        let mut session = recording_session();
        session.push_fragment(vec![1]);
        session.push_fragment(vec![2, 3]);
        let note = session.finalize().unwrap();
        assert_eq!(note.data(), &[1, 2, 3]);
    }

    #[test]
    fn empty_fragments_are_dropped() {
        let mut session = recording_session();
        session.push_fragment(vec![]);
        session.push_fragment(vec![7]);
        session.push_fragment(vec![]);
        assert_eq!(session.fragment_count(), 1);
    }

    #[test]
    fn fragments_ignored_while_paused() {
        let mut session = recording_session();
        session.pause().unwrap();
        session.push_fragment(vec![1, 2, 3]);
        assert_eq!(session.fragment_count(), 0);
    }

    #[test]
    fn pause_requires_recording() {
        let mut session = RecorderSession::new();
        let err = session.pause().unwrap_err();
        assert_eq!(err.phase, RecorderPhase::Idle);
    }

    #[test]
    fn resume_requires_paused() {
        let mut session = recording_session();
        let err = session.resume().unwrap_err();
        assert_eq!(err.phase, RecorderPhase::Recording);
    }

    #[test]
    fn finalize_from_recording() {
        let mut session = recording_session();
        session.push_fragment(vec![1, 2]);
        let note = session.finalize().unwrap();
        assert_eq!(note.format(), AudioFormat::Webm);
        assert_eq!(session.phase(), RecorderPhase::Ready);
    }

    #[test]
    fn finalize_from_paused() {
        let mut session = recording_session();
        session.push_fragment(vec![1, 2]);
        session.pause().unwrap();
        let note = session.finalize().unwrap();
        assert_eq!(note.data(), &[1, 2]);
    }

    #[test]
    fn finalize_with_empty_capture_yields_valid_note() {
        let mut session = recording_session();
        let note = session.finalize().unwrap();
        assert_eq!(note.size_bytes(), 0);
        assert_eq!(session.phase(), RecorderPhase::Ready);
    }

    #[test]
    fn finalize_twice_fails() {
        let mut session = recording_session();
        session.finalize().unwrap();
        let err = session.finalize().unwrap_err();
        assert_eq!(err.phase, RecorderPhase::Ready);
        assert!(err.action.contains("finalize"));
    }

    #[test]
    fn finalize_with_custom_finalizer_tags_format() {
        let mut session = RecorderSession::new();
        session.begin(AudioFormat::Flac).unwrap();
        session.push_fragment(vec![1, 2, 3]);
        let note = session
            .finalize_with(|fragments, format| {
                // An encoding finalizer sees all fragments and the format
                assert_eq!(fragments.len(), 1);
                VoiceNote::new(vec![0xFF], format)
            })
            .unwrap();
        assert_eq!(note.format(), AudioFormat::Flac);
        assert_eq!(note.data(), &[0xFF]);
    }

    #[test]
    fn toggle_preview_only_when_ready() {
        let mut session = recording_session();
        assert!(session.toggle_preview().is_err());

        session.finalize().unwrap();
        assert!(session.toggle_preview().unwrap());
        assert!(!session.toggle_preview().unwrap());
    }

    #[test]
    fn send_hands_over_the_note() {
        let mut session = recording_session();
        session.push_fragment(vec![5]);
        session.finalize().unwrap();
        let note = session.send().unwrap();
        assert_eq!(note.data(), &[5]);
        assert_eq!(session.phase(), RecorderPhase::Closed);
        assert!(session.note().is_none());
    }

    #[test]
    fn send_requires_ready() {
        let mut session = recording_session();
        let err = session.send().unwrap_err();
        assert_eq!(err.phase, RecorderPhase::Recording);
    }

    #[test]
    fn cancel_is_idempotent_from_any_phase() {
        let mut idle = RecorderSession::new();
        idle.cancel();
        idle.cancel();
        assert_eq!(idle.phase(), RecorderPhase::Closed);

        let mut recording = recording_session();
        recording.push_fragment(vec![1]);
        recording.cancel();
        assert_eq!(recording.phase(), RecorderPhase::Closed);
        assert_eq!(recording.fragment_count(), 0);

        let mut ready = recording_session();
        ready.finalize().unwrap();
        ready.cancel();
        assert!(ready.note().is_none());
    }

    #[test]
    fn closed_session_rejects_everything_but_cancel() {
        let mut session = RecorderSession::new();
        session.cancel();
        assert!(session.begin(AudioFormat::Webm).is_err());
        assert!(session.pause().is_err());
        assert!(session.resume().is_err());
        assert!(session.finalize().is_err());
        assert!(session.send().is_err());
        session.cancel();
    }

    #[test]
    fn full_cycle() {
        let mut session = RecorderSession::new();
        session.begin(AudioFormat::Webm).unwrap();

        session.tick();
        session.push_fragment(vec![1]);
        session.pause().unwrap();
        session.resume().unwrap();
        session.tick();
        session.push_fragment(vec![2]);

        session.finalize().unwrap();
        assert_eq!(session.elapsed_secs(), 2);

        let note = session.send().unwrap();
        assert_eq!(note.data(), &[1, 2]);
        assert_eq!(session.phase(), RecorderPhase::Closed);
    }

    #[test]
    fn phase_display() {
        assert_eq!(RecorderPhase::Idle.to_string(), "idle");
        assert_eq!(RecorderPhase::Recording.to_string(), "recording");
        assert_eq!(RecorderPhase::Paused.to_string(), "paused");
        assert_eq!(RecorderPhase::Ready.to_string(), "ready");
        assert_eq!(RecorderPhase::Closed.to_string(), "closed");
    }

    #[test]
    fn error_display() {
        let err = InvalidTransition {
            phase: RecorderPhase::Ready,
            action: "pause".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("pause"));
        assert!(msg.contains("ready"));
    }
}
