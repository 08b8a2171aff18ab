//! Speech-to-text capability surface.
//!
//! The platform recognition engine is consumed behind the [`SpeechCapability`]
//! trait: opening a session yields a control handle (`start`/`stop`/`abort`)
//! plus a channel of [`SessionEvent`]s. The [`DictationAdapter`] layers
//! continuous and single-shot dictation semantics on top; callers pump its
//! `process_events` from their own loop, so all callbacks fire on the
//! caller's turn rather than a background thread.

mod adapter;

pub use adapter::DictationAdapter;

use std::sync::mpsc::{self, Receiver};

/// Settings for opening one platform recognition session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// BCP 47 language tag, e.g. `fr-FR`.
    pub language: String,
    /// Whether the platform should keep delivering results until stopped.
    pub continuous: bool,
}

/// Events delivered by a live recognition session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// One finalized utterance.
    Transcript(String),
    /// Platform error code, e.g. `no-speech`, `aborted`, `network`.
    Error(String),
    /// The session stopped, either on its own or after stop/abort.
    Ended,
}

/// Controls for one live recognition session.
pub trait RecognitionSession {
    fn start(&mut self);
    fn stop(&mut self);
    fn abort(&mut self);
}

/// A platform speech-recognition engine.
pub trait SpeechCapability {
    /// Whether the platform exposes recognition at all. Callers must check
    /// this and hide dictation controls when unsupported.
    fn is_supported(&self) -> bool;

    /// Opens a session; events arrive on the returned receiver.
    fn open_session(
        &mut self,
        config: SessionConfig,
    ) -> (Box<dyn RecognitionSession>, Receiver<SessionEvent>);
}

/// Capability for platforms without a speech engine: never supported, and
/// any session opened against it is inert.
#[derive(Debug, Default)]
pub struct NullCapability;

impl SpeechCapability for NullCapability {
    fn is_supported(&self) -> bool {
        false
    }

    fn open_session(
        &mut self,
        _config: SessionConfig,
    ) -> (Box<dyn RecognitionSession>, Receiver<SessionEvent>) {
        // Sender dropped immediately; the receiver never yields events.
        let (_tx, rx) = mpsc::channel();
        (Box::new(DeadSession), rx)
    }
}

struct DeadSession;

impl RecognitionSession for DeadSession {
    fn start(&mut self) {}
    fn stop(&mut self) {}
    fn abort(&mut self) {}
}
