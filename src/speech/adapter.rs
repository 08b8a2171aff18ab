//! Dictation adapter: continuous and single-shot sessions over a platform
//! speech capability.
//!
//! Continuous mode masks the platform's habit of ending sessions after
//! silence: when a session ends without an explicit `stop_listening`, the
//! adapter starts it again. Single-shot mode delivers at most one transcript
//! and never restarts. The two slots are independent; any policy like
//! "starting a note dictation pauses the room-wide one" belongs to callers.

use std::sync::mpsc::Receiver;

use super::{RecognitionSession, SessionConfig, SessionEvent, SpeechCapability};

/// Error codes the platform raises for ordinary silence or cancellation;
/// swallowed without reaching the caller.
fn is_transient(code: &str) -> bool {
    matches!(code, "no-speech" | "aborted")
}

type ResultHandler = Box<dyn FnMut(String)>;
type ErrorHandler = Box<dyn FnMut(String)>;

struct Slot {
    session: Box<dyn RecognitionSession>,
    events: Receiver<SessionEvent>,
    on_result: ResultHandler,
    on_error: ErrorHandler,
    /// Continuous mode only: restart the platform session when it ends on
    /// its own. Cleared by `stop_listening` and by fatal errors.
    keep_alive: bool,
}

/// Continuous and single-shot dictation over an injected capability.
pub struct DictationAdapter<C: SpeechCapability> {
    capability: C,
    continuous: Option<Slot>,
    single: Option<Slot>,
}

impl<C: SpeechCapability> DictationAdapter<C> {
    pub fn new(capability: C) -> Self {
        Self {
            capability,
            continuous: None,
            single: None,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.capability.is_supported()
    }

    /// Whether a continuous session is live.
    pub fn is_listening(&self) -> bool {
        self.continuous.is_some()
    }

    /// Whether a single-shot session is still waiting for its utterance.
    pub fn is_awaiting_once(&self) -> bool {
        self.single.is_some()
    }

    /// Begins a continuous session delivering each finalized utterance via
    /// `on_result`. No-op when the capability is unsupported. Replaces any
    /// prior continuous session.
    pub fn start_listening(
        &mut self,
        language: &str,
        on_result: impl FnMut(String) + 'static,
        on_error: impl FnMut(String) + 'static,
    ) {
        if !self.capability.is_supported() {
            return;
        }
        self.stop_listening();
        let (session, events) = self.capability.open_session(SessionConfig {
            language: language.to_string(),
            continuous: true,
        });
        let mut slot = Slot {
            session,
            events,
            on_result: Box::new(on_result),
            on_error: Box::new(on_error),
            keep_alive: true,
        };
        slot.session.start();
        self.continuous = Some(slot);
    }

    /// Unconditionally ends the continuous session and disables restart.
    /// Safe to call when nothing is listening.
    pub fn stop_listening(&mut self) {
        if let Some(mut slot) = self.continuous.take() {
            slot.session.stop();
        }
    }

    /// Begins a single-shot session that resolves after the first finalized
    /// utterance or error. Cancels any prior single-shot session. No-op when
    /// the capability is unsupported.
    pub fn listen_once(
        &mut self,
        language: &str,
        on_result: impl FnMut(String) + 'static,
        on_error: impl FnMut(String) + 'static,
    ) {
        if !self.capability.is_supported() {
            return;
        }
        self.stop_once();
        let (session, events) = self.capability.open_session(SessionConfig {
            language: language.to_string(),
            continuous: false,
        });
        let mut slot = Slot {
            session,
            events,
            on_result: Box::new(on_result),
            on_error: Box::new(on_error),
            keep_alive: false,
        };
        slot.session.start();
        self.single = Some(slot);
    }

    /// Aborts a live single-shot session if any; idempotent otherwise.
    pub fn stop_once(&mut self) {
        if let Some(mut slot) = self.single.take() {
            slot.session.abort();
        }
    }

    /// Pumps pending session events and invokes the caller's handlers.
    /// Call from the event loop; no-op when nothing is listening.
    pub fn process_events(&mut self) {
        self.pump_continuous();
        self.pump_single();
    }

    fn pump_continuous(&mut self) {
        let slot = match self.continuous.as_mut() {
            Some(slot) => slot,
            None => return,
        };
        let mut dead = false;
        while let Ok(event) = slot.events.try_recv() {
            match event {
                SessionEvent::Transcript(transcript) => (slot.on_result)(transcript),
                SessionEvent::Error(code) if is_transient(&code) => {}
                SessionEvent::Error(code) => {
                    let fatal = code == "network";
                    (slot.on_error)(code);
                    if fatal {
                        slot.keep_alive = false;
                    }
                }
                SessionEvent::Ended => {
                    if slot.keep_alive {
                        tracing::debug!("Dictation session ended unprompted, restarting");
                        slot.session.start();
                    } else {
                        dead = true;
                        break;
                    }
                }
            }
        }
        if dead {
            self.continuous = None;
        }
    }

    fn pump_single(&mut self) {
        let slot = match self.single.as_mut() {
            Some(slot) => slot,
            None => return,
        };
        let mut done = false;
        while !done {
            let event = match slot.events.try_recv() {
                Ok(event) => event,
                Err(_) => break,
            };
            match event {
                SessionEvent::Transcript(transcript) => {
                    (slot.on_result)(transcript);
                    done = true;
                }
                SessionEvent::Error(code) if is_transient(&code) => {
                    // Swallowed: no transcript, no error callback.
                    done = true;
                }
                SessionEvent::Error(code) => {
                    (slot.on_error)(code);
                    done = true;
                }
                SessionEvent::Ended => {
                    done = true;
                }
            }
        }
        if done {
            if let Some(mut slot) = self.single.take() {
                slot.session.stop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::FakeCapability;
    use super::super::{NullCapability, SessionEvent};
    use super::*;
    use std::sync::{Arc, Mutex};

    fn collector() -> (Arc<Mutex<Vec<String>>>, impl FnMut(String) + 'static) {
        let sink: Arc<Mutex<Vec<String>>> = Arc::default();
        let writer = Arc::clone(&sink);
        (sink, move |s: String| writer.lock().unwrap().push(s))
    }

    #[test]
    fn test_continuous_delivers_each_transcript() {
        let fake = FakeCapability::new();
        let mut adapter = DictationAdapter::new(fake.clone());
        let (results, on_result) = collector();
        let (errors, on_error) = collector();

        adapter.start_listening("fr-FR", on_result, on_error);
        fake.emit(SessionEvent::Transcript("canapé".to_string()));
        fake.emit(SessionEvent::Transcript("lampe".to_string()));
        adapter.process_events();

        assert_eq!(*results.lock().unwrap(), vec!["canapé", "lampe"]);
        assert!(errors.lock().unwrap().is_empty());
        assert_eq!(fake.config(0).language, "fr-FR");
        assert!(fake.config(0).continuous);
    }

    #[test]
    fn test_continuous_restarts_after_unprompted_end() {
        let fake = FakeCapability::new();
        let mut adapter = DictationAdapter::new(fake.clone());
        adapter.start_listening("en-US", |_| {}, |_| {});

        fake.emit(SessionEvent::Ended);
        adapter.process_events();

        assert_eq!(fake.calls(), vec!["open[0]", "start[0]", "start[0]"]);
        assert!(adapter.is_listening());
    }

    #[test]
    fn test_no_restart_after_stop_listening() {
        let fake = FakeCapability::new();
        let mut adapter = DictationAdapter::new(fake.clone());
        adapter.start_listening("en-US", |_| {}, |_| {});

        adapter.stop_listening();
        fake.emit(SessionEvent::Ended);
        adapter.process_events();

        assert_eq!(fake.calls(), vec!["open[0]", "start[0]", "stop[0]"]);
        assert!(!adapter.is_listening());
    }

    #[test]
    fn test_stop_listening_when_idle_is_safe() {
        let mut adapter = DictationAdapter::new(FakeCapability::new());
        adapter.stop_listening();
        assert!(!adapter.is_listening());
    }

    #[test]
    fn test_continuous_swallows_transient_errors() {
        let fake = FakeCapability::new();
        let mut adapter = DictationAdapter::new(fake.clone());
        let (errors, on_error) = collector();
        adapter.start_listening("fr-FR", |_| {}, on_error);

        fake.emit(SessionEvent::Error("no-speech".to_string()));
        fake.emit(SessionEvent::Error("aborted".to_string()));
        fake.emit(SessionEvent::Ended);
        adapter.process_events();

        assert!(errors.lock().unwrap().is_empty());
        // Transient noise does not end the session: it restarted.
        assert!(adapter.is_listening());
    }

    #[test]
    fn test_continuous_network_error_surfaces_and_disables_restart() {
        let fake = FakeCapability::new();
        let mut adapter = DictationAdapter::new(fake.clone());
        let (errors, on_error) = collector();
        adapter.start_listening("fr-FR", |_| {}, on_error);

        fake.emit(SessionEvent::Error("network".to_string()));
        fake.emit(SessionEvent::Ended);
        adapter.process_events();

        assert_eq!(*errors.lock().unwrap(), vec!["network"]);
        assert!(!adapter.is_listening());
        assert_eq!(fake.calls(), vec!["open[0]", "start[0]"]);
    }

    #[test]
    fn test_continuous_other_error_surfaces_but_keeps_session() {
        let fake = FakeCapability::new();
        let mut adapter = DictationAdapter::new(fake.clone());
        let (errors, on_error) = collector();
        adapter.start_listening("fr-FR", |_| {}, on_error);

        fake.emit(SessionEvent::Error("audio-capture".to_string()));
        fake.emit(SessionEvent::Ended);
        adapter.process_events();

        assert_eq!(*errors.lock().unwrap(), vec!["audio-capture"]);
        assert!(adapter.is_listening());
    }

    #[test]
    fn test_single_shot_resolves_after_first_transcript() {
        let fake = FakeCapability::new();
        let mut adapter = DictationAdapter::new(fake.clone());
        let (results, on_result) = collector();
        adapter.listen_once("fr-FR", on_result, |_| {});
        assert!(!fake.config(0).continuous);

        fake.emit(SessionEvent::Transcript("fragile".to_string()));
        fake.emit(SessionEvent::Transcript("ignored".to_string()));
        adapter.process_events();

        assert_eq!(*results.lock().unwrap(), vec!["fragile"]);
        assert!(!adapter.is_awaiting_once());
    }

    #[test]
    fn test_single_shot_transient_error_is_silent() {
        let fake = FakeCapability::new();
        let mut adapter = DictationAdapter::new(fake.clone());
        let (results, on_result) = collector();
        let (errors, on_error) = collector();
        adapter.listen_once("fr-FR", on_result, on_error);

        fake.emit(SessionEvent::Error("no-speech".to_string()));
        adapter.process_events();

        assert!(results.lock().unwrap().is_empty());
        assert!(errors.lock().unwrap().is_empty());
        assert!(!adapter.is_awaiting_once());
    }

    #[test]
    fn test_single_shot_other_error_surfaces() {
        let fake = FakeCapability::new();
        let mut adapter = DictationAdapter::new(fake.clone());
        let (errors, on_error) = collector();
        adapter.listen_once("fr-FR", |_| {}, on_error);

        fake.emit(SessionEvent::Error("not-allowed".to_string()));
        adapter.process_events();

        assert_eq!(*errors.lock().unwrap(), vec!["not-allowed"]);
        assert!(!adapter.is_awaiting_once());
    }

    #[test]
    fn test_new_single_shot_cancels_prior_one() {
        let fake = FakeCapability::new();
        let mut adapter = DictationAdapter::new(fake.clone());
        let (first, on_first) = collector();
        let (second, on_second) = collector();

        adapter.listen_once("fr-FR", on_first, |_| {});
        adapter.listen_once("fr-FR", on_second, |_| {});
        assert!(fake.calls().contains(&"abort[0]".to_string()));

        fake.emit_to(1, SessionEvent::Transcript("kept".to_string()));
        adapter.process_events();

        assert!(first.lock().unwrap().is_empty());
        assert_eq!(*second.lock().unwrap(), vec!["kept"]);
    }

    #[test]
    fn test_stop_once_aborts_and_is_idempotent() {
        let fake = FakeCapability::new();
        let mut adapter = DictationAdapter::new(fake.clone());
        adapter.listen_once("fr-FR", |_| {}, |_| {});

        adapter.stop_once();
        adapter.stop_once();

        assert_eq!(fake.calls(), vec!["open[0]", "start[0]", "abort[0]"]);
    }

    #[test]
    fn test_slots_are_independent() {
        let fake = FakeCapability::new();
        let mut adapter = DictationAdapter::new(fake.clone());
        let (continuous, on_continuous) = collector();
        let (once, on_once) = collector();

        adapter.start_listening("fr-FR", on_continuous, |_| {});
        adapter.listen_once("fr-FR", on_once, |_| {});
        assert_eq!(fake.session_count(), 2);
        assert!(adapter.is_listening());
        assert!(adapter.is_awaiting_once());

        fake.emit_to(0, SessionEvent::Transcript("table".to_string()));
        fake.emit_to(1, SessionEvent::Transcript("note".to_string()));
        adapter.process_events();

        assert_eq!(*continuous.lock().unwrap(), vec!["table"]);
        assert_eq!(*once.lock().unwrap(), vec!["note"]);
        assert!(adapter.is_listening());
        assert!(!adapter.is_awaiting_once());
    }

    #[test]
    fn test_unsupported_capability_never_starts() {
        let mut adapter = DictationAdapter::new(NullCapability);
        assert!(!adapter.is_supported());

        adapter.start_listening("fr-FR", |_| {}, |_| {});
        adapter.listen_once("fr-FR", |_| {}, |_| {});
        adapter.process_events();

        assert!(!adapter.is_listening());
        assert!(!adapter.is_awaiting_once());
    }
}
