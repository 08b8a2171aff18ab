use clap::Args;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::{find_item, find_room};
use crate::config::Config;
use crate::speech::{DictationAdapter, NullCapability, SpeechCapability};
use crate::store::{InventoryStore, ItemPatch, StoreError};

/// Capture dictated items into a room, or a dictated note into an item
#[derive(Args)]
pub struct DictateCommand {
    /// Room ID or name
    room: String,

    /// Dictate a note for this item (ID or name) instead of adding items
    #[arg(long, value_name = "ITEM")]
    note_for: Option<String>,

    /// Language tag override (default from config)
    #[arg(long)]
    language: Option<String>,
}

impl DictateCommand {
    pub fn run(
        &self,
        store: &InventoryStore,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        // No speech engine ships with this build; a platform capability can
        // be wired in here when one exists. Callers must probe support
        // before starting either mode.
        let capability = NullCapability;
        if !capability.is_supported() {
            println!("Speech recognition is not available on this platform");
            return Ok(());
        }

        let language = self.language.as_deref().unwrap_or(&config.language);
        let rooms = store.load();
        let room = match find_room(&rooms, &self.room) {
            Some(room) => room,
            None => return Err(format!("Room not found: {}", self.room).into()),
        };

        match &self.note_for {
            None => {
                let mut capture = ItemCapture::start(store, capability, &room.id, language);
                println!("Listening... say \"stop\" to finish");
                loop {
                    match capture.tick()? {
                        CaptureStatus::Listening => thread::sleep(Duration::from_millis(50)),
                        CaptureStatus::Stopped => break,
                        CaptureStatus::Failed(code) => {
                            eprintln!("Dictation error: {}", code);
                            break;
                        }
                    }
                }
                println!("Added {} item(s)", capture.added());
            }
            Some(identifier) => {
                let item = match find_item(room, identifier) {
                    Some(item) => item,
                    None => return Err(format!("Item not found: {}", identifier).into()),
                };
                let mut capture =
                    NoteCapture::start(store, capability, &room.id, &item.id, language);
                println!("Listening for one note...");
                loop {
                    match capture.tick()? {
                        NoteStatus::Waiting => thread::sleep(Duration::from_millis(50)),
                        NoteStatus::Saved(notes) => {
                            println!("Notes: {}", notes);
                            break;
                        }
                        NoteStatus::Silent => {
                            println!("Nothing heard");
                            break;
                        }
                        NoteStatus::Failed(code) => {
                            eprintln!("Dictation error: {}", code);
                            break;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

pub enum CaptureStatus {
    Listening,
    Stopped,
    Failed(String),
}

/// Continuous capture: each finalized utterance becomes an item in the room;
/// the spoken word "stop" ends the session instead of naming an item.
pub struct ItemCapture<'a, C: SpeechCapability> {
    store: &'a InventoryStore,
    adapter: DictationAdapter<C>,
    room_id: String,
    transcripts: Arc<Mutex<Vec<String>>>,
    errors: Arc<Mutex<Vec<String>>>,
    added: usize,
}

impl<'a, C: SpeechCapability> ItemCapture<'a, C> {
    pub fn start(
        store: &'a InventoryStore,
        capability: C,
        room_id: &str,
        language: &str,
    ) -> Self {
        let transcripts: Arc<Mutex<Vec<String>>> = Arc::default();
        let errors: Arc<Mutex<Vec<String>>> = Arc::default();
        let mut adapter = DictationAdapter::new(capability);
        let sink = Arc::clone(&transcripts);
        let error_sink = Arc::clone(&errors);
        adapter.start_listening(
            language,
            move |transcript| sink.lock().unwrap().push(transcript),
            move |code| error_sink.lock().unwrap().push(code),
        );
        Self {
            store,
            adapter,
            room_id: room_id.to_string(),
            transcripts,
            errors,
            added: 0,
        }
    }

    /// One pump of the event loop.
    pub fn tick(&mut self) -> Result<CaptureStatus, StoreError> {
        self.adapter.process_events();

        let drained: Vec<String> = self.transcripts.lock().unwrap().drain(..).collect();
        for transcript in drained {
            let spoken = transcript.trim();
            if spoken.is_empty() {
                continue;
            }
            if is_stop_command(spoken) {
                self.adapter.stop_listening();
                return Ok(CaptureStatus::Stopped);
            }
            if let Some(item) = self.store.add_item(&self.room_id, spoken)? {
                println!("  + {}", item.name);
                self.added += 1;
            }
        }

        if let Some(code) = self.errors.lock().unwrap().drain(..).next() {
            self.adapter.stop_listening();
            return Ok(CaptureStatus::Failed(code));
        }
        if !self.adapter.is_listening() {
            return Ok(CaptureStatus::Stopped);
        }
        Ok(CaptureStatus::Listening)
    }

    pub fn added(&self) -> usize {
        self.added
    }
}

pub enum NoteStatus {
    Waiting,
    Saved(String),
    Silent,
    Failed(String),
}

/// Single-shot capture: one utterance appended to an item's notes, with a
/// space separator when notes already exist.
pub struct NoteCapture<'a, C: SpeechCapability> {
    store: &'a InventoryStore,
    adapter: DictationAdapter<C>,
    room_id: String,
    item_id: String,
    transcripts: Arc<Mutex<Vec<String>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl<'a, C: SpeechCapability> NoteCapture<'a, C> {
    pub fn start(
        store: &'a InventoryStore,
        capability: C,
        room_id: &str,
        item_id: &str,
        language: &str,
    ) -> Self {
        let transcripts: Arc<Mutex<Vec<String>>> = Arc::default();
        let errors: Arc<Mutex<Vec<String>>> = Arc::default();
        let mut adapter = DictationAdapter::new(capability);
        let sink = Arc::clone(&transcripts);
        let error_sink = Arc::clone(&errors);
        adapter.listen_once(
            language,
            move |transcript| sink.lock().unwrap().push(transcript),
            move |code| error_sink.lock().unwrap().push(code),
        );
        Self {
            store,
            adapter,
            room_id: room_id.to_string(),
            item_id: item_id.to_string(),
            transcripts,
            errors,
        }
    }

    /// One pump of the event loop.
    pub fn tick(&mut self) -> Result<NoteStatus, StoreError> {
        self.adapter.process_events();

        if let Some(transcript) = self.transcripts.lock().unwrap().drain(..).next() {
            let spoken = transcript.trim();
            let existing = self
                .store
                .load()
                .iter()
                .find(|r| r.id == self.room_id)
                .and_then(|r| r.items.iter().find(|i| i.id == self.item_id))
                .map(|i| i.notes.clone())
                .unwrap_or_default();
            let notes = if existing.is_empty() {
                spoken.to_string()
            } else {
                format!("{} {}", existing, spoken)
            };
            let patch = ItemPatch {
                notes: Some(notes.clone()),
                ..Default::default()
            };
            self.store.update_item(&self.room_id, &self.item_id, &patch)?;
            return Ok(NoteStatus::Saved(notes));
        }

        if let Some(code) = self.errors.lock().unwrap().drain(..).next() {
            return Ok(NoteStatus::Failed(code));
        }
        if !self.adapter.is_awaiting_once() {
            // Session resolved without a transcript (silence or cancel).
            return Ok(NoteStatus::Silent);
        }
        Ok(NoteStatus::Waiting)
    }
}

fn is_stop_command(spoken: &str) -> bool {
    let lower = spoken.to_lowercase();
    lower == "stop" || lower == "stop."
}
