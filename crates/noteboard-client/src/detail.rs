//! Note detail controller.
//!
//! Loads one note into an edit buffer, debounces editor content into it, and
//! saves title and content together when the user leaves. The buffer lives
//! in a shared session so a debounced delivery or a save that is still
//! running after the controller is gone only touches that session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, warn};
use uuid::Uuid;

use noteboard_api::actions::UpdateNoteInput;
use noteboard_core::{defaults, messages, Note};

use crate::board::Navigation;
use crate::client::{action_data, ActionClient, ClientError, ClientResult};
use crate::debounce::Debouncer;
use crate::identity::IdentityProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailStatus {
    Idle,
    MissingId,
    AwaitingIdentity,
    NotFound,
    AccessDenied,
    Failed(String),
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleEdit {
    Viewing,
    Editing(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveState {
    Clean,
    Dirty,
    Saving,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SavePolicy {
    /// Save only through [`DetailController::save_and_exit`] or
    /// [`DetailController::save`].
    #[default]
    OnExit,
    /// Also save whenever debounced content reaches the buffer.
    Autosave,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Title and content already match the last save; nothing was sent.
    Unchanged,
    Saved(Note),
    Failed(String),
    /// Refused before any call (empty title).
    Rejected(String),
    /// Another save is still running.
    InFlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitOutcome {
    pub save: SaveOutcome,
    /// `None` when the user has to stay on the note.
    pub navigation: Option<Navigation>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Buffer {
    title: String,
    content: String,
    saved_title: String,
    saved_content: String,
    state: SaveState,
}

impl Buffer {
    fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            saved_title: note.title.clone(),
            saved_content: note.content.clone(),
            state: SaveState::Clean,
        }
    }

    fn is_dirty(&self) -> bool {
        self.title != self.saved_title || self.content != self.saved_content
    }

    fn mark(&mut self) {
        if self.state != SaveState::Saving {
            self.state = if self.is_dirty() {
                SaveState::Dirty
            } else {
                SaveState::Clean
            };
        }
    }
}

/// Clears the in-flight flag even if the save future is dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

struct Session {
    client: Arc<dyn ActionClient>,
    note_id: Uuid,
    user_id: String,
    buffer: Mutex<Buffer>,
    in_flight: AtomicBool,
}

impl Session {
    fn set_title(&self, title: String) {
        let mut buffer = lock(&self.buffer);
        buffer.title = title;
        buffer.mark();
    }

    fn set_content(&self, content: String) {
        let mut buffer = lock(&self.buffer);
        buffer.content = content;
        buffer.mark();
    }

    fn is_saving(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    async fn save(&self) -> SaveOutcome {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return SaveOutcome::InFlight;
        }
        let _guard = InFlightGuard(&self.in_flight);

        let (input, sent_title) = {
            let mut buffer = lock(&self.buffer);
            let title = buffer.title.trim().to_string();
            if title.is_empty() {
                buffer.title = buffer.saved_title.clone();
                buffer.mark();
                return SaveOutcome::Rejected(messages::TITLE_REQUIRED.to_string());
            }
            buffer.title = title.clone();

            let input = UpdateNoteInput {
                title: (title != buffer.saved_title).then(|| title.clone()),
                content: (buffer.content != buffer.saved_content).then(|| buffer.content.clone()),
                category_id: None,
            };
            if input.title.is_none() && input.content.is_none() {
                buffer.state = SaveState::Clean;
                return SaveOutcome::Unchanged;
            }
            buffer.state = SaveState::Saving;
            (input, title)
        };

        let outcome = self
            .client
            .update_note(self.note_id, &self.user_id, input)
            .await
            .and_then(action_data);

        let mut buffer = lock(&self.buffer);
        match outcome {
            Ok(note) => {
                if buffer.title == sent_title {
                    buffer.title = note.title.clone();
                }
                buffer.saved_title = note.title.clone();
                buffer.saved_content = note.content.clone();
                buffer.state = SaveState::Clean;
                buffer.mark();
                debug!(
                    subsystem = "client",
                    component = "detail",
                    note_id = %self.note_id,
                    "Note saved"
                );
                SaveOutcome::Saved(note)
            }
            Err(err) => {
                let message = err.to_string();
                warn!(
                    subsystem = "client",
                    component = "detail",
                    note_id = %self.note_id,
                    error = %message,
                    "Note save failed"
                );
                buffer.title = buffer.saved_title.clone();
                buffer.state = SaveState::Error(message.clone());
                SaveOutcome::Failed(message)
            }
        }
    }
}

pub struct DetailController {
    client: Arc<dyn ActionClient>,
    identity: Arc<dyn IdentityProvider>,
    policy: SavePolicy,
    content_delay: Duration,
    status: DetailStatus,
    title_edit: TitleEdit,
    session: Option<Arc<Session>>,
    debouncer: Option<Debouncer<String>>,
    notice: Option<String>,
}

impl DetailController {
    pub fn new(client: Arc<dyn ActionClient>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            client,
            identity,
            policy: SavePolicy::default(),
            content_delay: Duration::from_millis(defaults::CONTENT_DEBOUNCE_MS),
            status: DetailStatus::Idle,
            title_edit: TitleEdit::Viewing,
            session: None,
            debouncer: None,
            notice: None,
        }
    }

    pub fn with_policy(mut self, policy: SavePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_content_delay(mut self, delay: Duration) -> Self {
        self.content_delay = delay;
        self
    }

    pub fn status(&self) -> &DetailStatus {
        &self.status
    }

    pub fn note_id(&self) -> Option<Uuid> {
        self.session.as_ref().map(|s| s.note_id)
    }

    pub fn title_edit(&self) -> &TitleEdit {
        &self.title_edit
    }

    /// Title as displayed: the edit field while editing, else the buffer.
    pub fn title(&self) -> String {
        match &self.title_edit {
            TitleEdit::Editing(text) => text.clone(),
            TitleEdit::Viewing => self
                .session
                .as_ref()
                .map(|s| lock(&s.buffer).title.clone())
                .unwrap_or_default(),
        }
    }

    /// Content that has reached the buffer.
    pub fn content(&self) -> String {
        self.session
            .as_ref()
            .map(|s| lock(&s.buffer).content.clone())
            .unwrap_or_default()
    }

    pub fn save_state(&self) -> SaveState {
        self.session
            .as_ref()
            .map(|s| lock(&s.buffer).state.clone())
            .unwrap_or(SaveState::Clean)
    }

    pub fn is_saving(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_saving())
    }

    /// Last user-visible message, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Load note `id` for the current user.
    pub async fn load(&mut self, id: Option<Uuid>) {
        self.debouncer = None;
        self.session = None;
        self.title_edit = TitleEdit::Viewing;
        self.notice = None;

        let Some(id) = id else {
            self.status = DetailStatus::MissingId;
            return;
        };
        let Some(user_id) = self.identity.current_user() else {
            self.status = DetailStatus::AwaitingIdentity;
            return;
        };

        let outcome = self
            .client
            .get_note_by_id(id, &user_id)
            .await
            .and_then(action_data);
        self.status = match outcome {
            Ok(note) if note.user_id != user_id => DetailStatus::AccessDenied,
            Ok(note) => {
                let session = Arc::new(Session {
                    client: self.client.clone(),
                    note_id: note.id,
                    user_id,
                    buffer: Mutex::new(Buffer::from_note(&note)),
                    in_flight: AtomicBool::new(false),
                });
                self.debouncer = Some(self.content_debouncer(session.clone()));
                self.session = Some(session);
                DetailStatus::Ready
            }
            Err(ClientError::Action(message)) if message == messages::NOTE_NOT_FOUND => {
                DetailStatus::NotFound
            }
            Err(err) => DetailStatus::Failed(err.to_string()),
        };
    }

    fn content_debouncer(&self, session: Arc<Session>) -> Debouncer<String> {
        let autosave = self.policy == SavePolicy::Autosave;
        Debouncer::new(self.content_delay, move |content: String| {
            let session = session.clone();
            async move {
                session.set_content(content);
                if autosave {
                    session.save().await;
                }
            }
        })
    }

    pub fn start_title_edit(&mut self) {
        if self.session.is_some() {
            self.title_edit = TitleEdit::Editing(self.title());
        }
    }

    pub fn edit_title(&mut self, text: impl Into<String>) {
        if let TitleEdit::Editing(current) = &mut self.title_edit {
            *current = text.into();
        }
    }

    pub fn cancel_title_edit(&mut self) {
        self.title_edit = TitleEdit::Viewing;
    }

    /// Leave title editing, keeping the new title locally.
    ///
    /// An empty title is refused and the previous one stays.
    pub fn commit_title(&mut self) -> ClientResult<()> {
        let TitleEdit::Editing(text) = std::mem::replace(&mut self.title_edit, TitleEdit::Viewing)
        else {
            return Ok(());
        };
        let Some(session) = &self.session else {
            return Ok(());
        };
        let title = text.trim();
        if title.is_empty() {
            self.notice = Some(messages::TITLE_REQUIRED.to_string());
            return Err(ClientError::Action(messages::TITLE_REQUIRED.to_string()));
        }
        session.set_title(title.to_string());
        Ok(())
    }

    /// Editor output; reaches the buffer after the quiet period.
    pub fn content_changed(&self, html: impl Into<String>) {
        if let Some(debouncer) = &self.debouncer {
            debouncer.schedule(html.into());
        }
    }

    /// Flush pending content and save if anything changed.
    pub async fn save(&mut self) -> SaveOutcome {
        let Some(session) = self.session.clone() else {
            return SaveOutcome::Unchanged;
        };
        if let TitleEdit::Editing(text) =
            std::mem::replace(&mut self.title_edit, TitleEdit::Viewing)
        {
            session.set_title(text);
        }
        // Pending content goes straight into the buffer so this save is the
        // only update call.
        if let Some(debouncer) = &self.debouncer {
            if let Some(content) = debouncer.take_pending().await {
                session.set_content(content);
            }
        }

        let outcome = session.save().await;
        match &outcome {
            SaveOutcome::Failed(message) | SaveOutcome::Rejected(message) => {
                self.notice = Some(message.clone());
            }
            SaveOutcome::InFlight => {}
            SaveOutcome::Unchanged | SaveOutcome::Saved(_) => self.notice = None,
        }
        outcome
    }

    /// Save, then go back to the board.
    ///
    /// Stays on the note when the title is empty or a save is already
    /// running; a failed save still navigates once the call has resolved.
    pub async fn save_and_exit(&mut self) -> ExitOutcome {
        if self.is_saving() {
            return ExitOutcome {
                save: SaveOutcome::InFlight,
                navigation: None,
            };
        }
        let save = self.save().await;
        let navigation = match save {
            SaveOutcome::Rejected(_) | SaveOutcome::InFlight => None,
            _ => Some(Navigation::Board),
        };
        ExitOutcome { save, navigation }
    }
}
