//! File selection and upload state machine.
//!
//! `Idle` → `FileSelected` → `Uploading` → back to `Idle` on success, or to
//! `FileSelected` when the upload fails. Failures never escape this module:
//! they end up in the status message.

use crate::client::PaymentClient;
use crate::errors::ClientError;
use crate::i18n::Locale;
use crate::models::{CsvFile, StatusMessage, Tone, UploadResponse, UploadView};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Invoked once per successful upload.
pub type UploadCallback = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    FileSelected,
    Uploading,
}

#[derive(Debug, Default)]
pub struct UploadSession {
    pub selected_file: Option<CsvFile>,
    /// Value of the browse control; cleared so the same name can be picked again.
    pub input_value: Option<String>,
    pub upload_message: Option<StatusMessage>,
    pub message_visible: bool,
    pub is_uploading: bool,
    pub is_dragging: bool,
    message_seq: u64,
}

impl UploadSession {
    pub fn phase(&self) -> UploadPhase {
        if self.is_uploading {
            UploadPhase::Uploading
        } else if self.selected_file.is_some() {
            UploadPhase::FileSelected
        } else {
            UploadPhase::Idle
        }
    }
}

#[derive(Debug)]
pub enum UploadOutcome {
    Uploaded(UploadResponse),
    /// Nothing was selected; no request was made.
    NoFile,
    /// Another upload is still in flight.
    Busy,
    Failed,
}

struct Shared {
    session: Mutex<UploadSession>,
    expiry: Mutex<Option<JoinHandle<()>>>,
}

impl Shared {
    fn session(&self) -> MutexGuard<'_, UploadSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn expiry(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.expiry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cancel_expiry(&self) {
        if let Some(handle) = self.expiry().take() {
            handle.abort();
        }
    }
}

/// Resets the busy flag on every exit path, cancellation included.
struct UploadingGuard<'a> {
    shared: &'a Shared,
}

impl Drop for UploadingGuard<'_> {
    fn drop(&mut self) {
        self.shared.session().is_uploading = false;
    }
}

pub struct UploadController {
    shared: Arc<Shared>,
    client: PaymentClient,
    locale: Locale,
    message_ttl: Duration,
    on_success: Option<UploadCallback>,
}

impl UploadController {
    pub fn new(client: PaymentClient, locale: Locale, message_ttl: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                session: Mutex::new(UploadSession::default()),
                expiry: Mutex::new(None),
            }),
            client,
            locale,
            message_ttl,
            on_success: None,
        }
    }

    pub fn on_success(mut self, callback: UploadCallback) -> Self {
        self.on_success = Some(callback);
        self
    }

    pub fn phase(&self) -> UploadPhase {
        self.shared.session().phase()
    }

    pub fn selected_file(&self) -> Option<CsvFile> {
        self.shared.session().selected_file.clone()
    }

    pub fn view(&self) -> UploadView {
        let session = self.shared.session();
        UploadView {
            selected_file: session.selected_file.as_ref().map(|file| file.name.clone()),
            selected_size: session.selected_file.as_ref().map(CsvFile::size),
            input_value: session.input_value.clone(),
            message: session
                .upload_message
                .clone()
                .filter(|_| session.message_visible),
            is_uploading: session.is_uploading,
            is_dragging: session.is_dragging,
        }
    }

    /// Selection through the browse dialog. `None` means the dialog was cancelled.
    pub fn select_browsed(&self, file: Option<CsvFile>) {
        let mut session = self.shared.session();
        match file {
            Some(file) => {
                session.input_value = Some(file.name.clone());
                session.selected_file = Some(file);
                self.clear_message(&mut session);
            }
            None => {
                session.selected_file = None;
                session.input_value = None;
            }
        }
    }

    pub fn drag_over(&self) {
        self.shared.session().is_dragging = true;
    }

    pub fn drag_leave(&self) {
        self.shared.session().is_dragging = false;
    }

    pub fn drop_file(&self, file: Option<CsvFile>) {
        let mut session = self.shared.session();
        session.is_dragging = false;
        let Some(file) = file else {
            return;
        };

        if file.has_csv_extension() {
            session.selected_file = Some(file);
            session.input_value = None;
            self.clear_message(&mut session);
        } else {
            warn!(name = %file.name, "rejected dropped file without .csv extension");
            session.selected_file = None;
            let text = self.locale.invalid_drop();
            self.set_message(&mut session, StatusMessage::new(text, Tone::Error));
        }
    }

    pub async fn upload(&self) -> UploadOutcome {
        let file = {
            let mut session = self.shared.session();
            if session.is_uploading {
                return UploadOutcome::Busy;
            }
            let Some(file) = session.selected_file.clone() else {
                let text = self.locale.select_file_first();
                self.set_message(&mut session, StatusMessage::new(text, Tone::Error));
                return UploadOutcome::NoFile;
            };
            session.is_uploading = true;
            let text = self.locale.uploading();
            self.set_message(&mut session, StatusMessage::new(text, Tone::Info));
            file
        };
        let _uploading = UploadingGuard {
            shared: &self.shared,
        };

        match self.client.upload(&file).await {
            Ok(response) => {
                info!(
                    name = %file.name,
                    rows = ?response.rows,
                    columns = ?response.columns,
                    "upload accepted"
                );
                {
                    let mut session = self.shared.session();
                    let text = self.locale.upload_succeeded(
                        &response.message,
                        response.rows,
                        response.columns,
                    );
                    self.set_message(&mut session, StatusMessage::new(text, Tone::Success));
                    session.selected_file = None;
                    session.input_value = None;
                }
                if let Some(callback) = &self.on_success {
                    callback();
                }
                UploadOutcome::Uploaded(response)
            }
            Err(err) => {
                error!(name = %file.name, "upload failed: {err}");
                let text = match &err {
                    ClientError::Status { body, .. } => {
                        self.locale.upload_failed(body.error.as_deref())
                    }
                    ClientError::Transport(_) => self.locale.upload_unreachable(),
                };
                let mut session = self.shared.session();
                self.set_message(&mut session, StatusMessage::new(text, Tone::Error));
                UploadOutcome::Failed
            }
        }
    }

    fn clear_message(&self, session: &mut UploadSession) {
        self.shared.cancel_expiry();
        session.upload_message = None;
        session.message_visible = false;
        session.message_seq += 1;
    }

    /// Shows `message` and restarts the expiry countdown, replacing any pending one.
    fn set_message(&self, session: &mut UploadSession, message: StatusMessage) {
        self.shared.cancel_expiry();
        session.message_seq += 1;
        session.upload_message = Some(message);
        session.message_visible = true;

        let Ok(runtime) = Handle::try_current() else {
            warn!("no async runtime, upload message will not expire");
            return;
        };
        let seq = session.message_seq;
        let ttl = self.message_ttl;
        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        let handle = runtime.spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(shared) = shared.upgrade() {
                let mut session = shared.session();
                if session.message_seq == seq {
                    session.message_visible = false;
                }
            }
        });
        *self.shared.expiry() = Some(handle);
    }
}

impl Drop for UploadController {
    fn drop(&mut self) {
        self.shared.cancel_expiry();
    }
}
