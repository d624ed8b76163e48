use crate::client::PaymentClient;
use crate::errors::ClientError;
use crate::i18n::Locale;
use crate::models::{ReminderRequestOutcome, ReminderView};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

/// Observer notified with every settled reminder attempt.
pub type ReminderCallback = Arc<dyn Fn(&ReminderRequestOutcome) + Send + Sync>;

#[derive(Debug, Default)]
struct ReminderState {
    sending: bool,
    outcome: Option<ReminderRequestOutcome>,
}

pub struct ReminderController {
    state: Mutex<ReminderState>,
    client: PaymentClient,
    locale: Locale,
    on_sent: Option<ReminderCallback>,
}

struct SendingGuard<'a> {
    controller: &'a ReminderController,
}

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        self.controller.state().sending = false;
    }
}

impl ReminderController {
    pub fn new(client: PaymentClient, locale: Locale) -> Self {
        Self {
            state: Mutex::new(ReminderState::default()),
            client,
            locale,
            on_sent: None,
        }
    }

    pub fn on_sent(mut self, callback: ReminderCallback) -> Self {
        self.on_sent = Some(callback);
        self
    }

    fn state(&self) -> MutexGuard<'_, ReminderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_sending(&self) -> bool {
        self.state().sending
    }

    pub fn outcome(&self) -> Option<ReminderRequestOutcome> {
        self.state().outcome.clone()
    }

    pub fn view(&self) -> ReminderView {
        let state = self.state();
        ReminderView {
            sending: state.sending,
            outcome: state.outcome.clone(),
        }
    }

    /// Posts `/send-reminders`. Returns `None` without issuing a request when
    /// `disabled` is set or a previous send is still in flight.
    pub async fn send_reminders(&self, disabled: bool) -> Option<ReminderRequestOutcome> {
        {
            let mut state = self.state();
            if disabled || state.sending {
                return None;
            }
            state.sending = true;
            state.outcome = None;
        }
        let _sending = SendingGuard { controller: self };

        let outcome = match self.client.send_reminders().await {
            Ok(body) => ReminderRequestOutcome {
                message_text: body
                    .reported()
                    .map(str::to_string)
                    .unwrap_or_else(|| self.locale.unknown_error()),
                is_error: false,
            },
            Err(ClientError::Status { status, body }) => {
                warn!(%status, "reminder request rejected");
                ReminderRequestOutcome {
                    message_text: body
                        .reported()
                        .map(str::to_string)
                        .unwrap_or_else(|| self.locale.unknown_error()),
                    is_error: true,
                }
            }
            Err(err) => {
                warn!("failed to send reminders: {err}");
                ReminderRequestOutcome {
                    message_text: self.locale.reminders_unreachable(),
                    is_error: true,
                }
            }
        };

        info!(is_error = outcome.is_error, message = %outcome.message_text, "reminders settled");
        self.state().outcome = Some(outcome.clone());
        if let Some(callback) = &self.on_sent {
            callback(&outcome);
        }
        Some(outcome)
    }
}
