use crate::chart::{self, ChartSegment};
use crate::client::PaymentClient;
use crate::errors::ClientError;
use crate::i18n::Locale;
use crate::models::{PaymentStatistics, StatsView};
use crate::refresh::RefreshSignal;
use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

#[derive(Debug)]
struct StatsState {
    stats: Option<PaymentStatistics>,
    segments: Vec<ChartSegment>,
    error: Option<String>,
    loading: bool,
    last_updated: Option<DateTime<Local>>,
}

impl Default for StatsState {
    /// Loading until the first fetch settles.
    fn default() -> Self {
        Self {
            stats: None,
            segments: Vec::new(),
            error: None,
            loading: true,
            last_updated: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Updated,
    Failed,
    /// A newer fetch was issued meanwhile; this response was dropped.
    Stale,
}

pub struct StatsController {
    state: Mutex<StatsState>,
    latest_ticket: AtomicU64,
    client: PaymentClient,
    locale: Locale,
}

/// Clears `loading` when the newest fetch settles or is cancelled.
struct LoadingGuard<'a> {
    controller: &'a StatsController,
    ticket: u64,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.controller.is_latest(self.ticket) {
            self.controller.state().loading = false;
        }
    }
}

impl StatsController {
    pub fn new(client: PaymentClient, locale: Locale) -> Self {
        Self {
            state: Mutex::new(StatsState::default()),
            latest_ticket: AtomicU64::new(0),
            client,
            locale,
        }
    }

    fn state(&self) -> MutexGuard<'_, StatsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.latest_ticket.load(Ordering::SeqCst) == ticket
    }

    fn next_ticket(&self) -> u64 {
        self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Applies `write` only if `ticket` is still the newest. The ticket is
    /// checked under the state lock so a fetch issued concurrently cannot
    /// slip in between the check and the write.
    fn commit(&self, ticket: u64, write: impl FnOnce(&mut StatsState)) -> bool {
        let mut state = self.state();
        if !self.is_latest(ticket) {
            return false;
        }
        write(&mut state);
        true
    }

    pub fn stats(&self) -> Option<PaymentStatistics> {
        self.state().stats
    }

    pub fn segments(&self) -> Vec<ChartSegment> {
        self.state().segments.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    /// True while there is nobody to remind.
    pub fn reminders_disabled(&self) -> bool {
        self.state()
            .stats
            .is_none_or(|stats| stats.total_people == 0)
    }

    pub fn view(&self) -> StatsView {
        let state = self.state();
        StatsView {
            stats: state.stats,
            total_people: state.stats.map_or(0, |stats| stats.total_people),
            segments: state.segments.clone(),
            legend: chart::legend(state.stats.as_ref()),
            error: state.error.clone(),
            loading: state.loading,
            reminders_disabled: state.stats.is_none_or(|stats| stats.total_people == 0),
            last_updated: state.last_updated,
        }
    }

    /// Fetches `GET /payment-stats`. Only the most recently issued fetch may
    /// write its result; older responses are discarded.
    pub async fn fetch(&self) -> FetchOutcome {
        let ticket = self.next_ticket();
        {
            let mut state = self.state();
            state.loading = true;
            state.error = None;
        }
        let _loading = LoadingGuard {
            controller: self,
            ticket,
        };

        let result = self.client.payment_stats().await;
        let (committed, outcome) = match result {
            Ok(stats) => {
                let segments = chart::derive_segments(Some(&stats));
                let committed = self.commit(ticket, |state| {
                    state.segments = segments;
                    state.stats = Some(stats);
                    state.error = None;
                    state.last_updated = Some(Local::now());
                });
                if committed {
                    info!(
                        total = stats.total_people,
                        full = stats.paid_full,
                        partial = stats.paid_partial,
                        none = stats.not_paid,
                        "payment stats updated"
                    );
                }
                (committed, FetchOutcome::Updated)
            }
            Err(err) => {
                let message = match &err {
                    ClientError::Status { body, .. } => body
                        .reported()
                        .map(str::to_string)
                        .unwrap_or_else(|| self.locale.stats_failed()),
                    ClientError::Transport(_) => self.locale.stats_unreachable(),
                };
                let committed = self.commit(ticket, |state| state.error = Some(message));
                if committed {
                    error!("failed to fetch payment stats: {err}");
                }
                (committed, FetchOutcome::Failed)
            }
        };

        if committed {
            outcome
        } else {
            debug!(ticket, "discarding stale payment stats response");
            FetchOutcome::Stale
        }
    }

    /// Re-fetches on every epoch change until the signal's source is dropped.
    pub fn watch(self: Arc<Self>, mut signal: RefreshSignal) -> JoinHandle<()> {
        tokio::spawn(async move {
            while signal.changed().await {
                self.fetch().await;
            }
            debug!("refresh source dropped, stats watcher stopping");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> StatsController {
        let client = PaymentClient::new("http://127.0.0.1:9").expect("client");
        StatsController::new(client, Locale::English)
    }

    #[test]
    fn starts_loading_without_stats() {
        let controller = controller();
        assert!(controller.is_loading());
        assert!(controller.stats().is_none());
        assert!(controller.reminders_disabled());
    }

    #[test]
    fn commit_rejects_superseded_ticket() {
        let controller = controller();
        let older = controller.next_ticket();
        let newer = controller.next_ticket();

        assert!(!controller.commit(older, |state| state.error = Some("old".into())));
        assert!(controller.error().is_none());

        assert!(controller.commit(newer, |state| state.error = Some("new".into())));
        assert_eq!(controller.error().as_deref(), Some("new"));
    }

    #[test]
    fn ticket_taken_while_writer_waits_for_lock_wins() {
        let controller = controller();
        let older = controller.next_ticket();

        // Hold the lock, issue a newer ticket, then let the older writer in.
        let guard = controller.state();
        let newer = controller.next_ticket();
        drop(guard);

        assert!(!controller.commit(older, |state| state.loading = false));
        assert!(controller.is_loading());
        assert!(controller.is_latest(newer));
    }
}
