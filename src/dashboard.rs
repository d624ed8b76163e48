//! Root coordinator.
//!
//! Owns the refresh epoch: an upload success flips it, the stats watcher sees
//! the change and re-fetches. Nothing else may produce a new epoch.

use crate::client::PaymentClient;
use crate::config::Config;
use crate::errors::ClientError;
use crate::i18n::Locale;
use crate::models::{DashboardSnapshot, ReminderRequestOutcome};
use crate::refresh::RefreshSource;
use crate::reminders::ReminderController;
use crate::stats::StatsController;
use crate::upload::UploadController;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub struct Dashboard {
    client: PaymentClient,
    locale: Locale,
    refresh: Arc<RefreshSource>,
    upload: UploadController,
    stats: Arc<StatsController>,
    reminders: ReminderController,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl Dashboard {
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let client = PaymentClient::new(config.api_url.clone())?;
        Ok(Self::new(client, config.locale, config.message_ttl))
    }

    pub fn new(client: PaymentClient, locale: Locale, message_ttl: Duration) -> Self {
        let refresh = Arc::new(RefreshSource::new());

        let epoch = Arc::clone(&refresh);
        let upload = UploadController::new(client.clone(), locale, message_ttl)
            .on_success(Arc::new(move || epoch.flip()));

        let reminders = ReminderController::new(client.clone(), locale).on_sent(Arc::new(
            |outcome: &ReminderRequestOutcome| {
                info!(
                    is_error = outcome.is_error,
                    "reminder button reported: {}", outcome.message_text
                );
            },
        ));

        Self {
            stats: Arc::new(StatsController::new(client.clone(), locale)),
            client,
            locale,
            refresh,
            upload,
            reminders,
            watcher: Mutex::new(None),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn upload(&self) -> &UploadController {
        &self.upload
    }

    pub fn stats(&self) -> &Arc<StatsController> {
        &self.stats
    }

    pub fn reminders(&self) -> &ReminderController {
        &self.reminders
    }

    pub fn refresh_epoch(&self) -> bool {
        self.refresh.epoch()
    }

    /// Checks connectivity, loads the first stats and starts watching the
    /// refresh epoch. Calling it again only re-fetches.
    pub async fn mount(&self) {
        match self.client.check_connection().await {
            Ok(body) => info!(
                base_url = self.client.base_url(),
                "backend reachable: {}",
                body.reported().unwrap_or("")
            ),
            Err(err) => error!(
                base_url = self.client.base_url(),
                "backend connectivity check failed: {err}"
            ),
        }

        let signal = self.refresh.subscribe();
        self.stats.fetch().await;

        let mut watcher = self.watcher.lock().unwrap_or_else(PoisonError::into_inner);
        if watcher.is_none() {
            *watcher = Some(Arc::clone(&self.stats).watch(signal));
        }
    }

    /// Sends reminders, gated on the currently loaded stats.
    pub async fn send_reminders(&self) -> Option<ReminderRequestOutcome> {
        let disabled = self.stats.reminders_disabled();
        self.reminders.send_reminders(disabled).await
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            upload: self.upload.view(),
            stats: self.stats.view(),
            reminders: self.reminders.view(),
        }
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        let watcher = self.watcher.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = watcher.take() {
            handle.abort();
        }
    }
}
