use tokio::sync::watch;

/// Producer side of the refresh epoch. Only the dashboard owns one.
#[derive(Debug)]
pub struct RefreshSource {
    tx: watch::Sender<bool>,
}

impl Default for RefreshSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshSource {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Toggles the epoch; every subscriber sees a change.
    pub fn flip(&self) {
        self.tx.send_modify(|epoch| *epoch = !*epoch);
    }

    pub fn epoch(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> RefreshSignal {
        RefreshSignal {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read-only consumer side. Only changes matter, never the value.
#[derive(Debug, Clone)]
pub struct RefreshSignal {
    rx: watch::Receiver<bool>,
}

impl RefreshSignal {
    /// Waits for the next epoch change. Returns `false` once the source is gone.
    /// Flips that land while nobody waits collapse into one change.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
