//! Cross-tab Signals
//!
//! A named in-process broadcast channel standing in for the browser's
//! `BroadcastChannel`. Signals carry no payload beyond "the tree changed";
//! receivers re-fetch.

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, warn};
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 64;

/// Identifies one session attached to a channel.
pub type TabId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabSignal {
    TreeChanged { origin: TabId },
}

impl TabSignal {
    pub fn origin(&self) -> TabId {
        match self {
            TabSignal::TreeChanged { origin } => *origin,
        }
    }
}

/// Shared by every session of one account. Clone to hand it to another tab.
#[derive(Debug, Clone)]
pub struct TabChannel {
    name: String,
    sender: broadcast::Sender<TabSignal>,
}

impl TabChannel {
    pub fn new(name: impl Into<String>) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            name: name.into(),
            sender,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach a new tab with its own id.
    pub fn subscribe(&self) -> TabSubscription {
        TabSubscription {
            tab_id: Uuid::new_v4(),
            sender: self.sender.clone(),
            receiver: self.sender.subscribe(),
        }
    }

    pub fn publish(&self, signal: TabSignal) {
        // No receivers is fine: nobody else is listening.
        if self.sender.send(signal).is_err() {
            debug!(channel = %self.name, "signal dropped, no listeners");
        }
    }
}

pub struct TabSubscription {
    tab_id: TabId,
    sender: broadcast::Sender<TabSignal>,
    receiver: broadcast::Receiver<TabSignal>,
}

impl TabSubscription {
    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    pub fn notify_changed(&self) {
        let _ = self.sender.send(TabSignal::TreeChanged { origin: self.tab_id });
    }

    /// Consume everything queued so far. Returns true when at least one
    /// signal came from another tab. Lagging counts as foreign: signals were
    /// lost, so a re-fetch is the only safe answer.
    pub fn drain_foreign(&mut self) -> bool {
        let mut foreign = false;
        loop {
            match self.receiver.try_recv() {
                Ok(signal) => foreign |= signal.origin() != self.tab_id,
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "tab signal receiver lagged");
                    foreign = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        foreign
    }

    /// Wait for the next signal from another tab. `None` once the channel
    /// is gone.
    pub async fn changed(&mut self) -> Option<TabSignal> {
        loop {
            match self.receiver.recv().await {
                Ok(signal) if signal.origin() == self.tab_id => continue,
                Ok(signal) => return Some(signal),
                Err(broadcast::error::RecvError::Lagged(_)) => {
                    return Some(TabSignal::TreeChanged { origin: Uuid::nil() })
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
