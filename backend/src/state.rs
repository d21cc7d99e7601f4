use crate::config::Config;
use lorawatch_shared::{FeedMessage, RingBuffer};
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::broadcast;

pub struct AppState {
    /// Feed stream → every connected WebSocket client
    pub feed_tx: broadcast::Sender<FeedMessage>,

    /// Last few broadcasts, served by /api/recent
    pub recent: Mutex<RingBuffer<FeedMessage>>,

    /// Directory holding index.html and the /static assets
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            feed_tx: broadcast::channel(config.feed_capacity.max(1)).0,
            recent: Mutex::new(RingBuffer::new(config.recent_capacity)),
            static_dir: config.static_dir.clone(),
        }
    }

    /// Remembers `msg` and fans it out. Returns how many clients it reached.
    pub fn broadcast(&self, msg: FeedMessage) -> usize {
        self.recent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(msg.clone());

        match self.feed_tx.send(msg) {
            Ok(receivers) => receivers,
            Err(_) => {
                tracing::info!("no active WebSocket connections to broadcast to");
                0
            }
        }
    }

    /// Newest first.
    pub fn recent_messages(&self) -> Vec<FeedMessage> {
        let recent = self
            .recent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        recent.recent(recent.len()).into_iter().cloned().collect()
    }
}
