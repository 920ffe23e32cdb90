use devconsole_core::Navigator;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 16;

/// Instruction for whichever view layer is listening
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavigationEvent {
    Redirect { route: String },
}

/// [`Navigator`] that publishes redirects on a broadcast channel
///
/// Having no subscribers is not an error; the event is simply dropped.
#[derive(Debug, Clone)]
pub struct BroadcastNavigator {
    sender: broadcast::Sender<NavigationEvent>,
}

impl Default for BroadcastNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastNavigator {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<NavigationEvent> {
        self.sender.subscribe()
    }
}

impl Navigator for BroadcastNavigator {
    fn navigate(&self, route: &str) {
        let event = NavigationEvent::Redirect { route: route.to_string() };
        match self.sender.send(event) {
            Ok(receivers) => debug!(route, receivers, "navigation published"),
            Err(_) => debug!(route, "navigation dropped; no subscribers"),
        }
    }
}
