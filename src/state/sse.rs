use tokio::sync::{Mutex, broadcast};

use crate::dto::sse::ServerEvent;

/// SSE sub-state carved out of [`super::AppState`]: one hub per stream
/// plus the token coordinating the single admin connection.
pub struct SseState {
    public: SseHub,
    admin: SseHub,
    admin_token: Mutex<Option<String>>,
}

impl SseState {
    /// Build both hubs with the given broadcast channel capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            public: SseHub::new(capacity),
            admin: SseHub::new(capacity),
            admin_token: Mutex::new(None),
        }
    }

    /// Hub fanning out events every connected session should see.
    pub fn public(&self) -> &SseHub {
        &self.public
    }

    /// Hub carrying moderation-oriented events for the admin dashboard.
    pub fn admin(&self) -> &SseHub {
        &self.admin
    }

    /// Token slot ensuring a single admin stream at a time.
    pub fn admin_token(&self) -> &Mutex<Option<String>> {
        &self.admin_token
    }
}

/// Thin wrapper over a Tokio broadcast channel used by the SSE services.
pub struct SseHub {
    sender: broadcast::Sender<ServerEvent>,
}

impl SseHub {
    /// Construct a hub with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a subscriber receiving subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// Send an event to all current subscribers, ignoring delivery errors.
    pub fn broadcast(&self, event: ServerEvent) {
        let _ = self.sender.send(event);
    }
}
