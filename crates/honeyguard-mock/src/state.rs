use std::sync::Arc;

use tokio::sync::RwLock;

use crate::honeypot::Honeypot;

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct MockState {
    pub honeypot: Arc<RwLock<Honeypot>>,
}

impl MockState {
    pub fn new(honeypot: Honeypot) -> Self {
        Self {
            honeypot: Arc::new(RwLock::new(honeypot)),
        }
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self::new(Honeypot::new())
    }
}
