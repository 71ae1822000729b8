//! Handler types and dependencies

use std::sync::Arc;

use crate::relay::SessionRelay;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub relay: Arc<SessionRelay>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(relay: Arc<SessionRelay>) -> Self {
        Self { relay }
    }
}
