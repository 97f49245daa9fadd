use std::sync::Arc;

use tracing::debug;

use crate::storage::SlotStorage;

pub const SESSION_SLOT: &str = "current_user_email";

/// Email of the logged-in user, kept in session-scoped slots.
#[derive(Clone)]
pub struct SessionPointer {
    slots: Arc<dyn SlotStorage>,
}

impl SessionPointer {
    pub fn new(slots: Arc<dyn SlotStorage>) -> Self {
        Self { slots }
    }

    pub fn get(&self) -> anyhow::Result<Option<String>> {
        Ok(self
            .slots
            .get_item(SESSION_SLOT)?
            .filter(|email| !email.is_empty()))
    }

    pub fn set(&self, email: &str) -> anyhow::Result<()> {
        self.slots.set_item(SESSION_SLOT, email)?;
        debug!(email = %email, "session set");
        Ok(())
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        self.slots.remove_item(SESSION_SLOT)?;
        debug!("session cleared");
        Ok(())
    }
}
