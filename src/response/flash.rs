//! One-shot session messages shown on the next rendered page

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::Result;

const FLASH_KEY: &str = "_flash";

/// Pending messages grouped by severity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessages {
    #[serde(default)]
    pub success: Vec<String>,
    #[serde(default)]
    pub error: Vec<String>,
}

impl FlashMessages {
    pub fn is_empty(&self) -> bool {
        self.success.is_empty() && self.error.is_empty()
    }
}

/// Flash message access on top of the request session
pub struct Flash<'a> {
    session: &'a Session,
}

impl<'a> Flash<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub async fn success(&self, message: impl Into<String>) -> Result<()> {
        let mut pending = self.peek().await?;
        pending.success.push(message.into());
        self.session.insert(FLASH_KEY, pending).await?;
        Ok(())
    }

    pub async fn error(&self, message: impl Into<String>) -> Result<()> {
        let mut pending = self.peek().await?;
        pending.error.push(message.into());
        self.session.insert(FLASH_KEY, pending).await?;
        Ok(())
    }

    /// Remove and return everything pending
    pub async fn take(&self) -> Result<FlashMessages> {
        Ok(self
            .session
            .remove::<FlashMessages>(FLASH_KEY)
            .await?
            .unwrap_or_default())
    }

    async fn peek(&self) -> Result<FlashMessages> {
        Ok(self
            .session
            .get::<FlashMessages>(FLASH_KEY)
            .await?
            .unwrap_or_default())
    }
}
