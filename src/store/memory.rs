use std::convert::Infallible;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;

use super::{SettingsChange, SettingsStore};
use crate::Settings;

const CHANGE_BUFFER: usize = 16;

/// In-process store adapter. Backs tests and embeddings that already have
/// settings in hand; durability stays with the embedder.
#[derive(Clone)]
pub struct Memory {
    state: Arc<RwLock<Settings>>,
    changes: broadcast::Sender<SettingsChange>,
}

impl Memory {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            state: Arc::new(RwLock::new(settings)),
            changes: broadcast::Sender::new(CHANGE_BUFFER),
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for Memory {
    type Error = Infallible;

    async fn get_all(&self) -> Result<Settings, Self::Error> {
        Ok(self.state.read().clone())
    }

    async fn get_many(&self, keys: &[&str]) -> Result<Settings, Self::Error> {
        let state = self.state.read();
        Ok(keys
            .iter()
            .filter_map(|key| state.get(*key).map(|value| (String::from(*key), *value)))
            .collect())
    }

    async fn set(&self, key: &str, value: bool) -> Result<(), Self::Error> {
        let old_value = self.state.write().insert(key.to_string(), value);

        if old_value == Some(value) {
            return Ok(());
        }

        if let Err(e) = self.changes.send(SettingsChange {
            key: key.to_string(),
            old_value,
            new_value: Some(value),
        }) {
            tracing::trace!(%e, "No subscribers for the settings change");
        }

        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SettingsChange> {
        self.changes.subscribe()
    }
}
