use tokio::sync::broadcast;

use crate::features;
use crate::store::SettingsStore;

/// One checkbox flip, as reported by the panel surface.
#[derive(Debug, PartialEq, Eq, Clone, serde::Serialize, serde::Deserialize)]
pub struct PanelToggle {
    pub key: String,
    pub checked: bool,
}

/// The settings panel's markup: one checkbox-like input per recognized key,
/// addressable by the key string itself.
pub trait PanelSurface: Send + Sync + 'static {
    fn set_checked(&self, key: &str, checked: bool);

    /// Subscribe to user flips of the bound checkboxes.
    fn toggles(&self) -> broadcast::Receiver<PanelToggle>;
}

/// Binds a panel surface to the settings store. The store is the only
/// state: initialization reads it, and every flip writes straight back.
/// Runs in its own context, independent of the class sync engine.
pub struct PanelController<S: SettingsStore, B: PanelSurface> {
    store: S,
    surface: B,
    toggles: broadcast::Receiver<PanelToggle>,
}

impl<S: SettingsStore, B: PanelSurface> PanelController<S, B> {
    /// Reflect the stored value of every known key into its checkbox
    /// (absent means unchecked) and start listening for flips. A failed
    /// read logs and leaves everything unchecked; the store remains
    /// authoritative either way.
    #[cfg_attr(feature = "tracing-instrument", tracing::instrument(skip(store, surface)))]
    pub async fn attach(store: S, surface: B) -> Self {
        let toggles = surface.toggles();

        let controller = Self {
            store,
            surface,
            toggles,
        };

        controller.sync_checkboxes().await;

        controller
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(mut self) {
        loop {
            match self.toggles.recv().await {
                Ok(PanelToggle { key, checked }) => {
                    if let Err(e) = self.store.set(&key, checked).await {
                        tracing::debug!(%e, key, "Storing a toggled setting failed");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Fell behind the panel, re-reading the store");
                    self.sync_checkboxes().await;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::debug!("Panel surface hung up, shutting down");

                    return;
                }
            }
        }
    }

    async fn sync_checkboxes(&self) {
        let keys: Vec<&str> = features::known_keys().collect();

        let stored = self
            .store
            .get_many(&keys)
            .await
            .inspect_err(|e| tracing::debug!(%e, "Reading the settings store failed"))
            .ok()
            .unwrap_or_default();

        for key in keys {
            self.surface
                .set_checked(key, stored.get(key).copied().unwrap_or(false));
        }
    }
}
