use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::panel::{PanelSurface, PanelToggle};

/// A panel surface over plain maps: checkboxes keyed by flag name, flips
/// injected by the test.
#[derive(Clone)]
pub(crate) struct FakePanel {
    checkboxes: Arc<Mutex<BTreeMap<String, bool>>>,
    toggles: broadcast::Sender<PanelToggle>,
}

impl FakePanel {
    pub(crate) fn new() -> Self {
        Self {
            checkboxes: Arc::new(Mutex::new(BTreeMap::new())),
            toggles: broadcast::Sender::new(16),
        }
    }

    pub(crate) fn checked(&self, key: &str) -> Option<bool> {
        self.checkboxes.lock().get(key).copied()
    }

    /// Simulate the user flipping a checkbox.
    pub(crate) fn flip(&self, key: &str, checked: bool) {
        self.checkboxes.lock().insert(key.to_string(), checked);

        let _ = self.toggles.send(PanelToggle {
            key: key.to_string(),
            checked,
        });
    }
}

impl PanelSurface for FakePanel {
    fn set_checked(&self, key: &str, checked: bool) {
        self.checkboxes.lock().insert(key.to_string(), checked);
    }

    fn toggles(&self) -> broadcast::Receiver<PanelToggle> {
        self.toggles.subscribe()
    }
}
