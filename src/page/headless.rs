use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use url::Url;

use super::Page;

const NAVIGATION_BUFFER: usize = 16;

/// An in-memory page surface: a root class set, head meta descriptors, and
/// toggle controls keyed by selector. Used by tests and by embeddings that
/// have no live DOM to drive.
#[derive(Clone)]
pub struct Headless {
    dom: Arc<Mutex<Dom>>,
    navigations: broadcast::Sender<()>,
}

struct Dom {
    location: Url,
    root_classes: BTreeSet<String>,
    metas: BTreeMap<String, String>,
    toggles: BTreeMap<String, bool>,
}

impl Headless {
    pub fn new() -> Self {
        Self::at(Url::parse("https://www.youtube.com/").expect("static URL"))
    }

    pub fn at(location: Url) -> Self {
        Self {
            dom: Arc::new(Mutex::new(Dom {
                location,
                root_classes: BTreeSet::new(),
                metas: BTreeMap::new(),
                toggles: BTreeMap::new(),
            })),
            navigations: broadcast::Sender::new(NAVIGATION_BUFFER),
        }
    }

    /// Move to a new location and fire the navigation-finished event, the
    /// way the host's single-page routing does (no reload, same document).
    pub fn navigate(&self, location: Url) {
        self.dom.lock().location = location;

        if let Err(e) = self.navigations.send(()) {
            tracing::trace!(%e, "No subscribers for the navigation event");
        }
    }

    /// Insert (or replace) a toggle control, as the host page's own script
    /// does at unpredictable times.
    pub fn insert_toggle(&self, selector: &str, checked: bool) {
        self.dom.lock().toggles.insert(selector.to_string(), checked);
    }

    pub fn remove_toggle(&self, selector: &str) {
        self.dom.lock().toggles.remove(selector);
    }

    pub fn toggle_state(&self, selector: &str) -> Option<bool> {
        self.dom.lock().toggles.get(selector).copied()
    }

    pub fn has_root_class(&self, class: &str) -> bool {
        self.dom.lock().root_classes.contains(class)
    }

    pub fn root_classes(&self) -> Vec<String> {
        self.dom.lock().root_classes.iter().cloned().collect()
    }

    pub fn meta(&self, name: &str) -> Option<String> {
        self.dom.lock().metas.get(name).cloned()
    }
}

impl Default for Headless {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for Headless {
    fn location(&self) -> Url {
        self.dom.lock().location.clone()
    }

    fn add_root_class(&self, class: &str) {
        self.dom.lock().root_classes.insert(class.to_string());
    }

    fn remove_root_class(&self, class: &str) {
        self.dom.lock().root_classes.remove(class);
    }

    fn set_meta(&self, name: &str, content: &str) {
        self.dom
            .lock()
            .metas
            .insert(name.to_string(), content.to_string());
    }

    fn query_toggle(&self, selector: &str) -> Option<bool> {
        self.dom.lock().toggles.get(selector).copied()
    }

    fn click(&self, selector: &str) {
        let mut dom = self.dom.lock();

        if let Some(checked) = dom.toggles.get(selector).copied() {
            dom.toggles.insert(selector.to_string(), !checked);
        }
    }

    fn navigations(&self) -> broadcast::Receiver<()> {
        self.navigations.subscribe()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn click_flips_a_present_toggle_and_ignores_an_absent_one() {
        let page = Headless::new();

        page.click(".missing");
        assert_eq!(page.toggle_state(".missing"), None);

        page.insert_toggle(".toggle", true);
        page.click(".toggle");
        assert_eq!(page.toggle_state(".toggle"), Some(false));
    }

    #[test]
    fn set_meta_upserts_without_duplicating() {
        let page = Headless::new();

        page.set_meta("theme-color", "#0f0f0f");
        page.set_meta("theme-color", "#000000");

        assert_eq!(page.meta("theme-color"), Some("#000000".into()));
        assert_eq!(page.dom.lock().metas.len(), 1);
    }
}
