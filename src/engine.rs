use tokio::sync::broadcast;
use tokio::sync::mpsc::Receiver;
use tracing::Instrument;

use crate::autoplay::AutoplaySuppressor;
use crate::context;
use crate::controller::Signal;
use crate::features;
use crate::page::Page;
use crate::store::{SettingsChange, SettingsStore};
use crate::Settings;

/// The class sync actor: owns the current settings snapshot and keeps the
/// page's root class set, watch-page context, and autoplay suppressor in
/// agreement with the store.
pub(crate) struct ClassSync<S: SettingsStore, P: Page> {
    store: S,
    page: P,
    snapshot: Settings,
    autoplay: AutoplaySuppressor<P>,
    incoming: Receiver<Signal>,
    changes: broadcast::Receiver<SettingsChange>,
    navigations: broadcast::Receiver<()>,
}

impl<S: SettingsStore, P: Page> ClassSync<S, P> {
    pub(crate) fn new(
        store: S,
        page: P,
        autoplay: AutoplaySuppressor<P>,
        incoming: Receiver<Signal>,
        changes: broadcast::Receiver<SettingsChange>,
        navigations: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            store,
            page,
            snapshot: Settings::default(),
            autoplay,
            incoming,
            changes,
            navigations,
        }
    }

    #[tracing::instrument(skip(self))]
    pub(crate) async fn execute(mut self) {
        // The initial bulk apply runs before any queued incremental change;
        // an event that raced the load is applied afterwards, and
        // last-applied-wins per key keeps the end state correct.
        self.refresh_from_store().await;

        let mut navigations_open = true;

        loop {
            tokio::select! {
                biased;
                signal = self.incoming.recv() => {
                    let Some(signal) = signal else {
                        tracing::debug!("Controller clients hung up, shutting down");

                        return;
                    };

                    match signal {
                        Signal::Refresh => {
                            self.refresh_from_store().await;
                        }
                        Signal::GetSettings { tx } => {
                            self.handle_message_get_settings(tx);
                        }
                    }
                },
                change = self.changes.recv() => {
                    match change {
                        Ok(change) => {
                            self.handle_change(change);
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::debug!(skipped, "Fell behind the change stream, re-reading the store");
                            self.refresh_from_store().await;
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            tracing::debug!("Settings store hung up, shutting down");

                            return;
                        }
                    }
                },
                navigation = self.navigations.recv(), if navigations_open => {
                    match navigation {
                        // Payload-free event; the context re-reads the location.
                        Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                            context::refresh(&self.page, &self.snapshot);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            tracing::debug!("Navigation events ended");
                            navigations_open = false;
                        }
                    }
                },
            };
        }
    }

    /// Bulk-load the store and re-assert everything: classes, context, and
    /// the autoplay suppressor. A failed read is "not applied this cycle";
    /// the next event self-corrects.
    #[cfg_attr(feature = "tracing-instrument", tracing::instrument(skip(self)))]
    async fn refresh_from_store(&mut self) {
        let settings = match self
            .store
            .get_all()
            .instrument(tracing::trace_span!("bulk-reading the settings store"))
            .await
        {
            Ok(settings) => settings,
            Err(e) => {
                tracing::debug!(%e, "Bulk-reading the settings store failed");

                return;
            }
        };

        self.apply_all(settings);

        self.autoplay.set_enabled(
            self.snapshot
                .get(features::DISABLE_AUTOPLAY)
                .copied()
                .unwrap_or(false),
        );
    }

    /// Overwrite the snapshot and toggle every class in the feature mapping:
    /// truthy adds, falsy or absent removes. Idempotent; touches only the
    /// root element, which exists before the rest of the page has loaded.
    fn apply_all(&mut self, settings: Settings) {
        self.snapshot = settings;

        for (key, class) in features::FEATURES {
            if self.snapshot.get(key).copied().unwrap_or(false) {
                self.page.add_root_class(class);
            } else {
                self.page.remove_root_class(class);
            }
        }

        context::refresh(&self.page, &self.snapshot);
    }

    /// Patch one snapshot entry and, for mapped keys, its class. Keys
    /// outside the mapping still update the snapshot. The context re-runs
    /// only when the dark-video-page value actually changed.
    fn apply_one(&mut self, key: &str, new_value: Option<bool>) {
        let old_value = match new_value {
            Some(value) => self.snapshot.insert(key.to_string(), value),
            None => self.snapshot.remove(key),
        };

        let truthy = new_value.unwrap_or(false);

        if let Some(class) = features::class_for(key) {
            if truthy {
                self.page.add_root_class(class);
            } else {
                self.page.remove_root_class(class);
            }
        }

        if key == features::DARK_VIDEO_PAGE && old_value.unwrap_or(false) != truthy {
            context::refresh(&self.page, &self.snapshot);
        }
    }

    #[cfg_attr(feature = "tracing-instrument", tracing::instrument(skip(self)))]
    fn handle_change(&mut self, change: SettingsChange) {
        if change.key == features::DISABLE_AUTOPLAY {
            self.autoplay.set_enabled(change.is_truthy());
        }

        self.apply_one(&change.key, change.new_value);
    }

    fn handle_message_get_settings(&self, tx: tokio::sync::oneshot::Sender<Settings>) {
        if tx.send(self.snapshot.clone()).is_err() {
            tracing::debug!("Snapshot requester hung up");
        }
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::*;
    use crate::page::Headless;
    use crate::store::Memory;

    fn engine(page: Headless) -> ClassSync<Memory, Headless> {
        let store = Memory::new();
        let (_tx, rx) = tokio::sync::mpsc::channel(16);
        let changes = store.subscribe();
        let navigations = page.navigations();
        let autoplay = AutoplaySuppressor::new(page.clone(), Duration::from_millis(10));

        ClassSync::new(store, page, autoplay, rx, changes, navigations)
    }

    #[tokio::test]
    async fn apply_all_is_idempotent_and_treats_absent_as_false() {
        let page = Headless::new();
        let mut sync = engine(page.clone());

        let settings = Settings::from_iter([
            (String::from("hideShorts"), true),
            (String::from("hideChat"), false),
        ]);

        sync.apply_all(settings.clone());
        let after_once = page.root_classes();

        sync.apply_all(settings);
        assert_eq!(page.root_classes(), after_once);

        assert!(page.has_root_class("ft-hide-shorts"));
        assert!(!page.has_root_class("ft-hide-chat"));
        assert!(!page.has_root_class("ft-hide-related"));
    }

    #[tokio::test]
    async fn apply_all_removes_classes_dropped_from_the_snapshot() {
        let page = Headless::new();
        let mut sync = engine(page.clone());

        sync.apply_all(Settings::from_iter([(String::from("hideLogo"), true)]));
        assert!(page.has_root_class("ft-hide-logo"));

        sync.apply_all(Settings::default());
        assert!(!page.has_root_class("ft-hide-logo"));
    }

    #[tokio::test]
    async fn apply_one_updates_the_snapshot_even_for_unmapped_keys() {
        let page = Headless::new();
        let mut sync = engine(page.clone());
        let classes_before = page.root_classes();

        sync.apply_one("disableAutoplay", Some(true));

        assert_eq!(sync.snapshot.get("disableAutoplay"), Some(&true));
        assert_eq!(page.root_classes(), classes_before);
    }

    #[tokio::test]
    async fn apply_one_clears_the_entry_on_a_removed_key() {
        let page = Headless::new();
        let mut sync = engine(page.clone());

        sync.apply_one("hideNavbar", Some(true));
        assert!(page.has_root_class("ft-hide-navbar"));

        sync.apply_one("hideNavbar", None);
        assert!(!sync.snapshot.contains_key("hideNavbar"));
        assert!(!page.has_root_class("ft-hide-navbar"));
    }
}
