use std::time::Duration;

use tokio::sync::mpsc::channel;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::autoplay::AutoplaySuppressor;
use crate::engine::ClassSync;
use crate::page::Page;
use crate::store::SettingsStore;
use crate::Controller;

pub struct Worker {
    sync_task: JoinHandle<()>,
}

impl Worker {
    #[cfg_attr(feature = "tracing-instrument", tracing::instrument(skip(store, page)))]
    pub(crate) async fn new<S: SettingsStore, P: Page>(
        store: S,
        page: P,
        autoplay_poll_period: Duration,
    ) -> (Controller, Worker) {
        // Message flow:
        //
        // Controller ----> ClassSync ----> Page
        //                    ^    ^
        //     store changes -'    '- navigation events

        let (to_sync, sync_rx) = channel(1000);

        // Subscribe before the engine's first bulk read so no mutation or
        // navigation slips between the read and the loop.
        let changes = store.subscribe();
        let navigations = page.navigations();

        let controller = Controller::new(to_sync);
        let autoplay = AutoplaySuppressor::new(page.clone(), autoplay_poll_period);
        let sync = ClassSync::new(store, page, autoplay, sync_rx, changes, navigations);

        let span = tracing::debug_span!("spawned worker");

        let sync_task = tokio::spawn(sync.execute().instrument(span));

        let worker = Self { sync_task };

        // The reply can only arrive once the engine's initial bulk apply has
        // run, so the page reflects the store by the time we hand back.
        if let Err(e) = controller
            .settings()
            .instrument(tracing::debug_span!("Initial settings sync"))
            .await
        {
            tracing::debug!(%e, "Failed waiting for the initial settings application");
        }

        (controller, worker)
    }

    #[cfg_attr(feature = "tracing-instrument", tracing::instrument(skip(self)))]
    pub async fn wait(self) {
        // The sync task is tokio::spawn'd, so it is already executing in the
        // background; it shuts down once every Controller is dropped.
        if let Err(e) = self.sync_task.await {
            tracing::trace!(%e, "Class sync task ended with an error");
        }
    }
}
