use std::time::Duration;

use crate::autoplay;
use crate::page::Page;
use crate::store::SettingsStore;
use crate::{Controller, Worker};

#[derive(Default)]
pub struct Builder {
    autoplay_poll_period: Option<Duration>,
}

impl Builder {
    pub fn new() -> Self {
        Builder {
            autoplay_poll_period: None,
        }
    }

    /// Override the autoplay suppressor's poll period (2000ms by default).
    /// Mostly useful to make tests fast; the default is deliberately coarse
    /// for a control that appears at most once per navigation.
    pub fn set_autoplay_poll_period(mut self, period: Option<Duration>) -> Self {
        self.autoplay_poll_period = period;
        self
    }

    /// Wire the engine to a settings store and a page surface and start it.
    /// When this returns, the initial bulk apply has completed; incremental
    /// changes and navigation events are serviced from then on.
    ///
    /// ```rust
    /// use focus_tube_client::{Builder, page::Headless, store::Memory};
    ///
    /// # tokio_test::block_on(async {
    /// let (controller, worker) = Builder::new()
    ///     .build_with(Memory::new(), Headless::new())
    ///     .await;
    ///
    /// assert!(controller.settings().await.unwrap().is_empty());
    ///
    /// drop(controller);
    /// worker.wait().await;
    /// # })
    /// ```
    #[tracing::instrument(skip(self, store, page))]
    pub async fn build_with<S: SettingsStore, P: Page>(
        self,
        store: S,
        page: P,
    ) -> (Controller, Worker) {
        Worker::new(
            store,
            page,
            self.autoplay_poll_period
                .unwrap_or(autoplay::DEFAULT_POLL_PERIOD),
        )
        .await
    }
}
