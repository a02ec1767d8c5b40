use std::time::Duration;

use tokio::task::JoinHandle;

use crate::page::Page;

/// The host player inserts this control asynchronously, and re-inserts it
/// on navigation; a low-frequency indefinite poll is the simplest correct
/// strategy given no insertion event exists.
const AUTONAV_TOGGLE_SELECTOR: &str = ".ytp-autonav-toggle-button";

pub(crate) const DEFAULT_POLL_PERIOD: Duration = Duration::from_millis(2000);

/// Owner of the one long-lived timer in the system. Two states: Idle (no
/// poll task) and Polling (exactly one). `set_enabled` always clears the
/// existing task before evaluating the desired state, so repeated setting
/// changes can never accumulate duplicate suppressors.
pub(crate) struct AutoplaySuppressor<P: Page> {
    page: P,
    period: Duration,
    poll: Option<JoinHandle<()>>,
}

impl<P: Page> AutoplaySuppressor<P> {
    pub(crate) fn new(page: P, period: Duration) -> Self {
        Self {
            page,
            period,
            poll: None,
        }
    }

    #[cfg_attr(feature = "tracing-instrument", tracing::instrument(skip(self)))]
    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        if let Some(poll) = self.poll.take() {
            poll.abort();
        }

        if !enabled {
            return;
        }

        let page = self.page.clone();
        let period = self.period;

        self.poll = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                interval.tick().await;

                // Present and on: click it off. Absent or already off: this
                // cycle is a no-op.
                if let Some(true) = page.query_toggle(AUTONAV_TOGGLE_SELECTOR) {
                    page.click(AUTONAV_TOGGLE_SELECTOR);
                    tracing::debug!("Autoplay disabled");
                }
            }
        }));
    }

    pub(crate) fn is_polling(&self) -> bool {
        self.poll.is_some()
    }
}

impl<P: Page> Drop for AutoplaySuppressor<P> {
    fn drop(&mut self) {
        if let Some(poll) = self.poll.take() {
            poll.abort();
        }
    }
}
