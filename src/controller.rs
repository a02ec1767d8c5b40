use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot::channel as oneshot;
use tracing::Instrument;

use crate::Settings;

#[derive(Debug)]
pub(crate) enum Signal {
    Refresh,
    GetSettings {
        tx: tokio::sync::oneshot::Sender<Settings>,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum ControllerError {
    #[error("Failed to signal the class sync engine: '{0}'")]
    SendToEngine(String),

    #[error(transparent)]
    Response(#[from] tokio::sync::oneshot::error::RecvError),
}

/// Cloneable handle to the running class sync engine. Dropping every
/// controller shuts the engine down.
pub struct Controller {
    outgoing: Sender<Signal>,
}

impl Clone for Controller {
    fn clone(&self) -> Self {
        Self {
            outgoing: self.outgoing.clone(),
        }
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller").finish()
    }
}

impl Controller {
    pub(crate) fn new(outgoing: Sender<Signal>) -> Self {
        Self { outgoing }
    }

    /// Re-pull every setting from the store and re-assert the page state.
    /// The comprehensive apply wins over any incremental change it races.
    #[cfg_attr(feature = "tracing-instrument", tracing::instrument(skip(self)))]
    pub async fn refresh(&self) {
        if let Err(e) = self
            .outgoing
            .send(Signal::Refresh)
            .instrument(tracing::trace_span!("sending the Refresh signal"))
            .await
        {
            tracing::error!(error = ?e, "Failed to enqueue a refresh");
        }
    }

    /// The engine's current settings snapshot.
    #[cfg_attr(feature = "tracing-instrument", tracing::instrument(skip(self)))]
    pub async fn settings(&self) -> Result<Settings, ControllerError> {
        let (tx, rx) = oneshot();

        self.outgoing
            .send(Signal::GetSettings { tx })
            .instrument(tracing::trace_span!("sending the GetSettings signal"))
            .await
            .map_err(|e| ControllerError::SendToEngine(format!("{e:?}")))?;

        Ok(rx
            .instrument(tracing::trace_span!("waiting for the snapshot"))
            .await?)
    }
}
