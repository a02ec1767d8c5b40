use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::fs::OpenOptions;
use tokio::io::AsyncReadExt;
use tokio::sync::broadcast;

use super::{SettingsChange, SettingsStore};
use crate::Settings;

const XDG_PREFIX: &str = "focus-tube";
const XDG_STORAGE_FILENAME: &str = "settings.json";
const CHANGE_BUFFER: usize = 16;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("No HOME is available")]
    NoHome,

    #[error("The storage location has no parent directory")]
    LocationHasNoParent,

    #[error("Serializing / deserializing failure: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Loading settings failed when opening the file `{0}`: {1}")]
    Open(PathBuf, std::io::Error),

    #[error("Creating the settings file `{0}` failed: {1}")]
    Create(PathBuf, std::io::Error),

    #[error("Reading settings from `{0}` failed: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Writing settings to `{0}` failed: {1}")]
    Write(PathBuf, std::io::Error),

    #[error(transparent)]
    Persist(#[from] tempfile::PersistError),

    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
}

/// Durable store adapter: the flat flag namespace persisted as one JSON
/// object. Every mutation is written through atomically (tempfile, then
/// rename into place).
#[derive(Clone)]
pub struct JsonFile {
    location: PathBuf,
    directory: PathBuf,
    state: Arc<RwLock<Settings>>,
    changes: broadcast::Sender<SettingsChange>,
}

impl JsonFile {
    /// Open the settings namespace at `location`, loading whatever is
    /// already persisted there. A missing file is a fresh namespace, not an
    /// error.
    #[tracing::instrument]
    pub async fn attach(location: PathBuf) -> Result<Self, Error> {
        let directory = location
            .parent()
            .ok_or(Error::LocationHasNoParent)?
            .to_owned();

        let settings = load(&location).await?.unwrap_or_default();

        Ok(Self {
            location,
            directory,
            state: Arc::new(RwLock::new(settings)),
            changes: broadcast::Sender::new(CHANGE_BUFFER),
        })
    }

    pub async fn try_default() -> Result<Self, Error> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix(XDG_PREFIX);

        let file = xdg_dirs
            .place_state_file(XDG_STORAGE_FILENAME)
            .map_err(|e| {
                match xdg_dirs
                    .get_state_file(XDG_STORAGE_FILENAME)
                    .ok_or(Error::NoHome)
                {
                    Ok(loc) => Error::Create(loc, e),
                    Err(e) => e,
                }
            })?;

        Self::attach(file).await
    }

    async fn persist(&self) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(&*self.state.read())?;

        let directory = self.directory.clone();
        let location = self.location.clone();

        tokio::task::spawn_blocking(move || -> Result<(), Error> {
            let mut tempfile = tempfile::NamedTempFile::new_in(&directory)
                .map_err(|e| Error::Create(directory.clone(), e))?;

            tempfile
                .write_all(json.as_bytes())
                .map_err(|e| Error::Write(tempfile.path().into(), e))?;

            tempfile.persist(&location)?;

            Ok(())
        })
        .await??;

        tracing::trace!(location = ?self.location, "Settings persisted");

        Ok(())
    }
}

#[tracing::instrument]
async fn load(location: &PathBuf) -> Result<Option<Settings>, Error> {
    let mut file = match OpenOptions::new().read(true).open(location).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::Open(location.clone(), e)),
    };

    let mut contents = vec![];
    file.read_to_end(&mut contents)
        .await
        .map_err(|e| Error::Read(location.clone(), e))?;

    Ok(Some(serde_json::from_slice(&contents)?))
}

impl SettingsStore for JsonFile {
    type Error = Error;

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

    #[cfg_attr(feature = "tracing-instrument", tracing::instrument(skip(self)))]
    async fn set(&self, key: &str, value: bool) -> Result<(), Self::Error> {
        let old_value = self.state.write().insert(key.to_string(), value);

        if old_value == Some(value) {
            return Ok(());
        }

        self.persist().await?;

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
