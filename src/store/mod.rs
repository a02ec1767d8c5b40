mod json_file;
mod memory;

pub use json_file::{Error as JsonFileError, JsonFile};
pub use memory::Memory;

use crate::Settings;

/// One mutation of the settings namespace, as delivered on the change
/// stream. `None` means the key was absent on that side of the mutation.
#[derive(Debug, PartialEq, Eq, Clone, serde::Serialize, serde::Deserialize)]
pub struct SettingsChange {
    pub key: String,
    pub old_value: Option<bool>,
    pub new_value: Option<bool>,
}

impl SettingsChange {
    /// Absent keys are falsy throughout the namespace.
    pub fn is_truthy(&self) -> bool {
        self.new_value.unwrap_or(false)
    }
}

/// The namespaced key-value store of named boolean flags.
///
/// The store is the sole source of truth: consumers hold no state beyond a
/// last-known snapshot and reconcile it from `get_all` plus the change
/// stream. Change events are emitted zero or more times per external
/// mutation with no ordering guarantee relative to concurrent reads beyond
/// eventual consistency; a comprehensive re-read always re-establishes the
/// correct end state.
pub trait SettingsStore: Send + Sync + Clone + 'static {
    type Error: std::error::Error + Send + Sync;

    fn get_all(&self) -> impl std::future::Future<Output = Result<Settings, Self::Error>> + Send;

    fn get_many(
        &self,
        keys: &[&str],
    ) -> impl std::future::Future<Output = Result<Settings, Self::Error>> + Send;

    fn set(
        &self,
        key: &str,
        value: bool,
    ) -> impl std::future::Future<Output = Result<(), Self::Error>> + Send;

    /// Subscribe to subsequent mutations. Receivers that fall behind see
    /// `Lagged` and are expected to resync with a fresh read.
    fn subscribe(&self) -> tokio::sync::broadcast::Receiver<SettingsChange>;
}
