mod autoplay;
mod builder;
mod context;
mod controller;
mod engine;
mod features;
pub mod page;
mod panel;
pub mod store;
mod worker;

pub use builder::Builder;
pub use context::PageType;
pub use controller::{Controller, ControllerError};
pub use features::known_keys;
pub use page::Page;
pub use panel::{PanelController, PanelSurface, PanelToggle};
pub use store::{SettingsChange, SettingsStore};
pub use worker::Worker;

#[cfg(test)]
mod test;

/// The flat key-value namespace shared with the settings store: flag name to
/// boolean. Keys absent from the map are treated as false everywhere.
pub type Settings = std::collections::HashMap<String, bool>;
