mod headless;

pub use headless::Headless;

use url::Url;

/// The engine's window onto the host page's DOM.
///
/// Every operation is a plain synchronous mutation or read: the host runs
/// handlers to completion on one logical thread, so implementations only
/// need interior mutability, not locking across suspension points. All
/// operations are best-effort; a target that doesn't exist yet is an
/// expected transient, not an error.
pub trait Page: Send + Sync + Clone + 'static {
    /// The current location. Recomputed by callers on every check; never
    /// cached.
    fn location(&self) -> Url;

    /// Add a class to the root element's class set. The root element exists
    /// from the earliest injection point, before `<body>` does.
    fn add_root_class(&self, class: &str);

    fn remove_root_class(&self, class: &str);

    /// Upsert the meta descriptor named `name` in the document head:
    /// created if absent, never duplicated, content overwritten.
    fn set_meta(&self, name: &str, content: &str);

    /// Look up a toggle-like control by CSS selector. `None` when the
    /// control is not (yet) in the document; otherwise its checked state.
    fn query_toggle(&self, selector: &str) -> Option<bool>;

    /// Simulate a user activation of the control matched by `selector`.
    /// A no-op when the control is absent.
    fn click(&self, selector: &str);

    /// Subscribe to the host page's navigation-finished events. The events
    /// carry no payload; handlers re-read `location()`.
    fn navigations(&self) -> tokio::sync::broadcast::Receiver<()>;
}
