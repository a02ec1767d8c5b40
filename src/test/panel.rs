use std::time::Duration;

use crate::store::{Memory, SettingsStore as _};
use crate::test::fake_panel::FakePanel;
use crate::{PanelController, Settings};

#[tokio::test]
async fn attach_reflects_stored_values_into_the_checkboxes() {
    super::init_tracing();

    let store = Memory::with_settings(Settings::from_iter([
        (String::from("hideChat"), true),
        (String::from("hideMetadata"), false),
    ]));
    let panel = FakePanel::new();

    let _controller = PanelController::attach(store, panel.clone()).await;

    assert_eq!(panel.checked("hideChat"), Some(true));
    assert_eq!(panel.checked("hideMetadata"), Some(false));

    // Absent keys default to unchecked, across the whole namespace.
    assert_eq!(panel.checked("hideShorts"), Some(false));
    assert_eq!(panel.checked("disableAutoplay"), Some(false));
}

#[tokio::test]
async fn every_flip_lands_in_the_store() {
    super::init_tracing();

    let store = Memory::new();
    let panel = FakePanel::new();

    let controller = PanelController::attach(store.clone(), panel.clone()).await;
    let task = tokio::spawn(controller.execute());

    let mut changes = store.subscribe();

    panel.flip("hideNavbar", true);
    let change = changes.recv().await.unwrap();
    assert_eq!(change.key, "hideNavbar");
    assert_eq!(change.new_value, Some(true));

    panel.flip("hideNavbar", false);
    let change = changes.recv().await.unwrap();
    assert_eq!(change.new_value, Some(false));

    assert_eq!(
        store.get_all().await.unwrap().get("hideNavbar"),
        Some(&false)
    );

    task.abort();
}

#[tokio::test]
async fn a_panel_flip_reaches_the_page() {
    super::init_tracing();

    let store = Memory::new();
    let page = crate::page::Headless::new();

    let (engine_controller, worker) = crate::Builder::new()
        .build_with(store.clone(), page.clone())
        .await;
    let worker = tokio::spawn(worker.wait());

    let panel = FakePanel::new();
    let panel_task = tokio::spawn(PanelController::attach(store, panel.clone()).await.execute());

    panel.flip("hideComments", true);
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(page.has_root_class("ft-hide-comments"));

    panel_task.abort();
    drop(engine_controller);
    worker.await.unwrap();
}
