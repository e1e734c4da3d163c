//! Integration tests for the archive-backed Maple client
//!
//! Archives are built in memory and served through an in-memory artifact
//! store; extraction happens in a temporary directory.

mod common;

use common::{ARTIFACT_ID, MemoryStore, archive_event, build_archive, maple_archive};
use maple_snapin::archive::WorkspaceOptions;
use maple_snapin::client::ArtifactStore;
use maple_snapin::maple::{MapleClient, normalize_customer};
use maple_snapin::{Event, EventType};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn client(store: Arc<MemoryStore>, work_dir: &TempDir, event: &Event) -> MapleClient {
    let store: Arc<dyn ArtifactStore> = store;
    MapleClient::from_event(
        event,
        store,
        WorkspaceOptions::new(Some(work_dir.path().to_path_buf()), false),
    )
    .unwrap()
}

#[tokio::test]
async fn test_customers_are_listed_and_normalized() {
    let work_dir = TempDir::new().unwrap();
    let store = Arc::new(MemoryStore::new(maple_archive()));
    let client = client(store, &work_dir, &archive_event(EventType::ExtractionDataStart));

    let customers = client.list_customers().await.unwrap();
    assert_eq!(customers.len(), 2);

    let items: Vec<_> = customers.into_iter().map(normalize_customer).collect();
    assert_eq!(items[0].id, "c-1");
    assert_eq!(items[0].data["name"], "Ada Lovelace");
    assert_eq!(items[0].data["company"], "Engines");
    assert_eq!(
        items[1].data["item_url_field"],
        "https://maple-data.com/customers/c-2"
    );
}

#[tokio::test]
async fn test_missing_article_text_uses_placeholder() {
    let work_dir = TempDir::new().unwrap();
    let store = Arc::new(MemoryStore::new(maple_archive()));
    let client = client(store, &work_dir, &archive_event(EventType::ExtractionDataStart));

    let articles = client.list_articles().await.unwrap();

    assert_eq!(articles.len(), 3);
    assert_eq!(articles[0].content, "# Intro\n\nWelcome.");
    assert_eq!(articles[1].content, "Content not found: missing.md");
    assert_eq!(articles[2].content, "Billing answers.");
}

#[tokio::test]
async fn test_missing_customers_file_fails_queries() {
    let work_dir = TempDir::new().unwrap();
    let store = Arc::new(MemoryStore::new(build_archive(&[(
        "maple_kb/articles.json",
        "[]",
    )])));
    let client = client(store, &work_dir, &archive_event(EventType::ExtractionDataStart));

    let err = client.list_customers().await.unwrap_err().to_string();
    assert!(err.contains("customers.json"), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_missing_articles_file_fails_queries() {
    let work_dir = TempDir::new().unwrap();
    let store = Arc::new(MemoryStore::new(build_archive(&[
        ("customers.json", "[]"),
        ("maple_kb/readme.md", "no metadata"),
    ])));
    let client = client(store, &work_dir, &archive_event(EventType::ExtractionDataStart));

    let err = client.list_articles().await.unwrap_err().to_string();
    assert!(err.contains("maple_kb/articles.json"), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_concurrent_queries_share_one_download() {
    let work_dir = TempDir::new().unwrap();
    let store = Arc::new(MemoryStore::new(maple_archive()).with_delay(Duration::from_millis(50)));
    let client = client(
        store.clone(),
        &work_dir,
        &archive_event(EventType::ExtractionExternalSyncUnitsStart),
    );

    let (customers, articles) = tokio::join!(client.list_customers(), client.list_articles());

    assert_eq!(customers.unwrap().len(), 2);
    assert_eq!(articles.unwrap().len(), 3);
    assert_eq!(store.fetches(), 1);
}

#[tokio::test]
async fn test_reference_from_keyring() {
    let work_dir = TempDir::new().unwrap();
    let store = Arc::new(MemoryStore::new(maple_archive()).with_keyring_reference(ARTIFACT_ID));
    let event = Event::new(EventType::ExtractionDataStart).with_external_system("maple-system");
    let client = client(store.clone(), &work_dir, &event);

    assert_eq!(client.list_customers().await.unwrap().len(), 2);
    assert_eq!(store.fetches(), 1);
}

#[tokio::test]
async fn test_workspace_removed_with_client() {
    let work_dir = TempDir::new().unwrap();
    let store = Arc::new(MemoryStore::new(maple_archive()));
    let client = client(store, &work_dir, &archive_event(EventType::ExtractionDataStart));

    client.list_customers().await.unwrap();
    assert_eq!(std::fs::read_dir(work_dir.path()).unwrap().count(), 1);

    drop(client);
    assert_eq!(std::fs::read_dir(work_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_keep_workspace_for_debugging() {
    let work_dir = TempDir::new().unwrap();
    let store: Arc<dyn ArtifactStore> = Arc::new(MemoryStore::new(maple_archive()));
    let client = MapleClient::from_event(
        &archive_event(EventType::ExtractionDataStart),
        store,
        WorkspaceOptions::new(Some(work_dir.path().to_path_buf()), true),
    )
    .unwrap();

    client.list_customers().await.unwrap();
    drop(client);

    let kept: Vec<_> = std::fs::read_dir(work_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(kept.len(), 1);
    assert!(kept[0].starts_with("maple-data-"));
}
