mod common;

use common::{detail_doc, FakeStore};
use std::sync::Arc;
use std::time::Duration;

use spacetraveling::cache::{DetailCache, DEFAULT_REVALIDATE};
use spacetraveling::detail::{fetch_post, Resolution};

#[tokio::test]
async fn test_fetch_post_with_reading_time() {
    let store = FakeStore::new().with_document("abc", detail_doc("abc", "Criando um app CRA do zero", 250));

    let post = fetch_post(&store, "abc").await.unwrap();
    let post = post.resolved().unwrap();

    assert_eq!(post.uid, "abc");
    assert_eq!(post.title, "Criando um app CRA do zero");
    assert_eq!(post.author, "Danilo Vieira");
    assert_eq!(post.content.len(), 1);
    assert_eq!(post.content[0].heading, "H");
    assert_eq!(post.reading_time(), 2);
    assert_eq!(store.uid_requests(), vec!["abc"]);
}

#[tokio::test]
async fn test_unknown_slug_is_not_found() {
    let store = FakeStore::new();

    assert_eq!(fetch_post(&store, "missing").await.unwrap(), Resolution::NotFound);
}

#[tokio::test]
async fn test_empty_slug_makes_no_request() {
    let store = FakeStore::new();

    assert_eq!(fetch_post(&store, "").await.unwrap(), Resolution::NotFound);
    assert!(store.uid_requests().is_empty());
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let store = FakeStore::new().with_document("abc", detail_doc("abc", "A", 10));
    store.set_failing(true);

    assert!(fetch_post(&store, "abc").await.is_err());
}

#[tokio::test]
async fn test_first_lookup_is_pending_then_resolved() {
    let store = FakeStore::new().with_document("abc", detail_doc("abc", "First", 10));
    let cache = DetailCache::new(Arc::new(store.clone()), DEFAULT_REVALIDATE);

    let lookup = cache.lookup("abc").await;
    assert_eq!(lookup.state, Resolution::Pending);
    lookup.refresh.unwrap().await.unwrap();

    let lookup = cache.lookup("abc").await;
    assert_eq!(lookup.state.resolved().unwrap().title, "First");
    assert!(lookup.refresh.is_none());
    assert_eq!(store.uid_requests().len(), 1);
}

#[tokio::test]
async fn test_pending_lookups_share_one_fetch() {
    let store = FakeStore::new().with_document("abc", detail_doc("abc", "First", 10));
    let cache = DetailCache::new(Arc::new(store.clone()), DEFAULT_REVALIDATE);

    let first = cache.lookup("abc").await;
    let second = cache.lookup("abc").await;
    assert!(second.refresh.is_none());

    first.refresh.unwrap().await.unwrap();
    assert_eq!(store.uid_requests().len(), 1);
}

#[tokio::test]
async fn test_stale_entry_is_served_while_revalidating() {
    let store = FakeStore::new().with_document("abc", detail_doc("abc", "v1", 10));
    let cache = DetailCache::new(Arc::new(store.clone()), Duration::ZERO);

    cache.prerender("abc").await.unwrap();
    store.set_document("abc", detail_doc("abc", "v2", 10));

    // stale content first, the refetch replaces it afterwards
    let lookup = cache.lookup("abc").await;
    assert_eq!(lookup.state.resolved().unwrap().title, "v1");
    lookup.refresh.unwrap().await.unwrap();

    let state = cache.peek("abc").await.unwrap();
    assert_eq!(state.resolved().unwrap().title, "v2");
}

#[tokio::test]
async fn test_fresh_entry_is_not_refetched() {
    let store = FakeStore::new().with_document("abc", detail_doc("abc", "v1", 10));
    let cache = DetailCache::new(Arc::new(store.clone()), Duration::from_secs(1800));

    cache.prerender("abc").await.unwrap();
    let lookup = cache.lookup("abc").await;

    assert_eq!(lookup.state.resolved().unwrap().title, "v1");
    assert!(lookup.refresh.is_none());
    assert_eq!(store.uid_requests().len(), 1);
}

#[tokio::test]
async fn test_unknown_slug_resolves_to_not_found() {
    let store = FakeStore::new();
    let cache = DetailCache::new(Arc::new(store), DEFAULT_REVALIDATE);

    cache.lookup("missing").await.refresh.unwrap().await.unwrap();

    assert_eq!(cache.lookup("missing").await.state, Resolution::NotFound);
}

#[tokio::test]
async fn test_failed_first_fetch_is_retried() {
    let store = FakeStore::new().with_document("abc", detail_doc("abc", "v1", 10));
    let cache = DetailCache::new(Arc::new(store.clone()), DEFAULT_REVALIDATE);

    store.set_failing(true);
    cache.lookup("abc").await.refresh.unwrap().await.unwrap();
    assert!(cache.peek("abc").await.is_none());

    store.set_failing(false);
    let lookup = cache.lookup("abc").await;
    assert_eq!(lookup.state, Resolution::Pending);
    lookup.refresh.unwrap().await.unwrap();
    assert_eq!(
        cache.peek("abc").await.unwrap().resolved().unwrap().title,
        "v1"
    );
}

#[tokio::test]
async fn test_failed_revalidation_keeps_stale_content() {
    let store = FakeStore::new().with_document("abc", detail_doc("abc", "v1", 10));
    let cache = DetailCache::new(Arc::new(store.clone()), Duration::ZERO);

    cache.prerender("abc").await.unwrap();
    store.set_failing(true);

    cache.lookup("abc").await.refresh.unwrap().await.unwrap();
    assert_eq!(
        cache.peek("abc").await.unwrap().resolved().unwrap().title,
        "v1"
    );

    // a later request tries again
    store.set_failing(false);
    assert!(cache.lookup("abc").await.refresh.is_some());
}

#[tokio::test]
async fn test_unknown_slugs_stay_within_capacity() {
    let store = FakeStore::new();
    let cache = DetailCache::with_capacity(Arc::new(store), DEFAULT_REVALIDATE, 100);

    let mut refreshes = Vec::new();
    for i in 0..5000 {
        if let Some(refresh) = cache.lookup(&format!("missing-{}", i)).await.refresh {
            refreshes.push(refresh);
        }
    }
    for refresh in refreshes {
        refresh.await.unwrap();
    }

    assert_eq!(cache.capacity().await, 100);
    assert_eq!(cache.len().await, 100);
    // the most recent slugs are the ones kept
    assert_eq!(cache.peek("missing-4999").await, Some(Resolution::NotFound));
    assert!(cache.peek("missing-0").await.is_none());
}

#[tokio::test]
async fn test_surrounding_whitespace_shares_one_entry() {
    let store = FakeStore::new().with_document("abc", detail_doc("abc", "First", 10));
    let cache = DetailCache::new(Arc::new(store.clone()), DEFAULT_REVALIDATE);

    cache.lookup("abc").await.refresh.unwrap().await.unwrap();
    let lookup = cache.lookup(" abc ").await;

    assert_eq!(lookup.state.resolved().unwrap().title, "First");
    assert!(lookup.refresh.is_none());
    assert_eq!(cache.len().await, 1);
    assert_eq!(store.uid_requests(), vec!["abc"]);
}
