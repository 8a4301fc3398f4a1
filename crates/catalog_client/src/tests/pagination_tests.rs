use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::pagination::{can_go_previous, set_moves_expanded, PaginationStore, CURRENT_PAGE_KEY};
use shared::domain::{CatalogItem, PokemonId};
use storage::{KeyValueStore, MemoryKeyValueStore};

struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(anyhow!("state row unreadable"))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("state row unwritable"))
    }
}

async fn store_with_page(raw: &str) -> (PaginationStore, Arc<MemoryKeyValueStore>) {
    let state = Arc::new(MemoryKeyValueStore::new());
    state.set(CURRENT_PAGE_KEY, raw).await.expect("seed");
    (PaginationStore::new(Arc::clone(&state) as Arc<dyn KeyValueStore>), state)
}

fn item(id: i64, moves: &[&str]) -> CatalogItem {
    CatalogItem {
        id: PokemonId(id),
        name: format!("entry-{id}"),
        image_url: None,
        moves: moves.iter().map(|name| name.to_string()).collect(),
        moves_expanded: false,
    }
}

#[tokio::test]
async fn initial_page_parses_persisted_value() {
    let (pages, _) = store_with_page("3").await;
    assert_eq!(pages.initial_page().await, 3);
}

#[tokio::test]
async fn initial_page_defaults_when_absent() {
    let pages = PaginationStore::new(Arc::new(MemoryKeyValueStore::new()));
    assert_eq!(pages.initial_page().await, 1);
}

#[tokio::test]
async fn initial_page_rejects_invalid_values() {
    for raw in ["banana", "0", "-2", ""] {
        let (pages, _) = store_with_page(raw).await;
        assert_eq!(pages.initial_page().await, 1, "value: {raw:?}");
    }
}

#[tokio::test]
async fn initial_page_falls_back_when_store_read_fails() {
    let pages = PaginationStore::new(Arc::new(FailingStore));
    assert_eq!(pages.initial_page().await, 1);
}

#[tokio::test]
async fn next_then_previous_returns_to_start() {
    let (pages, state) = store_with_page("5").await;

    let advanced = pages.next_page(5).await.expect("next");
    assert_eq!(advanced, 6);
    assert_eq!(
        state.get(CURRENT_PAGE_KEY).await.expect("get").as_deref(),
        Some("6")
    );

    let back = pages.previous_page(advanced).await.expect("previous");
    assert_eq!(back, 5);
    assert_eq!(
        state.get(CURRENT_PAGE_KEY).await.expect("get").as_deref(),
        Some("5")
    );
}

#[tokio::test]
async fn previous_clamps_at_the_first_page() {
    let (pages, state) = store_with_page("1").await;
    let page = pages.previous_page(1).await.expect("previous");
    assert_eq!(page, 1);
    assert_eq!(
        state.get(CURRENT_PAGE_KEY).await.expect("get").as_deref(),
        Some("1")
    );
}

#[tokio::test]
async fn navigation_surfaces_persistence_failures() {
    let pages = PaginationStore::new(Arc::new(FailingStore));
    assert!(pages.next_page(1).await.is_err());
    assert!(pages.previous_page(2).await.is_err());
}

#[test]
fn previous_control_is_disabled_on_the_first_page() {
    assert!(!can_go_previous(1));
    assert!(can_go_previous(2));
}

#[test]
fn toggling_one_item_leaves_the_other_untouched() {
    // Two-item page: six moves and two moves. Four are visible by default on
    // the long list, both on the short one; expanding reveals all six.
    let mut items = vec![
        item(1, &["a", "b", "c", "d", "e", "f"]),
        item(2, &["tackle", "growl"]),
    ];
    assert_eq!(items[0].visible_moves().len(), 4);
    assert_eq!(items[1].visible_moves().len(), 2);

    set_moves_expanded(&mut items, 0, true);
    assert!(items[0].moves_expanded);
    assert_eq!(items[0].visible_moves().len(), 6);
    assert!(!items[1].moves_expanded);

    set_moves_expanded(&mut items, 0, false);
    assert!(!items[0].moves_expanded);
    assert_eq!(items[0].visible_moves().len(), 4);
    assert!(!items[1].moves_expanded);
}

#[test]
fn out_of_bounds_toggle_is_a_no_op() {
    let mut items = vec![item(1, &["tackle"])];
    set_moves_expanded(&mut items, 5, true);
    assert!(!items[0].moves_expanded);
}
