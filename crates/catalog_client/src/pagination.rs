use std::sync::Arc;

use anyhow::{Context, Result};
use shared::domain::CatalogItem;
use storage::KeyValueStore;
use tracing::warn;

/// Key under which the page number is persisted, as a base-10 integer string.
pub const CURRENT_PAGE_KEY: &str = "currentPage";

/// Owns the persisted page number. Navigation persists before returning so a
/// process restart always resumes at the last page the user saw.
#[derive(Clone)]
pub struct PaginationStore {
    state: Arc<dyn KeyValueStore>,
}

impl PaginationStore {
    pub fn new(state: Arc<dyn KeyValueStore>) -> Self {
        Self { state }
    }

    /// Restores the persisted page number. Absent, unparsable and non-positive
    /// values all fall back to page 1, as does a failing read: a session must
    /// start even when the state row is corrupt.
    pub async fn initial_page(&self) -> u32 {
        match self.state.get(CURRENT_PAGE_KEY).await {
            Ok(Some(raw)) => match raw.trim().parse::<u32>() {
                Ok(page) if page >= 1 => page,
                _ => {
                    warn!(value = %raw, "pagination: ignoring invalid persisted page");
                    1
                }
            },
            Ok(None) => 1,
            Err(err) => {
                warn!(error = %err, "pagination: failed to read persisted page, starting at 1");
                1
            }
        }
    }

    /// Advances one page. There is no upper bound; a page past the end of the
    /// catalog legitimately yields an empty batch.
    pub async fn next_page(&self, current: u32) -> Result<u32> {
        let page = current.saturating_add(1);
        self.persist(page).await?;
        Ok(page)
    }

    /// Goes back one page, clamped at 1.
    pub async fn previous_page(&self, current: u32) -> Result<u32> {
        let page = current.saturating_sub(1).max(1);
        self.persist(page).await?;
        Ok(page)
    }

    async fn persist(&self, page: u32) -> Result<()> {
        self.state
            .set(CURRENT_PAGE_KEY, &page.to_string())
            .await
            .with_context(|| format!("failed to persist page number {page}"))
    }
}

/// The Previous control is disabled on the first page.
pub fn can_go_previous(page: u32) -> bool {
    page > 1
}

/// Flips one item's transient expansion flag. Out-of-bounds indexes are a
/// no-op; other items are never touched.
pub fn set_moves_expanded(items: &mut [CatalogItem], index: usize, expanded: bool) {
    if let Some(item) = items.get_mut(index) {
        item.moves_expanded = expanded;
    }
}
