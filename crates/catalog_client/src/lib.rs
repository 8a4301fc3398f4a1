use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::Client;
use shared::{
    domain::{CatalogItem, PokemonId},
    error::FetchError,
    protocol::{PokemonDetail, SummaryPage, SummaryRecord},
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{info, warn};
use url::Url;

pub mod pagination;
pub use pagination::{can_go_previous, set_moves_expanded, PaginationStore, CURRENT_PAGE_KEY};

/// Fixed batch size of the listing endpoint. Also the bound on the per-page
/// detail fan-out.
pub const PAGE_SIZE: u32 = 10;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Seam between the session and the concrete HTTP fetcher.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<Vec<CatalogItem>, FetchError>;
}

/// HTTP client for the catalog API: one batch listing per page, one detail
/// request per summary record, no caching and no retries.
pub struct CatalogClient {
    http: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build http client")?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    async fn fetch_batch(&self, page: u32) -> Result<SummaryPage, FetchError> {
        let offset = page.saturating_sub(1) * PAGE_SIZE;
        let response = self
            .http
            .get(format!("{}/pokemon", self.base_url))
            .query(&[("limit", PAGE_SIZE), ("offset", offset)])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| FetchError::BatchRequestFailed {
                page,
                reason: err.to_string(),
            })?;

        response
            .json::<SummaryPage>()
            .await
            .map_err(|err| FetchError::MalformedPayload {
                context: format!("batch listing for page {page}"),
                reason: err.to_string(),
            })
    }

    async fn fetch_detail(&self, summary: &SummaryRecord) -> Result<CatalogItem, FetchError> {
        let detail_url =
            Url::parse(&summary.url).map_err(|err| FetchError::MalformedPayload {
                context: format!("detail location for {}", summary.name),
                reason: err.to_string(),
            })?;

        let response = self
            .http
            .get(detail_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| FetchError::DetailRequestFailed {
                name: summary.name.clone(),
                reason: err.to_string(),
            })?;

        let detail: PokemonDetail =
            response
                .json()
                .await
                .map_err(|err| FetchError::MalformedPayload {
                    context: format!("detail payload for {}", summary.name),
                    reason: err.to_string(),
                })?;

        Ok(project_detail(detail))
    }
}

#[async_trait]
impl PageFetcher for CatalogClient {
    /// All-or-nothing page fetch: the batch listing first, then every detail
    /// request in parallel. The first detail failure discards the whole page;
    /// no partial list is ever returned. Ordering follows the batch.
    async fn fetch_page(&self, page: u32) -> Result<Vec<CatalogItem>, FetchError> {
        info!(page, "catalog: fetching page");
        let batch = self.fetch_batch(page).await?;

        let items = try_join_all(
            batch
                .results
                .iter()
                .map(|summary| self.fetch_detail(summary)),
        )
        .await?;

        info!(page, items = items.len(), "catalog: page ready");
        Ok(items)
    }
}

fn project_detail(detail: PokemonDetail) -> CatalogItem {
    CatalogItem {
        id: PokemonId(detail.id),
        name: detail.name,
        image_url: detail.sprites.front_default,
        moves: detail
            .moves
            .into_iter()
            .map(|slot| slot.move_ref.name)
            .collect(),
        moves_expanded: false,
    }
}

/// Immutable snapshots emitted to the rendering layer.
#[derive(Debug, Clone)]
pub enum CatalogEvent {
    PageLoading {
        page: u32,
    },
    PageLoaded {
        page: u32,
        items: Vec<CatalogItem>,
    },
    /// Every fetch failure surfaces as this one event; `message` is the
    /// single user-visible string, never a diagnostic.
    FetchFailed {
        page: u32,
        message: String,
    },
    ItemsUpdated {
        items: Vec<CatalogItem>,
    },
}

/// Long-lived browsing session: current page, current items and their
/// expansion flags, plus the in-flight fetch cycle.
///
/// Only one fetch cycle is live at a time. Navigating while a fetch is in
/// flight aborts the superseded task, and a stale outcome that slips through
/// is discarded by sequence number, so results are never applied out of
/// order.
pub struct CatalogSession {
    fetcher: Arc<dyn PageFetcher>,
    pages: PaginationStore,
    inner: Mutex<SessionState>,
    active_fetch: Mutex<Option<ActiveFetch>>,
    events: broadcast::Sender<CatalogEvent>,
}

struct SessionState {
    current_page: u32,
    items: Vec<CatalogItem>,
    loading: bool,
    fetch_seq: u64,
}

struct ActiveFetch {
    seq: u64,
    task: JoinHandle<()>,
}

impl CatalogSession {
    pub fn new(fetcher: Arc<dyn PageFetcher>, pages: PaginationStore) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            fetcher,
            pages,
            inner: Mutex::new(SessionState {
                current_page: 1,
                items: Vec::new(),
                loading: false,
                fetch_seq: 0,
            }),
            active_fetch: Mutex::new(None),
            events,
        })
    }

    /// Resolves the persisted page number and triggers the first fetch.
    pub async fn start(self: &Arc<Self>) -> u32 {
        let page = self.pages.initial_page().await;
        self.inner.lock().await.current_page = page;
        self.trigger_fetch(page).await;
        page
    }

    pub async fn next_page(self: &Arc<Self>) -> Result<u32> {
        let current = self.inner.lock().await.current_page;
        let page = self.pages.next_page(current).await?;
        self.inner.lock().await.current_page = page;
        self.trigger_fetch(page).await;
        Ok(page)
    }

    pub async fn previous_page(self: &Arc<Self>) -> Result<u32> {
        let current = self.inner.lock().await.current_page;
        let page = self.pages.previous_page(current).await?;
        if page == current {
            // Already at the floor; nothing to refetch.
            return Ok(page);
        }
        self.inner.lock().await.current_page = page;
        self.trigger_fetch(page).await;
        Ok(page)
    }

    /// Refetches the current page without touching pagination state.
    pub async fn reload(self: &Arc<Self>) -> u32 {
        let page = self.inner.lock().await.current_page;
        self.trigger_fetch(page).await;
        page
    }

    /// Flips one item's expansion flag and emits the updated snapshot.
    /// Out-of-bounds indexes are ignored.
    pub async fn set_moves_expanded(&self, index: usize, expanded: bool) {
        let items = {
            let mut inner = self.inner.lock().await;
            if index >= inner.items.len() {
                return;
            }
            set_moves_expanded(&mut inner.items, index, expanded);
            inner.items.clone()
        };
        let _ = self.events.send(CatalogEvent::ItemsUpdated { items });
    }

    pub async fn snapshot(&self) -> Vec<CatalogItem> {
        self.inner.lock().await.items.clone()
    }

    pub async fn current_page(&self) -> u32 {
        self.inner.lock().await.current_page
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.lock().await.loading
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<CatalogEvent> {
        self.events.subscribe()
    }

    async fn trigger_fetch(self: &Arc<Self>, page: u32) {
        let seq = {
            let mut inner = self.inner.lock().await;
            inner.fetch_seq += 1;
            inner.loading = true;
            inner.fetch_seq
        };
        let _ = self.events.send(CatalogEvent::PageLoading { page });

        let session = Arc::clone(self);
        let task = tokio::spawn(async move {
            let outcome = session.fetcher.fetch_page(page).await;
            session.apply_fetch_outcome(seq, page, outcome).await;
        });

        let previous = {
            let mut active = self.active_fetch.lock().await;
            active.replace(ActiveFetch { seq, task })
        };
        if let Some(previous) = previous {
            if !previous.task.is_finished() {
                warn!(
                    superseded_seq = previous.seq,
                    page, "catalog: aborting superseded page fetch"
                );
            }
            previous.task.abort();
        }
    }

    async fn apply_fetch_outcome(
        &self,
        seq: u64,
        page: u32,
        outcome: Result<Vec<CatalogItem>, FetchError>,
    ) {
        let event = {
            let mut inner = self.inner.lock().await;
            if inner.fetch_seq != seq {
                // A newer navigation superseded this cycle.
                return;
            }
            inner.loading = false;
            match outcome {
                Ok(items) => {
                    // Wholesale replacement: expansion flags reset with it.
                    inner.items = items.clone();
                    CatalogEvent::PageLoaded { page, items }
                }
                Err(err) => {
                    warn!(page, error = %err, "catalog: page fetch failed");
                    CatalogEvent::FetchFailed {
                        page,
                        message: err.user_message().to_string(),
                    }
                }
            }
        };
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests;
