use std::sync::{Mutex, MutexGuard};

use cinedeck_api::catalog::FetchError;
use cinedeck_api::traits::CatalogBackend;
use cinedeck_core::catalog::{normalize_query, paginate, CatalogPage};
use cinedeck_core::models::Movie;

/// Stateless paged access to the catalog. Every call refetches the
/// collection; there is no retry.
pub struct CatalogFetcher<B> {
    backend: B,
}

impl<B: CatalogBackend> CatalogFetcher<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub async fn fetch_page(
        &self,
        page_number: u32,
        query: Option<&str>,
    ) -> Result<CatalogPage, FetchError> {
        let movies = self.backend.fetch_all().await?;
        let page = paginate(movies, page_number, query);
        tracing::debug!(
            page = page.page_number,
            query = page.query.as_deref().unwrap_or(""),
            items = page.items.len(),
            has_more = page.has_more,
            "Fetched catalog page"
        );
        Ok(page)
    }

    pub async fn fetch_by_id(&self, id: u64) -> Result<Movie, FetchError> {
        self.backend.fetch_by_id(id).await
    }
}

/// What became of a browser request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page was applied to the accumulated list.
    Applied { items: usize },
    /// A newer request was issued meanwhile; the response was dropped.
    Stale,
    /// `load_more` with nothing left to load.
    Exhausted,
    /// `load_more` while a load for the active query is still running.
    InFlight,
}

/// What the list and search views render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowseSnapshot {
    pub items: Vec<Movie>,
    pub query: Option<String>,
    /// Last applied page; 0 before anything has loaded.
    pub page: u32,
    pub has_more: bool,
    pub loading: bool,
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
struct BrowseState {
    view: BrowseSnapshot,
    /// Ticket of the newest request; anything older is stale on arrival.
    latest: u64,
}

impl BrowseState {
    fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.view.loading = true;
        self.view.last_error = None;
        self.latest
    }
}

/// Accumulates catalog pages for one query at a time.
///
/// Page 1 replaces the list, later pages append, and a new query starts
/// over. Each request carries a ticket so a slow response for an older
/// query can never overwrite newer results.
pub struct CatalogBrowser<B> {
    fetcher: CatalogFetcher<B>,
    state: Mutex<BrowseState>,
}

impl<B: CatalogBackend> CatalogBrowser<B> {
    pub fn new(fetcher: CatalogFetcher<B>) -> Self {
        Self {
            fetcher,
            state: Mutex::new(BrowseState::default()),
        }
    }

    pub fn fetcher(&self) -> &CatalogFetcher<B> {
        &self.fetcher
    }

    pub fn snapshot(&self) -> BrowseSnapshot {
        self.lock().view.clone()
    }

    /// Switch to `query` (blank means the full catalog) and load its first page.
    pub async fn search(&self, query: Option<&str>) -> Result<PageOutcome, FetchError> {
        let query = normalize_query(query);
        let ticket = {
            let mut state = self.lock();
            let ticket = state.issue();
            state.view.query = query.clone();
            state.view.items.clear();
            state.view.page = 0;
            state.view.has_more = false;
            ticket
        };

        let result = self.fetcher.fetch_page(1, query.as_deref()).await;
        self.apply(ticket, result, false)
    }

    /// Reload the first page of the active query. The current items stay
    /// visible until the response lands.
    pub async fn refresh(&self) -> Result<PageOutcome, FetchError> {
        let (ticket, query) = {
            let mut state = self.lock();
            (state.issue(), state.view.query.clone())
        };

        let result = self.fetcher.fetch_page(1, query.as_deref()).await;
        self.apply(ticket, result, false)
    }

    /// Append the next page of the active query.
    pub async fn load_more(&self) -> Result<PageOutcome, FetchError> {
        let (ticket, page, query) = {
            let mut state = self.lock();
            if state.view.loading {
                return Ok(PageOutcome::InFlight);
            }
            if state.view.page > 0 && !state.view.has_more {
                return Ok(PageOutcome::Exhausted);
            }
            let next = state.view.page + 1;
            (state.issue(), next, state.view.query.clone())
        };

        let result = self.fetcher.fetch_page(page, query.as_deref()).await;
        self.apply(ticket, result, page > 1)
    }

    fn apply(
        &self,
        ticket: u64,
        result: Result<CatalogPage, FetchError>,
        append: bool,
    ) -> Result<PageOutcome, FetchError> {
        let mut state = self.lock();
        if ticket != state.latest {
            tracing::debug!(ticket, latest = state.latest, "Dropping stale catalog response");
            return Ok(PageOutcome::Stale);
        }
        state.view.loading = false;

        match result {
            Ok(page) => {
                let items = page.items.len();
                if append {
                    state.view.items.extend(page.items);
                } else {
                    state.view.items = page.items;
                }
                state.view.page = page.page_number;
                state.view.has_more = page.has_more;
                Ok(PageOutcome::Applied { items })
            }
            Err(e) => {
                tracing::warn!("Catalog load failed: {e}");
                state.view.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, BrowseState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
