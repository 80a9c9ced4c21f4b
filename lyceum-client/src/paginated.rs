//! Paginated collection manager.

use lyceum_core::EndpointError;
use std::future::Future;
use tracing::debug;

/// One page of results as returned by a list endpoint.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}

/// The request handed to the fetch callback.
#[derive(Debug, Clone)]
pub struct PageRequest<Q> {
    pub filter: Q,
    pub page: u32,
    pub page_size: u32,
}

/// Accumulates paged results behind `load_more`/`refresh` semantics.
///
/// `load_more` is a no-op while a load is in flight or the collection is
/// exhausted; `refresh` resets the cursor and replaces the collection;
/// changing the filter resets pagination and fetches the first page.
#[derive(Debug)]
pub struct PaginatedManager<T, Q> {
    items: Vec<T>,
    filter: Q,
    page: u32,
    page_size: u32,
    has_more: bool,
    loading: bool,
    error: Option<String>,
}

impl<T, Q: Clone> PaginatedManager<T, Q> {
    pub fn new(filter: Q, page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            filter,
            page: 0,
            page_size,
            has_more: true,
            loading: false,
            error: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn filter(&self) -> &Q {
        &self.filter
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetch the next page and append it.
    pub async fn load_more<F, Fut>(&mut self, fetch: F)
    where
        F: FnOnce(PageRequest<Q>) -> Fut,
        Fut: Future<Output = Result<Page<T>, EndpointError>>,
    {
        if self.loading || !self.has_more {
            debug!(
                loading = self.loading,
                has_more = self.has_more,
                "load_more skipped"
            );
            return;
        }
        self.loading = true;
        self.error = None;

        let request = PageRequest {
            filter: self.filter.clone(),
            page: self.page,
            page_size: self.page_size,
        };
        match fetch(request).await {
            Ok(page) => {
                self.items.extend(page.items);
                self.page += 1;
                self.has_more = page.has_more;
            }
            Err(err) => {
                self.error = Some(err.surface_message());
            }
        }
        self.loading = false;
    }

    /// Reset the cursor and replace the collection with the first page.
    pub async fn refresh<F, Fut>(&mut self, fetch: F)
    where
        F: FnOnce(PageRequest<Q>) -> Fut,
        Fut: Future<Output = Result<Page<T>, EndpointError>>,
    {
        self.loading = true;
        self.error = None;

        let request = PageRequest {
            filter: self.filter.clone(),
            page: 0,
            page_size: self.page_size,
        };
        match fetch(request).await {
            Ok(page) => {
                self.items = page.items;
                self.page = 1;
                self.has_more = page.has_more;
            }
            Err(err) => {
                self.error = Some(err.surface_message());
            }
        }
        self.loading = false;
    }

    /// Swap the filter, reset pagination and fetch the first page.
    pub async fn set_filter<F, Fut>(&mut self, filter: Q, fetch: F)
    where
        F: FnOnce(PageRequest<Q>) -> Fut,
        Fut: Future<Output = Result<Page<T>, EndpointError>>,
    {
        self.filter = filter;
        self.items.clear();
        self.page = 0;
        self.has_more = true;
        self.refresh(fetch).await;
    }
}
