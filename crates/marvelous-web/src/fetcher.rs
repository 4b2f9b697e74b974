//! Request lifecycle of one paginated, searchable list view.
//!
//! Every trigger bumps a generation counter before the request goes out. When a response comes
//! back its generation is compared with the latest one, and anything older is dropped, so
//! responses resolving out of order can never overwrite the state of a newer request.

use std::{cell::Cell, future::Future, rc::Rc};

use futures_signals::{
    map_ref,
    signal::{Mutable, Signal, SignalExt},
};
use marvelous_schema::{
    Resource,
    model::{Entity, ListPage},
};
use wasm_bindgen_futures::spawn_local;

use crate::query::ApiClient;

pub const PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub search_term: String,
}

impl ListQuery {
    #[cfg(test)]
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            search_term: String::new(),
        }
    }

    /// The search term, if anything is left once trimmed.
    pub fn trimmed_term(&self) -> Option<&str> {
        Some(self.search_term.trim()).filter(|term| !term.is_empty())
    }

    pub fn params(&self, resource: Resource) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        if let Some(term) = self.trimmed_term() {
            params.push((resource.search_param(), term.to_string()));
        }

        params
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListResult {
    pub items: Vec<Entity>,
    pub total_count: u64,
}

impl From<ListPage> for ListResult {
    fn from(page: ListPage) -> Self {
        Self {
            items: page.results,
            total_count: page.count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success(ListResult),
    Failed,
}

impl FetchState {
    /// Items to render; empty unless the last fetch succeeded.
    pub fn items(&self) -> &[Entity] {
        match self {
            FetchState::Success(result) => &result.items,
            _ => &[],
        }
    }

    pub fn total_count(&self) -> u64 {
        match self {
            FetchState::Success(result) => result.total_count,
            _ => 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }
}

pub fn has_next_page(page: u32, page_size: u32, total_count: u64) -> bool {
    u64::from(page) * u64::from(page_size) < total_count
}

/// Last page holding results, never below 1.
pub fn last_page(page_size: u32, total_count: u64) -> u32 {
    if page_size == 0 {
        return 1;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

/// Where list pages come from.
#[allow(async_fn_in_trait)]
pub trait ListSource {
    async fn fetch_list(&self, resource: Resource, query: &ListQuery) -> anyhow::Result<ListPage>;
}

pub struct PaginatedSearchFetcher {
    resource: Resource,
    page_size: u32,
    page: Mutable<u32>,
    search_term: Mutable<String>,
    state: Mutable<FetchState>,
    generation: Cell<u64>,
}

impl PaginatedSearchFetcher {
    pub fn new(resource: Resource, page_size: u32) -> Rc<Self> {
        Rc::new(Self {
            resource,
            page_size,
            page: Mutable::new(1),
            search_term: Mutable::new(String::new()),
            state: Mutable::new(FetchState::Idle),
            generation: Cell::new(0),
        })
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn query(&self) -> ListQuery {
        ListQuery {
            page: self.page.get(),
            page_size: self.page_size,
            search_term: self.search_term.get_cloned(),
        }
    }

    /// Emits the query whenever the page or the search term changes.
    pub fn query_signal(&self) -> impl Signal<Item = ListQuery> + use<> {
        let page_size = self.page_size;
        map_ref! {
            let page = self.page.signal(),
            let search_term = self.search_term.signal_cloned() =>
            ListQuery {
                page: *page,
                page_size,
                search_term: search_term.clone(),
            }
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> FetchState {
        self.state.get_cloned()
    }

    pub fn state_signal(&self) -> impl Signal<Item = FetchState> + use<> {
        self.state.signal_cloned()
    }

    pub fn page_signal(&self) -> impl Signal<Item = u32> + use<> {
        self.page.signal()
    }

    pub fn search_term(&self) -> String {
        self.search_term.get_cloned()
    }

    pub fn has_next_page(&self) -> bool {
        has_next_page(self.page.get(), self.page_size, self.state.lock_ref().total_count())
    }

    pub fn has_next_page_signal(&self) -> impl Signal<Item = bool> + use<> {
        let page_size = self.page_size;
        map_ref! {
            let page = self.page.signal(),
            let total_count = self.state.signal_ref(|state| state.total_count()) =>
            has_next_page(*page, page_size, *total_count)
        }
        .dedupe()
    }

    /// Moves forward one page, never past the last page of the current result.
    pub fn next_page(&self) {
        if self.has_next_page() {
            let last = last_page(self.page_size, self.state.lock_ref().total_count());
            self.page.set_neq((self.page.get() + 1).min(last));
        }
    }

    pub fn previous_page(&self) {
        self.page.set_neq(self.page.get().saturating_sub(1).max(1));
    }

    /// Commits a search. Searching always starts over from the first page.
    pub fn submit_search(&self, term: &str) {
        self.search_term.set_neq(term.to_string());
        self.page.set_neq(1);
    }

    fn begin(&self) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.state.set(FetchState::Loading);

        generation
    }

    /// Applies a response unless a newer request was issued since. Returns whether it applied.
    fn resolve(&self, generation: u64, result: anyhow::Result<ListPage>) -> bool {
        if generation != self.generation.get() {
            debug!(
                "discarding stale {} response (generation {}, latest {})",
                self.resource.path(),
                generation,
                self.generation.get()
            );
            return false;
        }

        match result {
            Ok(page) => {
                self.state.set(FetchState::Success(page.into()));
            }
            Err(e) => {
                error!("failed to fetch {}: {:#}", self.resource.path(), e);
                self.state.set(FetchState::Failed);
            }
        }

        true
    }

    /// Enters `Loading` right away and returns the future that completes the request.
    pub fn run<S>(self: &Rc<Self>, source: Rc<S>, query: ListQuery) -> impl Future<Output = ()> + use<S>
    where
        S: ListSource + 'static,
    {
        let generation = self.begin();
        let fetcher = self.clone();

        async move {
            let result = source.fetch_list(fetcher.resource, &query).await;
            fetcher.resolve(generation, result);
        }
    }

    pub fn fetch(self: &Rc<Self>, query: ListQuery) {
        spawn_local(self.run(Rc::new(ApiClient::from_config()), query));
    }
}
