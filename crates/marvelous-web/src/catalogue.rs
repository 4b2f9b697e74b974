use std::rc::Rc;

use dominator::{Dom, EventOptions, clone, events, html, with_node};
use futures_signals::{
    map_ref,
    signal::{Mutable, SignalExt, always},
};
use marvelous_schema::Resource;
use web_sys::HtmlInputElement;

use crate::{
    common::{Card, DetailModal, Spinner},
    context::AppContext,
    fetcher::{FetchState, PAGE_SIZE, PaginatedSearchFetcher, last_page},
    modal::{DomModalHost, ModalController},
};

/// Searchable, paginated grid of one catalog collection.
pub struct Catalogue {
    context: Rc<AppContext>,
    fetcher: Rc<PaginatedSearchFetcher>,
    draft: Mutable<String>,
    modal: Rc<ModalController<Card>>,
}

impl Catalogue {
    pub fn new(context: Rc<AppContext>, resource: Resource) -> Rc<Self> {
        let container_id = format!("{}-detail", resource.path());
        Rc::new(Self {
            context,
            fetcher: PaginatedSearchFetcher::new(resource, PAGE_SIZE),
            draft: Mutable::new(String::new()),
            modal: ModalController::new(Rc::new(DomModalHost), &container_id),
        })
    }

    fn heading(&self) -> &'static str {
        match self.fetcher.resource() {
            Resource::Characters => "Characters",
            Resource::Comics => "Comics",
        }
    }

    fn placeholder(&self) -> &'static str {
        match self.fetcher.resource() {
            Resource::Characters => "Search characters by name",
            Resource::Comics => "Search comics by title",
        }
    }

    fn submit(&self) {
        let term = self.draft.get_cloned();
        info!("search {} for {:?}", self.fetcher.resource().path(), term.trim());
        self.fetcher.submit_search(&term);
    }

    fn render_search(catalogue: Rc<Self>) -> Dom {
        html!("div", {
            .class("search")
            .attr("role", "search")
            .children(&mut [
                html!("input" => HtmlInputElement, {
                    .attr("type", "search")
                    .attr("placeholder", catalogue.placeholder())
                    .attr("aria-label", catalogue.placeholder())
                    .with_node!(input => {
                        .event(clone!(catalogue, input => move |_: events::Input| {
                            catalogue.draft.set_neq(input.value());
                        }))
                        .event_with_options(&EventOptions::preventable(), clone!(catalogue => move |e: events::KeyDown| {
                            if e.key() == "Enter" {
                                e.prevent_default();
                                catalogue.draft.set_neq(input.value());
                                catalogue.submit();
                            }
                        }))
                    })
                }),
                html!("button", {
                    .text("Search")
                    .event(clone!(catalogue => move |_: events::Click| {
                        catalogue.submit();
                    }))
                }),
            ])
        })
    }

    fn render_pager(catalogue: Rc<Self>) -> Dom {
        let fetcher = catalogue.fetcher.clone();
        let page_size = PAGE_SIZE;

        html!("nav", {
            .class("pager")
            .attr("aria-label", "Pagination")
            .children(&mut [
                html!("button", {
                    .text("Previous")
                    .attr_signal("disabled", fetcher.page_signal().map(|page| (page <= 1).then_some("")))
                    .event(clone!(fetcher => move |_: events::Click| {
                        fetcher.previous_page();
                    }))
                }),
                html!("span", {
                    .class("page-indicator")
                    .text_signal(map_ref! {
                        let page = fetcher.page_signal(),
                        let total_count = fetcher.state_signal().map(|state| state.total_count()) =>
                        page_indicator(*page, page_size, *total_count)
                    })
                }),
                html!("button", {
                    .text("Next")
                    .attr_signal("disabled", fetcher.has_next_page_signal().map(|has_next| (!has_next).then_some("")))
                    .event(clone!(fetcher => move |_: events::Click| {
                        fetcher.next_page();
                    }))
                }),
            ])
        })
    }

    fn render_zero_state(catalogue: Rc<Self>, failed: bool) -> Dom {
        let term = catalogue.fetcher.search_term();
        let message = match term.trim() {
            _ if failed => "Nothing to show right now.".to_string(),
            "" => "No results found.".to_string(),
            term => format!("No results for \"{}\".", term),
        };

        html!("div", {
            .class("zero-state")
            .children(&mut [
                html!("p", {
                    .text(&message)
                }),
            ])
            .apply_if(failed, |dom| {
                dom.child(html!("button", {
                    .text("Retry")
                    .event(clone!(catalogue => move |_: events::Click| {
                        catalogue.fetcher.fetch(catalogue.fetcher.query());
                    }))
                }))
            })
        })
    }

    fn render_results(catalogue: Rc<Self>) -> Dom {
        let kind = catalogue.fetcher.resource().kind();

        html!("div", {
            .class("results")
            .child_signal(catalogue.fetcher.state_signal().map(clone!(catalogue => move |state| {
                Some(if state.is_loading() || state == FetchState::Idle {
                    Spinner::render(always(true))
                } else if !state.items().is_empty() {
                    html!("div", {
                        .class("card-grid")
                        .children(state.items().iter().map(|entity| {
                            Card::from_entity(entity, kind).render(&catalogue.context.favorites, Some(&catalogue.modal))
                        }))
                    })
                } else {
                    Self::render_zero_state(catalogue.clone(), state == FetchState::Failed)
                })
            })))
        })
    }

    pub fn render(catalogue: Rc<Self>) -> Dom {
        html!("section", {
            .class("catalogue")
            .future(catalogue.fetcher.query_signal().for_each(clone!(catalogue => move |query| {
                catalogue.fetcher.fetch(query);
                async {}
            })))
            .children(&mut [
                html!("h2", {
                    .text(catalogue.heading())
                }),
                Self::render_search(catalogue.clone()),
                Self::render_results(catalogue.clone()),
                Self::render_pager(catalogue.clone()),
                DetailModal::render(catalogue.modal.clone(), catalogue.context.favorites.clone()),
            ])
        })
    }
}

fn page_indicator(page: u32, page_size: u32, total_count: u64) -> String {
    if total_count > 0 {
        format!(
            "Page {} of {} ({} results)",
            page,
            last_page(page_size, total_count),
            total_count
        )
    } else {
        format!("Page {}", page)
    }
}
