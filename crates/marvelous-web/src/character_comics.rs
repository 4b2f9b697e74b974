use std::rc::Rc;

use dominator::{Dom, clone, html, link};
use futures_signals::{
    signal::SignalExt,
    signal_vec::{MutableVec, SignalVecExt},
};
use marvelous_schema::model::ItemKind;

use crate::{
    common::{Card, DetailModal, Route, Spinner},
    context::AppContext,
    modal::{DomModalHost, ModalController},
    query::ApiClient,
    utils::AsyncLoader,
};

/// The first comics a character appears in.
pub struct CharacterComics {
    context: Rc<AppContext>,
    character_id: String,
    cards: MutableVec<Card>,
    loader: AsyncLoader,
    modal: Rc<ModalController<Card>>,
}

impl CharacterComics {
    pub fn new(context: Rc<AppContext>, character_id: String) -> Rc<Self> {
        Rc::new(Self {
            context,
            character_id,
            cards: MutableVec::new(),
            loader: AsyncLoader::new(),
            modal: ModalController::new(Rc::new(DomModalHost), "character-comics-detail"),
        })
    }

    fn fetch_comics(page: Rc<Self>) {
        page.loader.load(clone!(page => async move {
            match ApiClient::from_config().character_comics(&page.character_id).await {
                Ok(list) => {
                    let cards = list
                        .results
                        .iter()
                        .map(|entity| Card::from_entity(entity, ItemKind::Comic))
                        .collect();
                    page.cards.lock_mut().replace_cloned(cards);
                }
                Err(e) => {
                    error!("failed to fetch comics of {}: {:#}", page.character_id, e);
                    page.cards.lock_mut().clear();
                }
            }
        }));
    }

    pub fn render(page: Rc<Self>) -> Dom {
        Self::fetch_comics(page.clone());
        let favorites = page.context.favorites.clone();

        html!("section", {
            .class("character-comics")
            .children(&mut [
                link!(Route::Characters.url(), {
                    .class("back")
                    .text("← Characters")
                }),
                html!("h2", {
                    .text("Comics")
                }),
                Spinner::render(page.loader.is_loading()),
            ])
            .child_signal(page.loader.is_loading().map(clone!(page => move |loading| {
                (!loading && page.cards.lock_ref().is_empty()).then(|| html!("p", {
                    .class("zero-state")
                    .text("No comics found for this character.")
                }))
            })))
            .children(&mut [
                html!("div", {
                    .class("card-grid")
                    .children_signal_vec(page.cards.signal_vec_cloned().map(clone!(page, favorites => move |card| {
                        card.render(&favorites, Some(&page.modal))
                    })))
                }),
                DetailModal::render(page.modal.clone(), favorites.clone()),
            ])
        })
    }
}
