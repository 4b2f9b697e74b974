use std::rc::Rc;

use dominator::{Dom, clone, html, link};
use futures_signals::{signal::SignalExt, signal_vec::SignalVecExt};

use crate::{
    common::{Card, Route},
    context::AppContext,
};

/// Everything favorited on this device, characters and comics together.
pub struct FavoritesList {
    context: Rc<AppContext>,
}

impl FavoritesList {
    pub fn new(context: Rc<AppContext>) -> Rc<Self> {
        Rc::new(Self { context })
    }

    pub fn render(list: Rc<Self>) -> Dom {
        let favorites = list.context.favorites.clone();

        html!("section", {
            .class("favorites")
            .children(&mut [
                html!("h2", {
                    .text("Favorites")
                }),
            ])
            .child_signal(favorites.is_empty_signal().map(|is_empty| {
                is_empty.then(|| html!("p", {
                    .class("zero-state")
                    .children(&mut [
                        html!("span", {
                            .text("Nothing here yet. Star a ")
                        }),
                        link!(Route::Characters.url(), {
                            .text("character")
                        }),
                        html!("span", {
                            .text(" or a ")
                        }),
                        link!(Route::Comics.url(), {
                            .text("comic")
                        }),
                        html!("span", {
                            .text(" to keep it here.")
                        }),
                    ])
                }))
            }))
            .children(&mut [
                html!("div", {
                    .class("card-grid")
                    .children_signal_vec(favorites.signal_vec().map(clone!(favorites => move |item| {
                        Card::from_favorite(&item).render(&favorites, None)
                    })))
                }),
            ])
        })
    }
}
