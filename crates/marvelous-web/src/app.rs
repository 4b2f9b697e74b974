use std::rc::Rc;

use dominator::{Dom, clone, html, link};
use futures_signals::signal::SignalExt;
use marvelous_schema::Resource;

use crate::{
    auth::{Auth, AuthMode},
    catalogue::Catalogue,
    character_comics::CharacterComics,
    common::{Header, Route, snackbar},
    context::AppContext,
    favorites_list::FavoritesList,
};

pub struct App {
    context: Rc<AppContext>,
}

impl App {
    pub fn new(context: Rc<AppContext>) -> Rc<Self> {
        Rc::new(App { context })
    }

    fn render_home(app: Rc<Self>) -> Dom {
        html!("section", {
            .class("hero")
            .attr("aria-label", "Featured")
            .children(&mut [
                html!("h1", {
                    .class("hero-title")
                    .text("Welcome to your Marvelous World")
                }),
                html!("p", {
                    .class("hero-subtitle")
                    .text("Star your favorite characters and comics and build your own Marvel universe.")
                }),
            ])
            .child_signal(app.context.session.is_logged_in_signal().map(|logged_in| {
                Some(if logged_in {
                    html!("div", {
                        .class("cta-row")
                        .children(&mut [
                            link!(Route::Characters.url(), {
                                .class("btn")
                                .text("Browse characters")
                            }),
                            link!(Route::Comics.url(), {
                                .class("btn")
                                .text("Browse comics")
                            }),
                        ])
                    })
                } else {
                    html!("div", {
                        .class("cta-row")
                        .children(&mut [
                            link!(Route::Signup.url(), {
                                .class("btn")
                                .text("Sign up")
                            }),
                            link!(Route::Login.url(), {
                                .class("btn")
                                .text("Log in")
                            }),
                        ])
                    })
                })
            }))
        })
    }

    pub fn render(app: Rc<Self>) -> Dom {
        html!("div", {
            .class("app")
            .children(&mut [
                Header::render(Header::new(app.context.clone())),
            ])
            .child(html!("main", {
                .child_signal(Route::signal().map(clone!(app => move |route| {
                    debug!("route {:?}", route);
                    let context = app.context.clone();
                    Some(match route {
                        Route::Home => Self::render_home(app.clone()),
                        Route::Characters => Catalogue::render(Catalogue::new(context, Resource::Characters)),
                        Route::Comics => Catalogue::render(Catalogue::new(context, Resource::Comics)),
                        Route::CharacterComics(id) => CharacterComics::render(CharacterComics::new(context, id)),
                        Route::Favorites => FavoritesList::render(FavoritesList::new(context)),
                        Route::Signup => Auth::render(Auth::new(context, AuthMode::Signup)),
                        Route::Login => Auth::render(Auth::new(context, AuthMode::Login)),
                        Route::NotFound => html!("p", {
                            .class("zero-state")
                            .text("Page not found.")
                        }),
                    })
                })))
            }))
            .children(&mut [
                snackbar::render(),
            ])
        })
    }
}
