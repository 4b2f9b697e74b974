use std::rc::Rc;

use dominator::{Dom, clone, events, html, link, routing};
use futures_signals::{map_ref, signal::SignalExt};

use crate::{
    common::{Route, ThemeSettings},
    context::AppContext,
    modal::{DomModalHost, ModalController},
};

const NAV: [(Route, &str); 3] = [
    (Route::Characters, "Characters"),
    (Route::Comics, "Comics"),
    (Route::Favorites, "Favorites"),
];

pub struct Header {
    context: Rc<AppContext>,
    drawer: Rc<ModalController<()>>,
}

impl Header {
    pub fn new(context: Rc<AppContext>) -> Rc<Self> {
        Rc::new(Self {
            context,
            drawer: ModalController::new(Rc::new(DomModalHost), "nav-drawer"),
        })
    }

    /// Navigation for narrow screens. Escape, a link or the toggle closes it.
    fn render_drawer(header: Rc<Self>) -> Dom {
        let drawer = header.drawer.clone();

        html!("div", {
            .child_signal(drawer.is_open_signal().map(clone!(drawer => move |open| {
                open.then(|| html!("nav", {
                    .attr("id", drawer.container_id())
                    .class("drawer")
                    .attr("aria-label", "Menu")
                    .attr("tabindex", "-1")
                    .children(NAV.iter().map(|(route, text)| {
                        link!(route.url(), {
                            .class("drawer-link")
                            .text(text)
                            .event(clone!(drawer => move |_: events::Click| {
                                drawer.close();
                            }))
                        })
                    }))
                }))
            })))
        })
    }

    fn render_link(route: Route, text: &str) -> Dom {
        let url = route.url();
        link!(url, {
            .class("nav-link")
            .class_signal("active", Route::signal().map(move |current| current == route))
            .text(text)
        })
    }

    fn render_account(context: Rc<AppContext>) -> Dom {
        html!("div", {
            .class("account")
            .child_signal(map_ref! {
                let logged_in = context.session.is_logged_in_signal(),
                let username = context.session.username_signal() =>
                (*logged_in).then(|| username.clone().unwrap_or_else(|| "Signed in".to_string()))
            }.map(clone!(context => move |username| {
                Some(match username {
                    Some(username) => html!("div", {
                        .children(&mut [
                            html!("span", {
                                .class("username")
                                .text(&username)
                            }),
                            html!("button", {
                                .text("Log out")
                                .event(clone!(context => move |_: events::Click| {
                                    context.logout();
                                    routing::go_to_url(&Route::Home.url());
                                }))
                            }),
                        ])
                    }),
                    None => html!("div", {
                        .children(&mut [
                            Self::render_link(Route::Login, "Log in"),
                            Self::render_link(Route::Signup, "Sign up"),
                        ])
                    }),
                })
            })))
        })
    }

    pub fn render(header: Rc<Self>) -> Dom {
        let context = header.context.clone();
        let drawer = header.drawer.clone();

        html!("header", {
            .class("topbar")
            .children(&mut [
                link!(Route::Home.url(), {
                    .class("brand")
                    .text("Marvelous")
                    .event(clone!(drawer => move |_: events::Click| {
                        drawer.close();
                    }))
                }),
                html!("nav", {
                    .class("nav")
                    .children(NAV.iter().map(|(route, text)| Self::render_link(route.clone(), text)))
                }),
                html!("button", {
                    .class("menu-toggle")
                    .attr("aria-label", "Open menu")
                    .attr("aria-controls", drawer.container_id())
                    .attr_signal("aria-expanded", drawer.is_open_signal().map(|open| Some(if open { "true" } else { "false" })))
                    .text("☰")
                    .event(clone!(drawer => move |_: events::Click| {
                        drawer.toggle(());
                    }))
                }),
                ThemeSettings::render(context.theme.clone()),
                Self::render_account(context),
                Self::render_drawer(header.clone()),
            ])
        })
    }
}
