use std::rc::Rc;

use dominator::{Dom, clone, events, html, link, with_node};
use futures_signals::signal::SignalExt;
use wasm_bindgen::JsValue;
use web_sys::HtmlElement;

use crate::{common::Card, favorites::FavoritesStore, modal::ModalController};

/// Link from a character's popover to the comics it appears in.
fn comics_cta(card: &Card) -> Option<(String, String)> {
    card.link()
        .map(|url| (url, format!("Comics featuring {}", card.label)))
}

/// Description popover opened from a card's info badge.
pub struct DetailModal;

impl DetailModal {
    fn render_panel(modal: Rc<ModalController<Card>>, favorites: Rc<FavoritesStore>, card: Card) -> Dom {
        let title_id = format!("{}-title", modal.container_id());

        html!("div", {
            .attr("id", modal.container_id())
            .class("modal-panel")
            .attr("role", "dialog")
            .attr("aria-modal", "true")
            .attr("aria-labelledby", &title_id)
            .attr("tabindex", "-1")
            .children(&mut [
                html!("header", {
                    .class("modal-head")
                    .children(&mut [
                        html!("h3", {
                            .attr("id", &title_id)
                            .class("modal-title")
                            .text(&card.label)
                        }),
                        html!("button", {
                            .class("modal-close")
                            .attr("aria-label", "Close")
                            .attr("title", "Close")
                            .text("✕")
                            .event(clone!(modal => move |_: events::Click| {
                                modal.close();
                            }))
                        }),
                    ])
                }),
                html!("div", {
                    .class("modal-content")
                    .children(&mut [
                        html!("p", {
                            .text(card.description_text())
                        })
                    ])
                }),
                html!("footer", {
                    .class("modal-foot")
                    .apply_if(card.can_favorite(), |dom| dom.child(card.render_star(&favorites)))
                    .apply(|dom| match comics_cta(&card) {
                        Some((url, label)) => dom.child(link!(url, {
                            .class("hover-cta")
                            .attr("aria-label", &label)
                            .text("See comics →")
                            .event(clone!(modal => move |_: events::Click| {
                                modal.close();
                            }))
                        })),
                        None => dom,
                    })
                }),
            ])
        })
    }

    pub fn render(modal: Rc<ModalController<Card>>, favorites: Rc<FavoritesStore>) -> Dom {
        html!("div", {
            .child_signal(modal.subject_signal().map(clone!(modal, favorites => move |subject| {
                subject.map(|card| html!("div" => HtmlElement, {
                    .class("modal-backdrop")
                    .with_node!(backdrop => {
                        .event(clone!(modal => move |e: events::Click| {
                            let inside_content = e
                                .target()
                                .map(|target| JsValue::from(target) != JsValue::from(backdrop.clone()))
                                .unwrap_or(false);
                            modal.backdrop_activated(inside_content);
                        }))
                    })
                    .child(Self::render_panel(modal.clone(), favorites.clone(), card))
                }))
            })))
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use marvelous_schema::model::ItemKind;

    fn card(kind: ItemKind) -> Card {
        Card {
            id: "1011334".to_string(),
            kind,
            label: "3-D Man".to_string(),
            description: Some("Hero.".to_string()),
            image_url: "http://x/3d.jpg".to_string(),
        }
    }

    #[test]
    fn test_character_popover_links_to_comics() {
        assert_eq!(
            comics_cta(&card(ItemKind::Character)),
            Some((
                "/characters/1011334/comics".to_string(),
                "Comics featuring 3-D Man".to_string()
            ))
        );
    }

    #[test]
    fn test_comic_popover_has_no_link() {
        assert_eq!(comics_cta(&card(ItemKind::Comic)), None);
    }
}
