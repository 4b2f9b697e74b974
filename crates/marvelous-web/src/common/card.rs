use std::rc::Rc;

use dominator::{Dom, clone, events, html, link};
use futures_signals::signal::SignalExt;
use marvelous_schema::model::{DESCRIPTION_PLACEHOLDER, Entity, FavoriteItem, ItemKind};

use crate::{common::Route, favorites::FavoritesStore, modal::ModalController};

/// Render-ready copy of a character or comic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub kind: ItemKind,
    pub label: String,
    pub description: Option<String>,
    pub image_url: String,
}

impl Card {
    pub fn from_entity(entity: &Entity, kind: ItemKind) -> Self {
        Self {
            id: entity.id.clone(),
            kind,
            label: entity.label(),
            description: entity.raw_description().map(str::to_string),
            image_url: entity.image_url(),
        }
    }

    pub fn from_favorite(item: &FavoriteItem) -> Self {
        Self {
            id: item.identifier.clone(),
            kind: item.kind,
            label: item.label.clone(),
            description: None,
            image_url: item.image_url.clone(),
        }
    }

    pub fn to_favorite(&self) -> FavoriteItem {
        FavoriteItem {
            identifier: self.id.clone(),
            kind: self.kind,
            label: self.label.clone(),
            image_url: self.image_url.clone(),
        }
    }

    /// Entities the API sent without an id cannot be told apart, so they cannot be favorited.
    pub fn can_favorite(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or(DESCRIPTION_PLACEHOLDER)
    }

    /// Characters lead to their comics; comics have no page of their own.
    pub fn link(&self) -> Option<String> {
        match self.kind {
            ItemKind::Character if !self.id.is_empty() => {
                Some(Route::CharacterComics(self.id.clone()).url())
            }
            _ => None,
        }
    }

    pub fn render_star(&self, favorites: &Rc<FavoritesStore>) -> Dom {
        let is_favorite = favorites.contains_signal(self.id.clone()).broadcast();
        let card = self.clone();

        html!("button", {
            .class("fav-star")
            .class_signal("is-active", is_favorite.signal())
            .attr_signal("aria-label", is_favorite.signal().map(|fav| Some(star_label(fav))))
            .attr_signal("title", is_favorite.signal().map(|fav| Some(star_label(fav))))
            .text_signal(is_favorite.signal().map(|fav| if fav { "★" } else { "☆" }))
            .event(clone!(favorites => move |_: events::Click| {
                favorites.toggle(card.to_favorite());
            }))
        })
    }

    fn render_thumb(&self) -> Dom {
        let image = html!("img", {
            .attr("src", &self.image_url)
            .attr("alt", &self.label)
            .attr("loading", "lazy")
        });

        match self.link() {
            Some(url) => link!(url, {
                .class("card-thumb")
                .attr("aria-label", &format!("Comics featuring {}", self.label))
                .child(image)
            }),
            None => html!("div", {
                .class("card-thumb")
                .child(image)
            }),
        }
    }

    /// The info badge only shows when there is a real description to open.
    pub fn render(&self, favorites: &Rc<FavoritesStore>, modal: Option<&Rc<ModalController<Card>>>) -> Dom {
        html!("article", {
            .class("card")
            .attr("aria-label", &self.label)
            .children(&mut [
                self.render_thumb(),
                html!("div", {
                    .class("card-body")
                    .children(&mut [
                        html!("h3", {
                            .class("card-title")
                            .text(&self.label)
                        }),
                    ])
                    .apply_if(self.can_favorite(), |dom| dom.child(self.render_star(favorites)))
                }),
            ])
            .apply_if(self.description.is_some() && modal.is_some(), |dom| {
                let modal = modal.cloned();
                let card = self.clone();
                dom.child(html!("button", {
                    .class("info-badge")
                    .attr("aria-label", "Show description")
                    .attr("title", "Show description")
                    .text("i")
                    .event(move |_: events::Click| {
                        if let Some(modal) = &modal {
                            modal.open(card.clone());
                        }
                    })
                }))
            })
        })
    }
}

fn star_label(is_favorite: bool) -> &'static str {
    if is_favorite {
        "Remove from favorites"
    } else {
        "Add to favorites"
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn entity(json: &str) -> Entity {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_character_card() {
        let card = Card::from_entity(
            &entity(r#"{"_id": "1011334", "name": "3-D Man", "description": "", "thumbnail": {"path": "http://x/3d", "extension": "jpg"}}"#),
            ItemKind::Character,
        );

        assert_eq!(card.description, None);
        assert_eq!(card.description_text(), DESCRIPTION_PLACEHOLDER);
        assert_eq!(card.link().as_deref(), Some("/characters/1011334/comics"));
        assert_eq!(
            card.to_favorite(),
            FavoriteItem {
                identifier: "1011334".to_string(),
                kind: ItemKind::Character,
                label: "3-D Man".to_string(),
                image_url: "http://x/3d/portrait_uncanny.jpg".to_string(),
            }
        );
    }

    #[test]
    fn test_comic_card_has_no_link() {
        let card = Card::from_entity(
            &entity(r#"{"_id": "82967", "title": "Marvel Previews (2017)", "description": "Preview."}"#),
            ItemKind::Comic,
        );

        assert_eq!(card.link(), None);
        assert_eq!(card.description_text(), "Preview.");
    }

    #[test]
    fn test_card_without_id() {
        let card = Card::from_entity(&entity(r#"{"_id": {"$oid": "x"}, "name": "Nobody"}"#), ItemKind::Character);

        assert_eq!(card.id, "");
        assert!(!card.can_favorite());
        assert_eq!(card.link(), None);
    }

    #[test]
    fn test_favorite_round_trip() {
        let item = FavoriteItem {
            identifier: "7".to_string(),
            kind: ItemKind::Comic,
            label: "X-Men".to_string(),
            image_url: "http://x/xm.jpg".to_string(),
        };

        assert_eq!(Card::from_favorite(&item).to_favorite(), item);
    }
}
