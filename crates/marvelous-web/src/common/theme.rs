use std::rc::Rc;

use dominator::{Dom, clone, events, html};
use futures_signals::signal::{Mutable, Signal, SignalExt};

use crate::{storage::KeyValueStore, utils::apply_theme};

pub const KEY: &str = "MARVEL_THEME";

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum Theme {
    #[default]
    Rocket,
    IronMan,
    Panther,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Rocket, Theme::IronMan, Theme::Panther];

    pub fn key(&self) -> &'static str {
        match self {
            Theme::Rocket => "rocket",
            Theme::IronMan => "ironman",
            Theme::Panther => "panther",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|theme| theme.key() == key)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Rocket => "Rocket",
            Theme::IronMan => "Iron Man",
            Theme::Panther => "Black Panther",
        }
    }

    pub fn accent(&self) -> &'static str {
        match self {
            Theme::Rocket => "#14D1FF",
            Theme::IronMan => "#FFD700",
            Theme::Panther => "#7B61FF",
        }
    }
}

/// The selected theme, stored as its bare key.
pub struct ThemeSettings {
    storage: Rc<dyn KeyValueStore>,
    pub theme: Mutable<Theme>,
}

impl ThemeSettings {
    pub fn new(storage: Rc<dyn KeyValueStore>) -> Rc<Self> {
        let theme = match storage.read(KEY) {
            Ok(Some(key)) => Theme::from_key(&key).unwrap_or_default(),
            Ok(None) => Theme::default(),
            Err(e) => {
                warn!("failed to read theme: {}", e);
                Theme::default()
            }
        };

        Rc::new(Self {
            storage,
            theme: Mutable::new(theme),
        })
    }

    pub fn select(&self, theme: Theme) {
        self.theme.set_neq(theme);
        if let Err(e) = self.storage.write(KEY, theme.key()) {
            warn!("failed to save theme: {}", e);
        }
    }

    pub fn signal(&self) -> impl Signal<Item = Theme> + use<> {
        self.theme.signal()
    }

    pub fn render(settings: Rc<Self>) -> Dom {
        html!("div", {
            .class("theme-picker")
            .future(settings.signal().for_each(|theme| {
                apply_theme(theme);
                async {}
            }))
            .children(Theme::ALL.iter().map(|theme| {
                let theme = *theme;
                html!("button", {
                    .attr("aria-label", theme.name())
                    .attr("title", theme.name())
                    .class_signal("active", settings.signal().map(move |x| x == theme))
                    .style("background-color", theme.accent())
                    .event(clone!(settings => move |_: events::Click| {
                        settings.select(theme);
                    }))
                })
            }))
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_theme_round_trip() {
        let storage = Rc::new(MemoryStorage::new());
        let settings = ThemeSettings::new(storage.clone());
        assert_eq!(settings.theme.get(), Theme::Rocket);

        settings.select(Theme::Panther);
        assert_eq!(storage.read(KEY).unwrap().as_deref(), Some("panther"));
        assert_eq!(ThemeSettings::new(storage).theme.get(), Theme::Panther);
    }

    #[test]
    fn test_unknown_key_falls_back() {
        let storage = Rc::new(MemoryStorage::new());
        storage.write(KEY, "hulk").unwrap();
        assert_eq!(ThemeSettings::new(storage).theme.get(), Theme::Rocket);
    }
}
