use std::rc::Rc;

use crate::{
    common::ThemeSettings, favorites::FavoritesStore, session::Session, storage::KeyValueStore,
};

/// State shared by every view, hydrated once from durable storage when the app starts.
pub struct AppContext {
    pub favorites: Rc<FavoritesStore>,
    pub session: Rc<Session>,
    pub theme: Rc<ThemeSettings>,
}

impl AppContext {
    pub fn init(storage: Rc<dyn KeyValueStore>) -> Rc<Self> {
        let context = Self {
            favorites: FavoritesStore::new(storage.clone()),
            session: Session::new(storage.clone()),
            theme: ThemeSettings::new(storage),
        };
        info!(
            "context ready: {} favorites, logged in: {} ({:?})",
            context.favorites.items().len(),
            context.session.token().is_some(),
            context.session.username()
        );

        Rc::new(context)
    }

    /// Ends the session. Favorites belong to the browser, not the account, and are kept.
    pub fn logout(&self) {
        self.session.logout();
    }
}
