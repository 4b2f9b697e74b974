use dominator::routing;
use futures_signals::signal::{Signal, SignalExt};
use wasm_bindgen::prelude::*;
use web_sys::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Characters,
    CharacterComics(String),
    Comics,
    Favorites,
    Signup,
    Login,
    NotFound,
}

impl Route {
    pub fn signal() -> impl Signal<Item = Self> {
        routing::url()
            .signal_ref(|url| Url::new(url).unwrap_throw())
            .map(|url| Self::from_path(&url.pathname()))
    }

    pub fn from_path(pathname: &str) -> Self {
        let mut paths = pathname.split('/').collect::<Vec<_>>();
        paths.retain(|path| !path.is_empty());

        match paths.as_slice() {
            [] => Route::Home,
            ["characters"] => Route::Characters,
            ["characters", id, "comics"] => Route::CharacterComics(id.to_string()),
            ["comics"] => Route::Comics,
            ["favorites"] => Route::Favorites,
            ["signup"] => Route::Signup,
            ["login"] => Route::Login,
            _ => Route::NotFound,
        }
    }

    pub fn url(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Characters => "/characters".to_string(),
            Route::CharacterComics(id) => format!("/characters/{}/comics", id),
            Route::Comics => "/comics".to_string(),
            Route::Favorites => "/favorites".to_string(),
            Route::Signup => "/signup".to_string(),
            Route::Login => "/login".to_string(),
            Route::NotFound => "/notfound".to_string(),
        }
    }
}
