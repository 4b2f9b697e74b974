#[macro_use]
extern crate log;

mod app;
mod auth;
mod catalogue;
mod character_comics;
mod common;
mod context;
mod favorites;
mod favorites_list;
mod fetcher;
mod modal;
mod query;
mod session;
mod storage;
mod utils;

use std::rc::Rc;

use wasm_bindgen::{JsCast, prelude::*};
use web_sys::StorageEvent;

use app::App;
use context::AppContext;
use utils::window;

/// Re-reads favorites when another tab of the same origin rewrites them.
fn listen_storage_events(context: Rc<AppContext>) {
    let closure = Closure::wrap(Box::new(move |e: StorageEvent| {
        // a cleared storage reports no key
        let key = e.key();
        if key.is_none() || key.as_deref() == Some(favorites::STORAGE_KEY) {
            debug!("favorites changed in another tab");
            context.favorites.rehydrate();
        }
    }) as Box<dyn FnMut(_)>);

    if let Err(e) = window().add_event_listener_with_callback("storage", closure.as_ref().unchecked_ref()) {
        warn!("failed to listen for storage events: {:?}", e);
    }

    closure.forget();
}

#[wasm_bindgen(start)]
pub async fn main_js() -> Result<(), JsValue> {
    #[cfg(debug_assertions)]
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    utils::initialize_urls();

    let context = AppContext::init(storage::durable());
    utils::apply_theme(context.theme.theme.get());
    listen_storage_events(context.clone());

    dominator::append_dom(&dominator::body(), App::render(App::new(context)));

    Ok(())
}
