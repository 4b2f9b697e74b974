use std::cell::{Cell, RefCell};

use futures::{
    Future,
    future::{AbortHandle, abortable},
};
use futures_signals::signal::{Mutable, Signal};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlElement, Window};

use crate::common::Theme;

pub const DEFAULT_API_HOST: &str = "http://localhost:4000";
const API_HOST_GLOBAL: &str = "__MARVELOUS_API__";

thread_local! {
    static WINDOW: Window = web_sys::window().unwrap_throw();
    static DOCUMENT: Document = WINDOW.with(|w| w.document().unwrap_throw());
    static BODY: HtmlElement = DOCUMENT.with(|d| d.body().unwrap_throw());
    static API_HOST: RefCell<String> = RefCell::new(DEFAULT_API_HOST.to_string());
}

/// Runs one future at a time, aborting the previous one when a new one is loaded.
pub struct AsyncLoader {
    next_id: Cell<usize>,
    loading: Mutable<Option<(usize, AbortHandle)>>,
}

impl Default for AsyncLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AsyncLoader {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            loading: Mutable::new(None),
        }
    }

    pub fn load<F>(&self, fut: F)
    where
        F: Future<Output = ()> + 'static,
    {
        let (fut, handle) = abortable(fut);
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));

        if let Some((_, previous)) = self.loading.replace(Some((id, handle))) {
            previous.abort();
        }

        let loading = self.loading.clone();
        spawn_local(async move {
            if fut.await.is_err() {
                debug!("load {} aborted", id);
                return;
            }

            let mut loading = loading.lock_mut();
            if matches!(loading.as_ref(), Some((current, _)) if *current == id) {
                *loading = None;
            }
        });
    }

    pub fn is_loading(&self) -> impl Signal<Item = bool> + use<> {
        self.loading.signal_ref(|x| x.is_some())
    }
}

/// Picks the API host: page global first, then the build environment, then the local default.
pub fn resolve_api_host(page_global: Option<String>, build_env: Option<&str>) -> String {
    let host = page_global
        .filter(|host| !host.trim().is_empty())
        .or_else(|| {
            build_env
                .filter(|host| !host.trim().is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_API_HOST.to_string());

    host.trim().trim_end_matches('/').to_string()
}

pub fn initialize_urls() {
    let page_global = js_sys::Reflect::get(&window(), &JsValue::from_str(API_HOST_GLOBAL))
        .ok()
        .and_then(|value| value.as_string());

    let host = resolve_api_host(page_global, option_env!("MARVELOUS_API_BASE_URL"));
    info!("api host: {}", host);

    API_HOST.with(|s| *s.borrow_mut() = host);
}

pub fn api_host() -> String {
    API_HOST.with(|v| v.borrow().clone())
}

pub fn apply_theme(theme: Theme) {
    let body = body();
    if let Err(e) = body.set_attribute("data-theme", theme.key()) {
        error!("error set data-theme: {:?}", e);
    }
    if let Err(e) = body.style().set_property("--accent", theme.accent()) {
        error!("error set accent: {:?}", e);
    }
}

pub fn window() -> Window {
    WINDOW.with(|s| s.clone())
}

pub fn document() -> Document {
    DOCUMENT.with(|d| d.clone())
}

pub fn body() -> HtmlElement {
    BODY.with(|d| d.clone())
}
