//! Lifecycle of the detail popover a view shows on top of its list.
//!
//! While open, the controller owns three page-level side effects: a keydown listener for the
//! dismissal key, suppressed page scrolling, and a pending focus transfer to the popover root.
//! All of them go through [`ModalHost`] so the lifecycle does not depend on a live DOM.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use futures_signals::signal::{Mutable, Signal};
use wasm_bindgen::{JsCast, prelude::*};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlElement;

use crate::utils::{body, document, window};

pub const DISMISS_KEY: &str = "Escape";

/// Unregisters a key listener when dropped.
pub struct KeyListener {
    unlisten: Option<Box<dyn FnOnce()>>,
}

impl KeyListener {
    pub fn new<F>(unlisten: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            unlisten: Some(Box::new(unlisten)),
        }
    }
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        if let Some(unlisten) = self.unlisten.take() {
            unlisten();
        }
    }
}

pub trait ModalHost {
    /// Current inline `overflow` of the page, empty when unset.
    fn page_overflow(&self) -> String;

    fn set_page_overflow(&self, value: &str);

    /// Calls `f` with the key of every keydown until the listener is dropped.
    fn listen_keydown(&self, f: Box<dyn Fn(&str)>) -> KeyListener;

    /// Runs `f` once the next render pass is done.
    fn after_render(&self, f: Box<dyn FnOnce()>);

    fn focus(&self, element_id: &str);
}

pub struct ModalController<T> {
    host: Rc<dyn ModalHost>,
    container_id: String,
    subject: Mutable<Option<T>>,
    prior_overflow: RefCell<Option<String>>,
    key_listener: RefCell<Option<KeyListener>>,
}

impl<T> ModalController<T> {
    pub fn is_open(&self) -> bool {
        self.subject.lock_ref().is_some()
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn close(&self) {
        if !self.is_open() {
            return;
        }

        self.subject.set(None);
        drop(self.key_listener.borrow_mut().take());
        if let Some(prior) = self.prior_overflow.borrow_mut().take() {
            self.host.set_page_overflow(&prior);
        }
    }

    /// Clicks on the backdrop close the popover, clicks inside its content do not.
    pub fn backdrop_activated(&self, inside_content: bool) {
        if !inside_content {
            self.close();
        }
    }
}

impl<T: Clone + 'static> ModalController<T> {
    pub fn new(host: Rc<dyn ModalHost>, container_id: &str) -> Rc<Self> {
        Rc::new(Self {
            host,
            container_id: container_id.to_string(),
            subject: Mutable::new(None),
            prior_overflow: RefCell::new(None),
            key_listener: RefCell::new(None),
        })
    }

    /// Opens on `subject`. When already open only the subject changes.
    pub fn open(self: &Rc<Self>, subject: T) {
        let was_open = self.is_open();
        self.subject.set(Some(subject));
        if was_open {
            return;
        }

        *self.prior_overflow.borrow_mut() = Some(self.host.page_overflow());
        self.host.set_page_overflow("hidden");

        let modal = Rc::downgrade(self);
        let listener = self.host.listen_keydown(Box::new(move |key| {
            if key == DISMISS_KEY {
                if let Some(modal) = modal.upgrade() {
                    modal.close();
                }
            }
        }));
        *self.key_listener.borrow_mut() = Some(listener);

        let modal: Weak<Self> = Rc::downgrade(self);
        self.host.after_render(Box::new(move || {
            if let Some(modal) = modal.upgrade() {
                if modal.is_open() {
                    modal.host.focus(&modal.container_id);
                }
            }
        }));
    }

    /// Closes when open, otherwise opens on `subject`.
    pub fn toggle(self: &Rc<Self>, subject: T) {
        if self.is_open() {
            self.close();
        } else {
            self.open(subject);
        }
    }

    pub fn is_open_signal(&self) -> impl Signal<Item = bool> + use<T> {
        self.subject.signal_ref(|subject| subject.is_some())
    }

    pub fn subject_signal(&self) -> impl Signal<Item = Option<T>> + use<T> {
        self.subject.signal_cloned()
    }
}

impl<T> Drop for ModalController<T> {
    fn drop(&mut self) {
        self.close();
    }
}

/// [`ModalHost`] backed by the page body and window.
pub struct DomModalHost;

impl ModalHost for DomModalHost {
    fn page_overflow(&self) -> String {
        body()
            .style()
            .get_property_value("overflow")
            .unwrap_or_default()
    }

    fn set_page_overflow(&self, value: &str) {
        let style = body().style();
        let result = if value.is_empty() {
            style.remove_property("overflow").map(|_| ())
        } else {
            style.set_property("overflow", value)
        };
        if let Err(e) = result {
            error!("error set overflow: {:?}", e);
        }
    }

    fn listen_keydown(&self, f: Box<dyn Fn(&str)>) -> KeyListener {
        let closure = Closure::wrap(Box::new(move |e: web_sys::KeyboardEvent| {
            f(&e.key());
        }) as Box<dyn FnMut(_)>);

        let window = window();
        if let Err(e) =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
        {
            error!("error add keydown listener: {:?}", e);
        }

        KeyListener::new(move || {
            let _ = window
                .remove_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            // the listener may be running this very closure
            spawn_local(async move { drop(closure) });
        })
    }

    fn after_render(&self, f: Box<dyn FnOnce()>) {
        let callback = Closure::once_into_js(move || f());
        if let Err(e) = window().request_animation_frame(callback.unchecked_ref()) {
            error!("error request animation frame: {:?}", e);
        }
    }

    fn focus(&self, element_id: &str) {
        let Some(element) = document()
            .get_element_by_id(element_id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        else {
            warn!("no element #{} to focus", element_id);
            return;
        };

        if let Err(e) = element.focus() {
            error!("error focus #{}: {:?}", element_id, e);
        }
    }
}

#[cfg(test)]
mod test {
    use std::cell::Cell;

    use super::*;

    #[derive(Default)]
    struct FakePage {
        overflow: RefCell<String>,
        key_handler: Rc<RefCell<Option<Rc<dyn Fn(&str)>>>>,
        listens: Cell<usize>,
        pending_render: RefCell<Vec<Box<dyn FnOnce()>>>,
        focused: RefCell<Vec<String>>,
    }

    impl FakePage {
        fn press(&self, key: &str) {
            let handler = self.key_handler.borrow().clone();
            if let Some(handler) = handler {
                handler(key);
            }
        }

        fn render(&self) {
            let pending: Vec<_> = self.pending_render.borrow_mut().drain(..).collect();
            for f in pending {
                f();
            }
        }

        fn is_listening(&self) -> bool {
            self.key_handler.borrow().is_some()
        }
    }

    impl ModalHost for FakePage {
        fn page_overflow(&self) -> String {
            self.overflow.borrow().clone()
        }

        fn set_page_overflow(&self, value: &str) {
            *self.overflow.borrow_mut() = value.to_string();
        }

        fn listen_keydown(&self, f: Box<dyn Fn(&str)>) -> KeyListener {
            self.listens.set(self.listens.get() + 1);
            *self.key_handler.borrow_mut() = Some(Rc::from(f));
            let handler = self.key_handler.clone();
            KeyListener::new(move || {
                handler.borrow_mut().take();
            })
        }

        fn after_render(&self, f: Box<dyn FnOnce()>) {
            self.pending_render.borrow_mut().push(f);
        }

        fn focus(&self, element_id: &str) {
            self.focused.borrow_mut().push(element_id.to_string());
        }
    }

    fn modal(page: &Rc<FakePage>) -> Rc<ModalController<&'static str>> {
        ModalController::new(page.clone(), "detail-modal")
    }

    #[test]
    fn test_escape_closes_and_restores_scroll() {
        let page = Rc::new(FakePage::default());
        *page.overflow.borrow_mut() = "auto".to_string();
        let modal = modal(&page);

        modal.open("A");
        assert!(modal.is_open());
        assert_eq!(modal.subject.get_cloned(), Some("A"));
        assert_eq!(page.page_overflow(), "hidden");
        assert!(page.is_listening());

        page.press("Escape");
        assert!(!modal.is_open());
        assert_eq!(modal.subject.get_cloned(), None);
        assert_eq!(page.page_overflow(), "auto");
        assert!(!page.is_listening());
    }

    #[test]
    fn test_other_keys_do_not_close() {
        let page = Rc::new(FakePage::default());
        let modal = modal(&page);

        modal.open("A");
        page.press("Enter");
        page.press("Tab");
        assert!(modal.is_open());
    }

    #[test]
    fn test_restores_suppression_set_by_ancestor() {
        let page = Rc::new(FakePage::default());
        *page.overflow.borrow_mut() = "hidden".to_string();
        let modal = modal(&page);

        modal.open("A");
        modal.close();
        assert_eq!(page.page_overflow(), "hidden");
    }

    #[test]
    fn test_focus_waits_for_render() {
        let page = Rc::new(FakePage::default());
        let modal = modal(&page);

        modal.open("A");
        assert!(page.focused.borrow().is_empty());

        page.render();
        assert_eq!(*page.focused.borrow(), vec!["detail-modal".to_string()]);
    }

    #[test]
    fn test_no_focus_when_closed_before_render() {
        let page = Rc::new(FakePage::default());
        let modal = modal(&page);

        modal.open("A");
        modal.close();
        page.render();
        assert!(page.focused.borrow().is_empty());
    }

    #[test]
    fn test_reopen_replaces_subject_only() {
        let page = Rc::new(FakePage::default());
        *page.overflow.borrow_mut() = "scroll".to_string();
        let modal = modal(&page);

        modal.open("A");
        modal.open("B");
        assert_eq!(modal.subject.get_cloned(), Some("B"));
        assert_eq!(page.listens.get(), 1);

        modal.close();
        assert_eq!(page.page_overflow(), "scroll");
    }

    #[test]
    fn test_backdrop_activation() {
        let page = Rc::new(FakePage::default());
        let modal = modal(&page);

        modal.open("A");
        modal.backdrop_activated(true);
        assert!(modal.is_open());

        modal.backdrop_activated(false);
        assert!(!modal.is_open());
        assert_eq!(page.page_overflow(), "");
    }

    #[test]
    fn test_toggle_and_escape() {
        let page = Rc::new(FakePage::default());
        let drawer: Rc<ModalController<()>> = ModalController::new(page.clone(), "nav-drawer");

        drawer.toggle(());
        assert!(drawer.is_open());
        assert_eq!(page.page_overflow(), "hidden");

        drawer.toggle(());
        assert!(!drawer.is_open());
        assert_eq!(page.page_overflow(), "");

        drawer.toggle(());
        page.press("Escape");
        assert!(!drawer.is_open());
        assert!(!page.is_listening());
    }

    #[test]
    fn test_close_when_closed_is_noop() {
        let page = Rc::new(FakePage::default());
        *page.overflow.borrow_mut() = "auto".to_string();
        let modal = modal(&page);

        modal.close();
        assert_eq!(page.page_overflow(), "auto");
    }

    #[test]
    fn test_drop_while_open_cleans_up() {
        let page = Rc::new(FakePage::default());
        *page.overflow.borrow_mut() = "auto".to_string();
        let modal = modal(&page);

        modal.open("A");
        drop(modal);
        assert_eq!(page.page_overflow(), "auto");
        assert!(!page.is_listening());
    }
}
