use std::rc::Rc;

use dominator::{Dom, clone, events, html};
use futures_signals::signal::{Mutable, SignalExt};
use gloo_timers::future::TimeoutFuture;

const HIDE_AFTER_MS: u32 = 4_000;

thread_local! {
    static SNACKBAR: Rc<Snackbar> = Snackbar::new();
}

pub fn show<S: Into<String>>(message: S) {
    SNACKBAR.with(|s| s.show(message.into()));
}

pub fn render() -> Dom {
    SNACKBAR.with(|s| Snackbar::render(s.clone()))
}

pub struct Snackbar {
    message: Mutable<Option<String>>,
}

impl Snackbar {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            message: Mutable::new(None),
        })
    }

    pub fn show(&self, message: String) {
        self.message.set(Some(message));
    }

    pub fn dismiss(&self) {
        self.message.set(None);
    }

    pub fn render(snackbar: Rc<Self>) -> Dom {
        html!("div", {
            .class("snackbar")
            .attr("role", "status")
            .attr("aria-live", "polite")
            .visible_signal(snackbar.message.signal_ref(|message| message.is_some()))
            .future(snackbar.message.signal_cloned().for_each(clone!(snackbar => move |message| {
                clone!(snackbar => async move {
                    if let Some(message) = message {
                        TimeoutFuture::new(HIDE_AFTER_MS).await;
                        let mut current = snackbar.message.lock_mut();
                        if current.as_ref() == Some(&message) {
                            *current = None;
                        }
                    }
                })
            })))
            .children(&mut [
                html!("div", {
                    .child_signal(snackbar.message.signal_cloned().map(|message| message.map(|msg| html!("span", {
                        .text(&msg)
                    }))))
                    .children(&mut [
                        html!("button", {
                            .attr("aria-label", "Dismiss")
                            .text("✕")
                            .event(clone!(snackbar => move |_: events::Click| snackbar.dismiss()))
                        })
                    ])
                })
            ])
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_show_and_dismiss() {
        let snackbar = Snackbar::new();
        snackbar.show("Favorites could not be saved".to_string());
        assert_eq!(snackbar.message.get_cloned().as_deref(), Some("Favorites could not be saved"));

        snackbar.dismiss();
        assert_eq!(snackbar.message.get_cloned(), None);
    }
}
