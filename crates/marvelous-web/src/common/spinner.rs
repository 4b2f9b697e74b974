use dominator::{Dom, html};
use futures_signals::signal::Signal;

pub struct Spinner;

impl Spinner {
    pub fn render(active: impl Signal<Item = bool> + 'static) -> Dom {
        html!("div", {
            .class("spinner")
            .attr("role", "progressbar")
            .attr("aria-label", "Loading")
            .visible_signal(active)
            .children(&mut [
                html!("div", {
                    .class("loader")
                })
            ])
        })
    }
}
