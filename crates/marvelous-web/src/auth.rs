use std::rc::Rc;

use dominator::{Dom, EventOptions, clone, events, html, link, routing, with_node};
use futures_signals::signal::{Mutable, SignalExt};
use web_sys::HtmlInputElement;

use crate::{
    common::{Route, snackbar},
    context::AppContext,
    query::ApiClient,
    utils::AsyncLoader,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

impl AuthMode {
    fn title(&self) -> &'static str {
        match self {
            AuthMode::Login => "Log in",
            AuthMode::Signup => "Create an account",
        }
    }

    fn submit_text(&self, submitting: bool) -> &'static str {
        match (self, submitting) {
            (AuthMode::Login, false) => "Log in",
            (AuthMode::Login, true) => "Logging in...",
            (AuthMode::Signup, false) => "Create my account",
            (AuthMode::Signup, true) => "Creating...",
        }
    }
}

/// Returns the first required field left blank.
pub fn missing_field(mode: AuthMode, email: &str, username: &str, password: &str) -> Option<&'static str> {
    if mode == AuthMode::Signup && username.trim().is_empty() {
        Some("Username")
    } else if email.trim().is_empty() {
        Some("Email")
    } else if password.is_empty() {
        Some("Password")
    } else {
        None
    }
}

pub struct Auth {
    context: Rc<AppContext>,
    mode: AuthMode,
    email: Mutable<String>,
    username: Mutable<String>,
    password: Mutable<String>,
    loader: AsyncLoader,
}

impl Auth {
    pub fn new(context: Rc<AppContext>, mode: AuthMode) -> Rc<Self> {
        Rc::new(Self {
            context,
            mode,
            email: Mutable::new("".to_string()),
            username: Mutable::new("".to_string()),
            password: Mutable::new("".to_string()),
            loader: AsyncLoader::new(),
        })
    }

    fn submit(auth: Rc<Self>) {
        let email = auth.email.get_cloned();
        let username = auth.username.get_cloned();
        let password = auth.password.get_cloned();

        if let Some(field) = missing_field(auth.mode, &email, &username, &password) {
            snackbar::show(format!("{} is required", field));
            return;
        }

        auth.loader.load(clone!(auth => async move {
            let client = ApiClient::from_config();
            let result = match auth.mode {
                AuthMode::Login => client.login(email.trim(), &password).await,
                AuthMode::Signup => client
                    .signup(email.trim(), username.trim(), &password)
                    .await
                    .map(|mut res| {
                        res.username = res.username.or_else(|| Some(username.trim().to_string()));
                        res
                    }),
            };

            match result {
                Ok(res) => {
                    info!("{} succeeded", auth.mode.title());
                    auth.context.session.set_user(res.token, res.username);
                    auth.password.set("".to_string());
                    routing::go_to_url(&Route::Home.url());
                }
                Err(e) => {
                    error!("{} failed: {:#}", auth.mode.title(), e);
                    snackbar::show(format!("{} failed, please check your details", auth.mode.title()));
                }
            }
        }));
    }

    fn render_input(label: &str, input_type: &str, value: &Mutable<String>) -> Dom {
        html!("label", {
            .class("auth-label")
            .children(&mut [
                html!("span", {
                    .text(label)
                }),
                html!("input" => HtmlInputElement, {
                    .class("auth-input")
                    .attr("type", input_type)
                    .attr("placeholder", label)
                    .attr("required", "")
                    .prop_signal("value", value.signal_cloned())
                    .with_node!(input => {
                        .event(clone!(value => move |_: events::Input| {
                            value.set(input.value());
                        }))
                    })
                }),
            ])
        })
    }

    fn render_switch(&self) -> Dom {
        let (question, route, text) = match self.mode {
            AuthMode::Login => ("No account yet?", Route::Signup, "Sign up"),
            AuthMode::Signup => ("Already have an account?", Route::Login, "Log in"),
        };

        html!("p", {
            .class("auth-switch")
            .children(&mut [
                html!("span", {
                    .text(question)
                }),
                link!(route.url(), {
                    .class("link-accent")
                    .text(text)
                }),
            ])
        })
    }

    pub fn render(auth: Rc<Self>) -> Dom {
        let mut fields = vec![];
        if auth.mode == AuthMode::Signup {
            fields.push(Self::render_input("Username", "text", &auth.username));
        }
        fields.push(Self::render_input("Email", "email", &auth.email));
        fields.push(Self::render_input("Password", "password", &auth.password));

        html!("section", {
            .class("auth-page")
            .children(&mut [
                html!("h2", {
                    .text(auth.mode.title())
                }),
                html!("form", {
                    .class("auth-form")
                    .event_with_options(&EventOptions::preventable(), clone!(auth => move |e: events::KeyDown| {
                        if e.key() == "Enter" {
                            e.prevent_default();
                            Self::submit(auth.clone());
                        }
                    }))
                    .children(fields)
                    .children(&mut [
                        html!("button", {
                            .class("auth-submit")
                            .attr_signal("disabled", auth.loader.is_loading().map(|loading| loading.then_some("")))
                            .text_signal(auth.loader.is_loading().map(clone!(auth => move |loading| auth.mode.submit_text(loading))))
                            .event_with_options(&EventOptions::preventable(), clone!(auth => move |e: events::Click| {
                                e.prevent_default();
                                Self::submit(auth.clone());
                            }))
                        }),
                    ])
                }),
                auth.render_switch(),
            ])
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_missing_field() {
        assert_eq!(missing_field(AuthMode::Login, "peter@dailybugle.com", "", "webs"), None);
        assert_eq!(missing_field(AuthMode::Signup, "peter@dailybugle.com", " ", "webs"), Some("Username"));
        assert_eq!(missing_field(AuthMode::Login, "  ", "", "webs"), Some("Email"));
        assert_eq!(missing_field(AuthMode::Signup, "peter@dailybugle.com", "peter", ""), Some("Password"));
    }

    #[test]
    fn test_submit_text() {
        assert_eq!(AuthMode::Signup.submit_text(true), "Creating...");
        assert_eq!(AuthMode::Login.submit_text(false), "Log in");
    }
}
