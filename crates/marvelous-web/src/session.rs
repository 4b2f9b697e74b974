use std::rc::Rc;

use futures_signals::signal::{Mutable, Signal};

use crate::storage::KeyValueStore;

pub const TOKEN_KEY: &str = "MARVEL_TOKEN";
pub const USERNAME_KEY: &str = "MARVEL_USERNAME";

/// Token issued by the auth endpoint, plus the name to greet the user with.
pub struct Session {
    storage: Rc<dyn KeyValueStore>,
    token: Mutable<Option<String>>,
    username: Mutable<Option<String>>,
}

impl Session {
    pub fn new(storage: Rc<dyn KeyValueStore>) -> Rc<Self> {
        let read = |key: &str| match storage.read(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!("failed to read {}: {}", key, e);
                None
            }
        };
        let token = read(TOKEN_KEY);
        let username = read(USERNAME_KEY);

        Rc::new(Self {
            storage,
            token: Mutable::new(token),
            username: Mutable::new(username),
        })
    }

    /// Stores a fresh token. A missing username keeps the one already known.
    pub fn set_user(&self, token: String, username: Option<String>) {
        self.persist(TOKEN_KEY, Some(&token));
        self.token.set(Some(token));

        if let Some(username) = username.filter(|u| !u.trim().is_empty()) {
            self.persist(USERNAME_KEY, Some(&username));
            self.username.set(Some(username));
        }
    }

    pub fn logout(&self) {
        info!("logging out");
        self.persist(TOKEN_KEY, None);
        self.persist(USERNAME_KEY, None);
        self.token.set(None);
        self.username.set(None);
    }

    pub fn token(&self) -> Option<String> {
        self.token.get_cloned()
    }

    pub fn username(&self) -> Option<String> {
        self.username.get_cloned()
    }

    pub fn is_logged_in_signal(&self) -> impl Signal<Item = bool> + use<> {
        self.token.signal_ref(|token| token.is_some())
    }

    pub fn username_signal(&self) -> impl Signal<Item = Option<String>> + use<> {
        self.username.signal_cloned()
    }

    fn persist(&self, key: &str, value: Option<&str>) {
        let result = match value {
            Some(value) => self.storage.write(key, value),
            None => self.storage.remove(key),
        };
        if let Err(e) = result {
            warn!("failed to persist {}: {}", key, e);
        }
    }
}
