use std::{collections::HashSet, rc::Rc};

use futures_signals::{
    signal::{Signal, SignalExt},
    signal_vec::{MutableVec, SignalVec, SignalVecExt},
};
use marvelous_schema::model::FavoriteItem;

use crate::{
    common::snackbar,
    storage::{self, KeyValueStore},
};

pub const STORAGE_KEY: &str = "marvel_favorites";

/// The favorited characters and comics, shared by every view of the page.
///
/// The in-memory list is the mirror views subscribe to. Each mutation replaces the whole
/// durable record right away.
pub struct FavoritesStore {
    storage: Rc<dyn KeyValueStore>,
    items: MutableVec<FavoriteItem>,
}

impl FavoritesStore {
    pub fn new(storage: Rc<dyn KeyValueStore>) -> Rc<Self> {
        let store = Self {
            storage,
            items: MutableVec::new(),
        };
        store.rehydrate();

        Rc::new(store)
    }

    /// Reads the durable record. Absent or corrupted records read as empty, and entries that
    /// cannot be decoded are skipped without losing the rest.
    pub fn load(&self) -> Vec<FavoriteItem> {
        let entries: Vec<serde_json::Value> =
            storage::read_json(self.storage.as_ref(), STORAGE_KEY).unwrap_or_default();

        let mut seen = HashSet::new();
        entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<FavoriteItem>(entry) {
                Ok(item) if !item.identifier.is_empty() => Some(item),
                Ok(_) => {
                    warn!("skipping favorite without identifier");
                    None
                }
                Err(e) => {
                    warn!("skipping malformed favorite: {}", e);
                    None
                }
            })
            .filter(|item| seen.insert(item.identifier.clone()))
            .collect()
    }

    /// Persists `items` as the full record. Failures are logged, never returned.
    pub fn save(&self, items: &[FavoriteItem]) {
        if let Err(e) = storage::write_json(self.storage.as_ref(), STORAGE_KEY, items) {
            error!("failed to save favorites: {}", e);
            snackbar::show("Favorites could not be saved on this device".to_string());
        }
    }

    /// Replaces the mirror with what is currently stored.
    pub fn rehydrate(&self) {
        let items = self.load();
        debug!("hydrated {} favorites", items.len());
        self.items.lock_mut().replace_cloned(items);
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.items
            .lock_ref()
            .iter()
            .any(|item| item.identifier == identifier)
    }

    /// Removes the item with the same identifier, or appends `item` when there is none.
    pub fn toggle(&self, item: FavoriteItem) -> Vec<FavoriteItem> {
        if item.identifier.is_empty() {
            warn!("ignoring favorite without identifier: {}", item.label);
            return self.items();
        }
        debug!(
            "{} favorite {}",
            if self.contains(&item.identifier) { "removing" } else { "adding" },
            item.identifier
        );
        let mut items = self.items.lock_ref().to_vec();
        if let Some(index) = items.iter().position(|i| i.identifier == item.identifier) {
            items.remove(index);
        } else {
            items.push(item);
        }

        self.save(&items);
        self.items.lock_mut().replace_cloned(items.clone());

        items
    }

    pub fn items(&self) -> Vec<FavoriteItem> {
        self.items.lock_ref().to_vec()
    }

    pub fn signal_vec(&self) -> impl SignalVec<Item = FavoriteItem> + use<> {
        self.items.signal_vec_cloned()
    }

    pub fn contains_signal(&self, identifier: String) -> impl Signal<Item = bool> + use<> {
        self.items
            .signal_vec_cloned()
            .filter(move |item| item.identifier == identifier)
            .is_empty()
            .map(|empty| !empty)
    }

    pub fn is_empty_signal(&self) -> impl Signal<Item = bool> + use<> {
        self.items.signal_vec_cloned().is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::storage::MemoryStorage;
    use futures::{StreamExt, executor::block_on};
    use marvelous_schema::model::ItemKind;

    fn three_d_man() -> FavoriteItem {
        FavoriteItem {
            identifier: "1011334".to_string(),
            kind: ItemKind::Character,
            label: "3-D Man".to_string(),
            image_url: "http://x/3d.jpg".to_string(),
        }
    }

    fn comic(identifier: &str) -> FavoriteItem {
        FavoriteItem {
            identifier: identifier.to_string(),
            kind: ItemKind::Comic,
            label: format!("Comic {}", identifier),
            image_url: format!("http://x/{}.jpg", identifier),
        }
    }

    fn store() -> (Rc<MemoryStorage>, Rc<FavoritesStore>) {
        let storage = Rc::new(MemoryStorage::new());
        let store = FavoritesStore::new(storage.clone());
        (storage, store)
    }

    #[test]
    fn test_toggle_twice_restores_empty_store() {
        let (storage, store) = store();

        let items = store.toggle(three_d_man());
        assert_eq!(items, vec![three_d_man()]);
        assert!(store.contains("1011334"));
        assert_eq!(store.load(), vec![three_d_man()]);

        let items = store.toggle(three_d_man());
        assert!(items.is_empty());
        assert!(!store.contains("1011334"));
        assert_eq!(storage.read(STORAGE_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_toggle_is_idempotent_on_populated_store() {
        let (_, store) = store();
        store.toggle(comic("1"));
        store.toggle(comic("2"));
        let before = store.items();

        store.toggle(comic("3"));
        store.toggle(comic("3"));
        assert_eq!(store.items(), before);

        store.toggle(comic("1"));
        store.toggle(comic("1"));
        assert_eq!(store.items().len(), 2);
        assert_eq!(store.items()[1], comic("1"));
    }

    #[test]
    fn test_identifiers_stay_unique() {
        let (_, store) = store();
        for id in ["1", "2", "1", "3", "2", "2", "4", "1"] {
            store.toggle(comic(id));
        }

        let items = store.items();
        let ids: HashSet<_> = items.iter().map(|i| i.identifier.clone()).collect();
        assert_eq!(ids.len(), items.len());
    }

    #[test]
    fn test_identifier_shared_across_kinds_is_one_entry() {
        let (_, store) = store();
        store.toggle(three_d_man());

        let mut same_id = comic("1011334");
        same_id.kind = ItemKind::Comic;
        assert!(store.toggle(same_id).is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (_, store) = store();
        let items = vec![three_d_man(), comic("7"), comic("8")];

        store.save(&items);
        assert_eq!(store.load(), items);
    }

    #[test]
    fn test_load_tolerates_corruption() {
        let (storage, store) = store();

        for raw in ["not json", r#"[{"identifier":"1""#, "{}", r#"[{"label":"x"}]"#, ""] {
            storage.write(STORAGE_KEY, raw).unwrap();
            assert!(store.load().is_empty(), "{:?} should load as empty", raw);
        }
    }

    #[test]
    fn test_partial_entry_keeps_valid_favorites() {
        let (storage, store) = store();
        storage
            .write(
                STORAGE_KEY,
                r#"[{"identifier":"1","type":"comic","label":"Comic 1","imageUrl":"http://x/1.jpg"},{"identifier":"2","type":"comic","imageUrl":"v"},{"label":"orphan"},{"identifier":"","type":"comic"}]"#,
            )
            .unwrap();
        store.rehydrate();

        let items = store.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], comic("1"));
        assert_eq!(items[1].identifier, "2");
        assert_eq!(items[1].label, marvelous_schema::model::LABEL_PLACEHOLDER);

        store.toggle(comic("3"));
        let ids: Vec<_> = store.load().into_iter().map(|i| i.identifier).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_toggle_without_identifier_is_ignored() {
        let (storage, store) = store();
        store.toggle(comic("1"));

        let items = store.toggle(comic(""));
        assert_eq!(items, vec![comic("1")]);
        assert!(!store.contains(""));
        assert_eq!(store.load(), vec![comic("1")]);
        assert!(storage.read(STORAGE_KEY).unwrap().is_some());
    }

    #[test]
    fn test_load_collapses_duplicates() {
        let storage = Rc::new(MemoryStorage::new());
        storage::write_json(storage.as_ref(), STORAGE_KEY, &[comic("1"), comic("2"), comic("1")])
            .unwrap();

        let store = FavoritesStore::new(storage);
        assert_eq!(store.items(), vec![comic("1"), comic("2")]);
    }

    #[test]
    fn test_write_failure_is_not_surfaced() {
        let (storage, store) = store();
        store.toggle(comic("1"));

        storage.reject_writes(true);
        let items = store.toggle(comic("2"));

        assert_eq!(items, vec![comic("1"), comic("2")]);
        assert!(store.contains("2"));
        assert_eq!(store.load(), vec![comic("1")]);
    }

    #[test]
    fn test_toggle_is_visible_to_other_views() {
        let (_, store) = store();
        let mut character_view = store.contains_signal("1011334".to_string()).to_stream();
        let mut favorites_view = store.is_empty_signal().to_stream();

        assert_eq!(block_on(character_view.next()), Some(false));
        assert_eq!(block_on(favorites_view.next()), Some(true));

        store.toggle(three_d_man());

        assert_eq!(block_on(character_view.next()), Some(true));
        assert_eq!(block_on(favorites_view.next()), Some(false));
    }

    #[test]
    fn test_rehydrate_picks_up_external_writes() {
        let (storage, store) = store();
        storage::write_json(storage.as_ref(), STORAGE_KEY, &[comic("9")]).unwrap();
        assert!(!store.contains("9"));

        store.rehydrate();
        assert!(store.contains("9"));
    }
}
