pub mod model;

use model::ItemKind;

/// Image variant requested from the catalog CDN for every cover.
pub const IMAGE_VARIANT: &str = "portrait_uncanny";

/// Paginated collections exposed by the catalog API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Characters,
    Comics,
}

impl Resource {
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Characters => "characters",
            Resource::Comics => "comics",
        }
    }

    /// Query parameter the API filters on for this collection.
    pub fn search_param(&self) -> &'static str {
        match self {
            Resource::Characters => "name",
            Resource::Comics => "title",
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Resource::Characters => ItemKind::Character,
            Resource::Comics => ItemKind::Comic,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_search_param() {
        assert_eq!(Resource::Characters.search_param(), "name");
        assert_eq!(Resource::Comics.search_param(), "title");
    }

    #[test]
    fn test_kind() {
        assert_eq!(Resource::Characters.kind(), ItemKind::Character);
        assert_eq!(Resource::Comics.kind(), ItemKind::Comic);
        assert_eq!(Resource::Comics.path(), "comics");
    }
}
