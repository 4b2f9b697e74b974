use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};

use crate::IMAGE_VARIANT;

pub const LABEL_PLACEHOLDER: &str = "Title unavailable";
pub const DESCRIPTION_PLACEHOLDER: &str = "No description available.";
const DEFAULT_EXTENSION: &str = "jpg";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Thumbnail {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub extension: String,
}

/// A character or a comic as returned by the catalog API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Entity {
    #[serde(rename = "_id", default, deserialize_with = "loose_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
}

impl Entity {
    /// Display name, `name` for characters and `title` for comics.
    pub fn label(&self) -> String {
        [self.name.as_deref(), self.title.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(LABEL_PLACEHOLDER)
            .to_string()
    }

    /// The description when the API sent a non blank one.
    pub fn raw_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn description(&self) -> String {
        self.raw_description()
            .unwrap_or(DESCRIPTION_PLACEHOLDER)
            .to_string()
    }

    pub fn image_url(&self) -> String {
        let (path, extension) = match &self.thumbnail {
            Some(thumbnail) => (thumbnail.path.as_str(), thumbnail.extension.as_str()),
            None => ("", ""),
        };
        let extension = if extension.is_empty() {
            DEFAULT_EXTENSION
        } else {
            extension
        };

        format!("{}/{}.{}", path, IMAGE_VARIANT, extension)
    }
}

/// One page of a collection, `{ results, count }` on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ListPage {
    #[serde(default, deserialize_with = "nullable_vec")]
    pub results: Vec<Entity>,
    #[serde(default, deserialize_with = "loose_count")]
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Character,
    Comic,
}

/// Entry of the favorites record kept in durable storage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FavoriteItem {
    pub identifier: String,
    #[serde(rename = "type", alias = "kind")]
    pub kind: ItemKind,
    #[serde(default = "label_placeholder")]
    pub label: String,
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
}

fn label_placeholder() -> String {
    LABEL_PLACEHOLDER.to_string()
}

impl FavoriteItem {
    pub fn from_entity(entity: &Entity, kind: ItemKind) -> Self {
        Self {
            identifier: entity.id.clone(),
            kind,
            label: entity.label(),
            image_url: entity.image_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

fn loose_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Loose::deserialize(deserializer)? {
        Loose::Unsigned(n) => n.to_string(),
        Loose::Signed(n) => n.to_string(),
        Loose::Float(n) => n.to_string(),
        Loose::Text(s) => s,
        Loose::Other(_) => String::new(),
    })
}

fn loose_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    fn from_float(n: f64) -> u64 {
        if n.is_finite() && n > 0.0 { n as u64 } else { 0 }
    }

    Ok(match Loose::deserialize(deserializer)? {
        Loose::Unsigned(n) => n,
        Loose::Signed(n) => u64::try_from(n).unwrap_or(0),
        Loose::Float(n) => from_float(n),
        Loose::Text(s) => s.trim().parse::<f64>().map(from_float).unwrap_or(0),
        Loose::Other(_) => 0,
    })
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
