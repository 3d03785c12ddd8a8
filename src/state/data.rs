/// Shared data structures for the gallery state
///
/// These structs mirror the two JSON documents the site is built from:
/// the creator list and the asset manifest. Both are loaded, never owned
/// or mutated by the gallery.
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Link key for the primary profile link that makes a whole card clickable
pub const PRIMARY_LINK: &str = "ct";
/// Link key for the creator's own website
pub const WEBSITE_LINK: &str = "website";

/// Treat an explicit `null` like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Represents a single creator in the gallery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    /// Stable identifier, joined against the asset manifest
    pub id: String,
    /// Display name (title-cased at render time)
    pub name: String,
    /// Name in the creator's own script, shown next to the display name
    #[serde(default)]
    pub name_origin: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Free text, segments optionally separated by `/`
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Lexically sortable date string (e.g. "2024-03-01")
    #[serde(default, rename = "addedDate")]
    pub added_date: Option<String>,
    /// Link kind → URL, in document order
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: IndexMap<String, Option<String>>,
}

impl Creator {
    /// Look up a link by kind, treating null and empty values as absent
    pub fn link(&self, kind: &str) -> Option<&str> {
        self.links
            .get(kind)
            .and_then(|url| url.as_deref())
            .filter(|url| !url.is_empty())
    }

    /// The primary profile link ("ct"), if any
    pub fn primary_link(&self) -> Option<&str> {
        self.link(PRIMARY_LINK)
    }

    pub fn website(&self) -> Option<&str> {
        self.link(WEBSITE_LINK)
    }

    /// True if any of this creator's tags is in `selected`
    pub fn has_any_tag<'a>(&self, mut selected: impl Iterator<Item = &'a String>) -> bool {
        selected.any(|tag| self.tags.contains(tag))
    }
}

/// Manifest entry describing which image files exist for one creator.
///
/// Filenames are relative to the creator's asset root; a missing field
/// means "no such asset".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    /// Gallery filenames, alphabetically sorted at generation time
    #[serde(default, deserialize_with = "null_as_default")]
    pub gallery: Vec<String>,
}

/// Asset manifest keyed by creator identifier
pub type AssetManifest = BTreeMap<String, AssetEntry>;

/// Both documents the gallery needs, loaded together
#[derive(Debug, Clone, Default)]
pub struct SiteData {
    pub creators: Vec<Creator>,
    pub manifest: AssetManifest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_creator_parses() {
        let creator: Creator = serde_json::from_str(r#"{"id": "a", "name": "Alpha"}"#).unwrap();
        assert_eq!(creator.id, "a");
        assert!(creator.tags.is_empty());
        assert!(creator.primary_link().is_none());
        assert!(creator.added_date.is_none());
    }

    #[test]
    fn test_links_keep_document_order() {
        let creator: Creator = serde_json::from_str(
            r#"{"id": "a", "name": "A", "links": {"youtube": "y", "ct": "c", "github": "g"}}"#,
        )
        .unwrap();
        let keys: Vec<&str> = creator.links.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["youtube", "ct", "github"]);
    }

    #[test]
    fn test_null_and_empty_links_are_absent() {
        let creator: Creator = serde_json::from_str(
            r#"{"id": "a", "name": "A", "links": {"ct": null, "website": ""}}"#,
        )
        .unwrap();
        assert!(creator.primary_link().is_none());
        assert!(creator.website().is_none());
    }

    #[test]
    fn test_added_date_uses_camel_case_key() {
        let creator: Creator =
            serde_json::from_str(r#"{"id": "a", "name": "A", "addedDate": "2024-01-02"}"#).unwrap();
        assert_eq!(creator.added_date.as_deref(), Some("2024-01-02"));
    }

    #[test]
    fn test_manifest_entry_missing_fields() {
        let manifest: AssetManifest = serde_json::from_str(r#"{"a": {"gallery": ["1.jpg"]}}"#).unwrap();
        let entry = &manifest["a"];
        assert!(entry.profile.is_none());
        assert!(entry.cover.is_none());
        assert_eq!(entry.gallery, vec!["1.jpg".to_string()]);
    }

    #[test]
    fn test_null_collections_are_empty() {
        let creator: Creator =
            serde_json::from_str(r#"{"id": "a", "name": "A", "tags": null, "links": null}"#).unwrap();
        assert!(creator.tags.is_empty());
        assert!(creator.links.is_empty());
        assert!(creator.primary_link().is_none());

        let manifest: AssetManifest =
            serde_json::from_str(r#"{"a": {"profile": null, "cover": null, "gallery": null}}"#).unwrap();
        assert_eq!(manifest["a"], AssetEntry::default());
    }
}
