/// Asset resolution: creator id + manifest → site-relative image paths
use rand::Rng;

use super::data::{AssetEntry, AssetManifest};

/// Fully qualified (site-relative) image paths for one creator.
///
/// Recomputed for every render pass; never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetBundle {
    pub profile: Option<String>,
    pub cover: Option<String>,
    pub gallery: Vec<String>,
}

impl AssetBundle {
    /// Pick the image shown in the card's cover region.
    ///
    /// Explicit cover wins; otherwise a uniformly random gallery entry;
    /// otherwise nothing. Two calls may disagree when the gallery is used.
    pub fn pick_cover<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
        if let Some(cover) = &self.cover {
            return Some(cover.clone());
        }
        if self.gallery.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.gallery.len());
        Some(self.gallery[index].clone())
    }

    /// Ordered, de-duplicated image list for the hover carousel:
    /// the displayed cover first, then the gallery.
    pub fn carousel_images(&self, displayed_cover: Option<&str>) -> Vec<String> {
        let mut images: Vec<String> = Vec::with_capacity(self.gallery.len() + 1);
        for path in displayed_cover.into_iter().chain(self.gallery.iter().map(String::as_str)) {
            if !images.iter().any(|seen| seen == path) {
                images.push(path.to_string());
            }
        }
        images
    }
}

/// Resolves creator ids against the asset manifest
#[derive(Debug, Clone)]
pub struct AssetResolver<'a> {
    manifest: &'a AssetManifest,
    assets_root: &'a str,
}

impl<'a> AssetResolver<'a> {
    /// `assets_root` is the site-relative root holding one folder per creator
    /// (e.g. "assets/creators").
    pub fn new(manifest: &'a AssetManifest, assets_root: &'a str) -> Self {
        Self {
            manifest,
            assets_root: assets_root.trim_end_matches('/'),
        }
    }

    /// Resolve all image paths for a creator.
    ///
    /// A creator missing from the manifest resolves to an empty bundle.
    pub fn resolve(&self, creator_id: &str) -> AssetBundle {
        let empty = AssetEntry::default();
        let entry = self.manifest.get(creator_id).unwrap_or(&empty);
        let base = format!("{}/{}", self.assets_root, creator_id);

        // Empty filenames count as absent
        let file = |name: &Option<String>| {
            name.as_deref()
                .filter(|name| !name.is_empty())
                .map(|name| format!("{base}/{name}"))
        };

        AssetBundle {
            profile: file(&entry.profile),
            cover: file(&entry.cover),
            gallery: entry
                .gallery
                .iter()
                .filter(|name| !name.is_empty())
                .map(|name| format!("{base}/gallery/{name}"))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn manifest() -> AssetManifest {
        let mut manifest = AssetManifest::new();
        manifest.insert(
            "full".into(),
            AssetEntry {
                profile: Some("profile.jpg".into()),
                cover: Some("cover.png".into()),
                gallery: vec!["a.jpg".into(), "b.jpg".into()],
            },
        );
        manifest.insert(
            "gallery-only".into(),
            AssetEntry {
                profile: None,
                cover: None,
                gallery: vec!["a.jpg".into(), "b.jpg".into(), "c.jpg".into()],
            },
        );
        manifest.insert("bare".into(), AssetEntry::default());
        manifest
    }

    #[test]
    fn test_resolve_joins_asset_root() {
        let manifest = manifest();
        let resolver = AssetResolver::new(&manifest, "assets/creators/");
        let bundle = resolver.resolve("full");

        assert_eq!(bundle.profile.as_deref(), Some("assets/creators/full/profile.jpg"));
        assert_eq!(bundle.cover.as_deref(), Some("assets/creators/full/cover.png"));
        assert_eq!(
            bundle.gallery,
            vec![
                "assets/creators/full/gallery/a.jpg".to_string(),
                "assets/creators/full/gallery/b.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn test_unknown_creator_resolves_empty() {
        let manifest = manifest();
        let resolver = AssetResolver::new(&manifest, "assets/creators");
        assert_eq!(resolver.resolve("nobody"), AssetBundle::default());
    }

    #[test]
    fn test_explicit_cover_always_wins() {
        let manifest = manifest();
        let bundle = AssetResolver::new(&manifest, "assets/creators").resolve("full");
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(
                bundle.pick_cover(&mut rng).as_deref(),
                Some("assets/creators/full/cover.png")
            );
        }
    }

    #[test]
    fn test_gallery_pick_is_member() {
        let manifest = manifest();
        let bundle = AssetResolver::new(&manifest, "assets/creators").resolve("gallery-only");
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let cover = bundle.pick_cover(&mut rng).unwrap();
            assert!(bundle.gallery.contains(&cover));
        }
    }

    #[test]
    fn test_no_cover_and_no_gallery_is_absent() {
        let manifest = manifest();
        let bundle = AssetResolver::new(&manifest, "assets/creators").resolve("bare");
        let mut rng = StdRng::seed_from_u64(1);
        assert!(bundle.pick_cover(&mut rng).is_none());
    }

    #[test]
    fn test_carousel_images_dedupe_cover() {
        let manifest = manifest();
        let bundle = AssetResolver::new(&manifest, "assets/creators").resolve("gallery-only");
        let cover = bundle.gallery[1].clone();
        let images = bundle.carousel_images(Some(&cover));

        assert_eq!(images.len(), 3);
        assert_eq!(images[0], cover);
        assert_eq!(images[1], bundle.gallery[0]);
        assert_eq!(images[2], bundle.gallery[2]);
    }

    #[test]
    fn test_empty_filenames_are_absent() {
        let mut manifest = AssetManifest::new();
        manifest.insert(
            "blank".into(),
            AssetEntry {
                profile: Some(String::new()),
                cover: Some(String::new()),
                gallery: vec![String::new(), "a.jpg".into()],
            },
        );
        let bundle = AssetResolver::new(&manifest, "assets/creators").resolve("blank");

        assert!(bundle.profile.is_none());
        assert!(bundle.cover.is_none());
        assert_eq!(bundle.gallery, vec!["assets/creators/blank/gallery/a.jpg".to_string()]);
    }
}
