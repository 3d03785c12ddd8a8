use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::ManifestError;
use crate::state::data::{AssetEntry, AssetManifest};

/// Check if a file has one of the accepted (lowercase) image extensions
pub fn has_image_extension(path: &Path, extensions: &[String]) -> bool {
    match path.extension() {
        Some(extension) => {
            let ext = extension.to_string_lossy().to_lowercase();
            extensions.iter().any(|accepted| *accepted == ext)
        }
        None => false,
    }
}

/// Scan `<creators_dir>/<creator_id>/{profile.*, cover.*, gallery/*}` into
/// a manifest.
///
/// A missing creators directory is created and yields an empty manifest.
/// Hidden entries are skipped.
pub fn generate_manifest(creators_dir: &Path, extensions: &[String]) -> Result<AssetManifest, ManifestError> {
    let mut manifest = AssetManifest::new();

    if !creators_dir.exists() {
        tracing::info!(dir = %creators_dir.display(), "Creating creators directory");
        fs::create_dir_all(creators_dir).map_err(|source| ManifestError::Io {
            path: creators_dir.to_path_buf(),
            source,
        })?;
        return Ok(manifest);
    }

    for entry in WalkDir::new(creators_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') || !entry.file_type().is_dir() {
            continue;
        }

        let assets = scan_creator(entry.path(), extensions)?;
        tracing::info!(
            creator = %name,
            profile = assets.profile.is_some(),
            cover = assets.cover.is_some(),
            gallery = assets.gallery.len(),
            "Scanned creator"
        );
        manifest.insert(name, assets);
    }

    tracing::info!(creators = manifest.len(), "Manifest scan complete");
    Ok(manifest)
}

/// Scan one creator folder
fn scan_creator(creator_dir: &Path, extensions: &[String]) -> Result<AssetEntry, ManifestError> {
    let mut assets = AssetEntry::default();

    for entry in WalkDir::new(creator_dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || !has_image_extension(path, extensions) {
            continue;
        }

        let stem = path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_lowercase();
        let filename = entry.file_name().to_string_lossy().to_string();
        match stem.as_str() {
            "profile" => assets.profile = Some(filename),
            "cover" => assets.cover = Some(filename),
            _ => {}
        }
    }

    let gallery_dir = creator_dir.join("gallery");
    if gallery_dir.is_dir() {
        for entry in WalkDir::new(&gallery_dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            if entry.file_type().is_file() && has_image_extension(entry.path(), extensions) {
                assets.gallery.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        assets.gallery.sort();
    }

    Ok(assets)
}

/// Write the manifest as pretty-printed JSON, creating parent directories
pub fn write_manifest(path: &Path, manifest: &AssetManifest) -> Result<(), ManifestError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ManifestError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(path, json).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), creators = manifest.len(), "Wrote asset manifest");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extensions() -> Vec<String> {
        ["jpg", "jpeg", "png", "webp", "gif"].map(String::from).to_vec()
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_scans_profile_cover_and_gallery() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("jane/Profile.JPG"));
        touch(&root.join("jane/cover.webp"));
        touch(&root.join("jane/notes.txt"));
        touch(&root.join("jane/gallery/b.png"));
        touch(&root.join("jane/gallery/a.jpg"));
        touch(&root.join("jane/gallery/readme.md"));
        touch(&root.join("bob/gallery/1.gif"));
        touch(&root.join(".hidden/profile.jpg"));
        touch(&root.join("stray.jpg"));

        let manifest = generate_manifest(root, &extensions()).unwrap();

        assert_eq!(manifest.keys().collect::<Vec<_>>(), vec!["bob", "jane"]);
        let jane = &manifest["jane"];
        assert_eq!(jane.profile.as_deref(), Some("Profile.JPG"));
        assert_eq!(jane.cover.as_deref(), Some("cover.webp"));
        assert_eq!(jane.gallery, vec!["a.jpg".to_string(), "b.png".to_string()]);

        let bob = &manifest["bob"];
        assert!(bob.profile.is_none());
        assert_eq!(bob.gallery, vec!["1.gif".to_string()]);
    }

    #[test]
    fn test_missing_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let creators = dir.path().join("assets/creators");
        let manifest = generate_manifest(&creators, &extensions()).unwrap();
        assert!(manifest.is_empty());
        assert!(creators.is_dir());
    }

    #[test]
    fn test_written_manifest_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("creators/jane/cover.jpg"));
        let manifest = generate_manifest(&dir.path().join("creators"), &extensions()).unwrap();

        let out = dir.path().join("data/assets-manifest.json");
        write_manifest(&out, &manifest).unwrap();

        let raw = fs::read_to_string(&out).unwrap();
        assert!(raw.contains("\"profile\": null"));
        let parsed: AssetManifest = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, manifest);
    }
}
