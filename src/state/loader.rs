/// Loads the creator list and the asset manifest
///
/// Both files are read concurrently and joined: the gallery never starts
/// with only one of them. No retries; a failure is final for the session.
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use super::data::{AssetManifest, Creator, SiteData};
use crate::error::LoadError;

/// Read and parse both data files.
///
/// The first failure (either file, read or parse) fails the whole load.
pub async fn load_site(creators_path: PathBuf, manifest_path: PathBuf) -> Result<SiteData, LoadError> {
    let (creators, manifest) = tokio::try_join!(
        read_json::<Vec<Creator>>(&creators_path),
        read_json::<AssetManifest>(&manifest_path),
    )?;

    tracing::info!(
        creators = creators.len(),
        manifest_entries = manifest.len(),
        "Loaded site data"
    );
    Ok(SiteData { creators, manifest })
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[test]
    fn test_loads_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let creators = dir.path().join("creators.json");
        let manifest = dir.path().join("assets-manifest.json");
        fs::write(&creators, r#"[{"id": "a", "name": "A", "tags": ["VFX"]}]"#).unwrap();
        fs::write(&manifest, r#"{"a": {"profile": "profile.jpg", "cover": null, "gallery": []}}"#).unwrap();

        let data = block_on(load_site(creators, manifest)).unwrap();
        assert_eq!(data.creators.len(), 1);
        assert_eq!(data.manifest["a"].profile.as_deref(), Some("profile.jpg"));
    }

    #[test]
    fn test_null_optional_fields_still_load() {
        let dir = tempfile::tempdir().unwrap();
        let creators = dir.path().join("creators.json");
        let manifest = dir.path().join("assets-manifest.json");
        fs::write(&creators, r#"[{"id": "a", "name": "A", "tags": null, "links": null}]"#).unwrap();
        fs::write(&manifest, r#"{"a": {"profile": null, "cover": null, "gallery": null}}"#).unwrap();

        let data = block_on(load_site(creators, manifest)).unwrap();
        assert!(data.creators[0].tags.is_empty());
        assert!(data.creators[0].links.is_empty());
        assert!(data.manifest["a"].gallery.is_empty());
    }

    #[test]
    fn test_missing_manifest_fails_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        let creators = dir.path().join("creators.json");
        fs::write(&creators, "[]").unwrap();

        let err = block_on(load_site(creators, dir.path().join("missing.json"))).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[test]
    fn test_malformed_creators_fails() {
        let dir = tempfile::tempdir().unwrap();
        let creators = dir.path().join("creators.json");
        let manifest = dir.path().join("assets-manifest.json");
        fs::write(&creators, "{not json").unwrap();
        fs::write(&manifest, "{}").unwrap();

        let err = block_on(load_site(creators.clone(), manifest)).unwrap_err();
        match err {
            LoadError::Parse { path, .. } => assert_eq!(path, creators),
            other => panic!("unexpected error: {other}"),
        }
    }
}
