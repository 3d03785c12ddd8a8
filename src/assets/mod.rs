/// Asset build tools
///
/// Offline steps run before publishing a site:
/// - Scanning creator folders into the asset manifest (manifest.rs)
/// - Shrinking and re-encoding images for the web (optimize.rs)

pub mod manifest;
pub mod optimize;
