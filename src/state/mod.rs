/// State management module
///
/// This module handles all gallery state, including:
/// - Creator and manifest data structures (data.rs)
/// - Loading both data files together (loader.rs)
/// - Site configuration (config.rs)
/// - Asset path resolution and cover picks (assets.rs)
/// - The tag frequency index (tags.rs)
/// - The filter/sort session that drives rendering (session.rs)

pub mod assets;
pub mod config;
pub mod data;
pub mod loader;
pub mod session;
pub mod tags;
