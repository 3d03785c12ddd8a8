use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod app;
mod assets;
mod error;
mod state;
mod ui;

use state::config::SiteConfig;
use state::session::{GallerySession, SortKey};

#[derive(Parser, Debug)]
#[command(name = "volumography", version, about = "Volumography creator gallery")]
struct Cli {
    /// Site directory holding data/, assets/ and volumography.json
    #[arg(long, global = true, default_value = "website")]
    site: PathBuf,
    /// Config file (defaults to <site>/volumography.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the native gallery viewer (default)
    View,
    /// Write the gallery as a static HTML page
    Export {
        /// Output file (defaults to <site>/dist/index.html)
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value = "priority")]
        sort: SortKey,
        /// Tag to filter by; repeat for OR-matching several tags
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Seed for cover picks and random order
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Rebuild the asset manifest from the creator folders
    Manifest,
    /// Shrink and re-encode creator images for the web
    Optimize,
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = SiteConfig::load(&cli.site, cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::View) {
        Commands::View => app::run(cli.site, config).map_err(|e| anyhow::anyhow!("viewer failed: {e}")),
        Commands::Export {
            out,
            sort,
            tags,
            seed,
        } => {
            let out = out.unwrap_or_else(|| cli.site.join("dist").join("index.html"));
            runtime()?.block_on(export(&cli.site, &config, &out, sort, tags, seed))
        }
        Commands::Manifest => build_manifest(&cli.site, &config),
        Commands::Optimize => runtime()?.block_on(optimize(&cli.site, &config)),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

/// Render one gallery pass to a standalone page
async fn export(
    site: &Path,
    config: &SiteConfig,
    out: &Path,
    sort: SortKey,
    tags: Vec<String>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let data = state::loader::load_site(site.join(&config.creators_file), site.join(&config.manifest_file)).await?;

    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = GallerySession::new(data, config.session_options(), rng);

    // Toggling twice would deselect, so each tag is applied once
    let tags: BTreeSet<String> = tags.into_iter().collect();
    for tag in &tags {
        if session.tag_index().rank_of(tag).is_none() {
            tracing::warn!(tag = %tag, "Tag not used by any creator");
        }
        session.toggle_tag(tag);
    }
    session.set_sort(sort);

    // The page filters on its own, so it gets every card
    let view = session.render_all();
    if view.count == 0 {
        tracing::warn!("No creators match the selected tags");
    }

    let generated_at = Utc::now().to_rfc3339();
    let page = ui::html::render_page(
        &view,
        &ui::html::PageOptions {
            sort,
            generated_at: &generated_at,
            carousel_period_ms: config.carousel_period().as_millis() as u64,
            stagger_ms: config.card_stagger_ms,
        },
    );
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, page).with_context(|| format!("failed to write {}", out.display()))?;

    println!(
        "✅ Exported {} of {} creators ({} selected tags) to {}",
        view.count,
        session.creators().len(),
        session.selected_tags().len(),
        out.display()
    );
    Ok(())
}

fn build_manifest(site: &Path, config: &SiteConfig) -> anyhow::Result<()> {
    let creators_dir = site.join(&config.assets_root);
    println!("🔍 Scanning creators in {}", creators_dir.display());

    let manifest = assets::manifest::generate_manifest(&creators_dir, &config.manifest_extensions)?;
    let out = site.join(&config.manifest_file);
    assets::manifest::write_manifest(&out, &manifest)?;

    println!("✅ Manifest written for {} creators: {}", manifest.len(), out.display());
    Ok(())
}

async fn optimize(site: &Path, config: &SiteConfig) -> anyhow::Result<()> {
    let input = site.join(&config.assets_root);
    let output = site.join(&config.optimize.output_dir);
    println!("🔍 Optimizing images from {}", input.display());

    let report = assets::optimize::optimize_images(input, output.clone(), config.optimize.clone()).await?;

    println!(
        "📊 Optimized {} of {} images ({} failed), saved {:.2} MB",
        report.succeeded,
        report.total,
        report.failed,
        report.bytes_saved as f64 / (1024.0 * 1024.0)
    );
    println!("✅ Output in {}", output.display());
    Ok(())
}
