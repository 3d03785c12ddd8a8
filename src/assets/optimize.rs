/// Web image optimization
///
/// Re-encodes every image under the asset root into a size-capped copy in
/// the build output, mirroring the directory layout. A file that fails is
/// logged and skipped; the batch always runs to the end.
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::{imageops::FilterType, DynamicImage, GenericImageView};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;
use walkdir::WalkDir;

use super::manifest::has_image_extension;
use crate::error::OptimizeError;
use crate::state::config::{OptimizeConfig, OutputFormat};

/// Summary of one optimizer run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptimizeReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Input bytes minus output bytes over all successful files (may be negative)
    pub bytes_saved: i64,
}

/// Result for a single file
#[derive(Debug, Clone, PartialEq, Eq)]
struct Optimized {
    input_size: u64,
    output_size: u64,
}

/// Target size that fits inside `max_width × max_height`, keeping the
/// aspect ratio and never enlarging
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let (mut w, mut h) = (width as f64, height as f64);
    if w > max_width as f64 {
        h = (h * max_width as f64 / w).round();
        w = max_width as f64;
    }
    if h > max_height as f64 {
        w = (w * max_height as f64 / h).round();
        h = max_height as f64;
    }
    ((w as u32).max(1), (h as u32).max(1))
}

/// Collect every image under `dir`, in a stable order
pub fn find_images(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, OptimizeError> {
    let mut images = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| OptimizeError::Io {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
            source: e.into(),
        })?;
        if entry.file_type().is_file() && has_image_extension(entry.path(), extensions) {
            images.push(entry.into_path());
        }
    }
    Ok(images)
}

/// Where the optimized copy of `input` goes
pub fn output_path(input: &Path, input_dir: &Path, output_dir: &Path, format: OutputFormat) -> PathBuf {
    let relative = input.strip_prefix(input_dir).unwrap_or(input);
    output_dir.join(relative).with_extension(format.extension())
}

/// Optimize every image under `input_dir` into `output_dir`.
///
/// The output directory is cleared first. Images run on the blocking pool,
/// at most `config.parallelism` at a time.
pub async fn optimize_images(
    input_dir: PathBuf,
    output_dir: PathBuf,
    config: OptimizeConfig,
) -> Result<OptimizeReport, OptimizeError> {
    if !input_dir.is_dir() {
        return Err(OptimizeError::MissingInput(input_dir));
    }

    let images = find_images(&input_dir, &config.extensions)?;
    tracing::info!(count = images.len(), dir = %input_dir.display(), "Found images to optimize");

    let mut report = OptimizeReport {
        total: images.len(),
        ..Default::default()
    };
    if images.is_empty() {
        return Ok(report);
    }

    if output_dir.exists() {
        fs::remove_dir_all(&output_dir).map_err(|source| OptimizeError::Io {
            path: output_dir.clone(),
            source,
        })?;
    }
    fs::create_dir_all(&output_dir).map_err(|source| OptimizeError::Io {
        path: output_dir.clone(),
        source,
    })?;

    let parallelism = config.parallelism.max(1);
    let mut pending = images.into_iter();
    let mut tasks = JoinSet::new();

    loop {
        while tasks.len() < parallelism {
            let Some(input) = pending.next() else {
                break;
            };
            let output = output_path(&input, &input_dir, &output_dir, config.format);
            let config = config.clone();
            tasks.spawn_blocking(move || {
                let result = optimize_one(&input, &output, &config);
                (input, result)
            });
        }

        let Some(joined) = tasks.join_next().await else {
            break;
        };
        let (input, result) = joined?;
        let relative = input.strip_prefix(&input_dir).unwrap_or(&input).display().to_string();

        match result {
            Ok(done) => {
                report.succeeded += 1;
                report.bytes_saved += done.input_size as i64 - done.output_size as i64;
                let savings = if done.input_size > 0 {
                    (1.0 - done.output_size as f64 / done.input_size as f64) * 100.0
                } else {
                    0.0
                };
                tracing::info!(file = %relative, savings = format!("{savings:.1}%"), "Optimized image");
            }
            Err(err) => {
                report.failed += 1;
                tracing::warn!(file = %relative, error = %err, "Skipping image");
            }
        }
    }

    Ok(report)
}

/// Decode, shrink, and re-encode one image
fn optimize_one(input: &Path, output: &Path, config: &OptimizeConfig) -> Result<Optimized, OptimizeError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| OptimizeError::Io { path, source }
    };

    let img = image::open(input).map_err(|source| OptimizeError::Image {
        path: input.to_path_buf(),
        source,
    })?;

    let (width, height) = img.dimensions();
    let (target_w, target_h) = fit_within(width, height, config.max_width, config.max_height);
    let img = if (target_w, target_h) == (width, height) {
        img
    } else {
        img.resize_exact(target_w, target_h, FilterType::Lanczos3)
    };

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }

    // A failed file leaves nothing behind in the output tree
    let written = write_output(&img, input, output, config);
    if written.is_err() && output.exists() {
        if let Err(err) = fs::remove_file(output) {
            tracing::warn!(path = %output.display(), error = %err, "Failed to remove partial output");
        }
    }
    let output_size = written?;

    let input_size = fs::metadata(input).map_err(io_err(input))?.len();
    Ok(Optimized {
        input_size,
        output_size,
    })
}

/// Encode `img` into `output`, returning the written size
fn write_output(img: &DynamicImage, input: &Path, output: &Path, config: &OptimizeConfig) -> Result<u64, OptimizeError> {
    let io_err = |source| OptimizeError::Io {
        path: output.to_path_buf(),
        source,
    };
    let image_err = |source| OptimizeError::Image {
        path: input.to_path_buf(),
        source,
    };

    let file = File::create(output).map_err(io_err)?;
    let mut writer = BufWriter::new(file);

    match config.format {
        OutputFormat::Webp => {
            // The WebP encoder takes 8-bit RGB(A) only
            let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
            rgba.write_with_encoder(WebPEncoder::new_lossless(&mut writer))
                .map_err(image_err)?;
        }
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, config.quality.clamp(1, 100)))
                .map_err(image_err)?;
        }
    }
    writer.flush().map_err(io_err)?;

    Ok(fs::metadata(output).map_err(io_err)?.len())
}
