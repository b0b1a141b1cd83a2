//! Build flow - Run the pipeline over a site tree
//!
//! Walks ROOT (or a scope under it) with the ignore crate, processes every
//! file with a handled extension, and writes results back in place or under
//! an output directory.

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::anchors::duplicate_slugs;
use crate::core::config::AnchorConfig;
use crate::core::model::{ItemError, Kind, Meta, ResultItem, ResultSet, Status};
use crate::core::paths::{join_normalized, make_relative, normalize_path};
use crate::core::render::{write_raw_warning, OutputFormat, RenderConfig, Renderer};
use crate::core::util::{hash_bytes, truncate_string};
use crate::flows::pipeline::{Pipeline, Processed};
use crate::hooks::HookError;

/// Maximum bytes kept in a result excerpt
const MAX_EXCERPT_BYTES: usize = 4096;

/// Where processed files go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteMode {
    /// Report only
    DryRun,
    /// Overwrite sources that changed
    InPlace,
    /// Write every processed file under a directory, keeping relative paths
    OutDir(PathBuf),
}

/// Options for a build
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub scope: Option<PathBuf>,
    pub write_mode: WriteMode,
}

impl WriteMode {
    /// Output directory, when writing outside the sources
    pub fn out_dir(&self) -> Option<&Path> {
        match self {
            WriteMode::OutDir(dir) => Some(dir),
            _ => None,
        }
    }
}

/// Collect files to process, sorted by path
///
/// Anything under `exclude` (the output directory) is skipped so a build
/// never reads its own output.
pub fn collect_sources(
    root: &Path,
    scope: Option<&Path>,
    config: &AnchorConfig,
    exclude: Option<&Path>,
) -> Vec<PathBuf> {
    let start = scope.map(|s| root.join(s)).unwrap_or_else(|| root.to_path_buf());

    // Compare against both spellings; the walk may see either
    let excluded: Vec<PathBuf> = exclude
        .map(|dir| {
            let mut dirs = vec![dir.to_path_buf()];
            if let Ok(canonical) = dir.canonicalize() {
                if canonical != dir {
                    dirs.push(canonical);
                }
            }
            dirs
        })
        .unwrap_or_default();

    let mut files: Vec<PathBuf> = WalkBuilder::new(&start)
        .hidden(true)
        .git_ignore(true)
        .filter_entry(move |entry| !excluded.iter().any(|dir| entry.path().starts_with(dir)))
        .build()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && config.handles(path))
        .collect();

    files.sort();
    files
}

/// Lines of `output` that carry injected anchors
fn anchored_lines(processed: &Processed) -> String {
    let lines: Vec<&str> = processed.output.lines().collect();
    processed
        .anchors
        .iter()
        .filter_map(|anchor| {
            lines
                .get(processed.line_offset + anchor.line as usize - 1)
                .copied()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turn a processed file into a result item
fn to_result_item(relative: &str, processed: &Processed) -> ResultItem {
    let item = match processed.kind {
        Kind::Document => ResultItem::document(relative, processed.status),
        _ => ResultItem::fragment(relative, processed.status),
    };

    let mut meta = Meta {
        size: Some(processed.output.len() as u64),
        hash: Some(hash_bytes(processed.output.as_bytes())),
        truncated: false,
    };

    let mut item = item
        .with_anchors(processed.anchors.clone())
        .with_skip_reason(processed.skip_reason);

    if !processed.anchors.is_empty() {
        let (excerpt, truncated) = truncate_string(&anchored_lines(processed), MAX_EXCERPT_BYTES);
        item.excerpt = Some(excerpt);
        meta.truncated = truncated;
    }

    for slug in duplicate_slugs(&processed.anchors) {
        log::warn!("{}: duplicate anchor id '{}'", relative, slug);
        item = item.with_warning(format!("duplicate anchor id '{}'", slug));
    }

    item.with_meta(meta)
}

fn error_item(relative: &str, error: &anyhow::Error) -> ResultItem {
    let code = match error.downcast_ref::<HookError>() {
        Some(HookError::Document(_)) => "FRONT_MATTER",
        Some(HookError::Template(_)) => "TEMPLATE",
        None => "IO",
    };
    ResultItem::error(
        Some(relative.to_string()),
        ItemError::new(code, format!("{:#}", error)),
    )
}

/// Process one file and write it according to `write_mode`
fn process_file(
    path: &Path,
    relative: &str,
    pipeline: &Pipeline,
    write_mode: &WriteMode,
) -> Result<ResultItem> {
    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", relative))?;
    let processed = pipeline.process(&source, Some(relative))?;

    match write_mode {
        WriteMode::DryRun => {}
        WriteMode::InPlace => {
            if processed.status == Status::Rewritten {
                fs::write(path, &processed.output)
                    .with_context(|| format!("Failed to write file: {}", relative))?;
            }
        }
        WriteMode::OutDir(out_dir) => {
            let target = join_normalized(out_dir, relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }
            fs::write(&target, &processed.output)
                .with_context(|| format!("Failed to write file: {}", target.display()))?;
        }
    }

    Ok(to_result_item(relative, &processed))
}

/// Process one file; failures become error items so the build continues
fn build_file(root: &Path, path: &Path, pipeline: &Pipeline, write_mode: &WriteMode) -> ResultItem {
    let relative = make_relative(path, root).unwrap_or_else(|| normalize_path(path));

    match process_file(path, &relative, pipeline, write_mode) {
        Ok(item) => item,
        Err(error) => {
            log::warn!("{}: {:#}", relative, error);
            error_item(&relative, &error)
        }
    }
}

/// Run the pipeline over every source under `root`
pub fn build_tree(root: &Path, config: &AnchorConfig, options: &BuildOptions) -> Result<ResultSet> {
    let start = options
        .scope
        .as_ref()
        .map(|s| root.join(s))
        .unwrap_or_else(|| root.to_path_buf());
    if !start.is_dir() {
        anyhow::bail!("Not a directory: {}", start.display());
    }

    let files = collect_sources(
        root,
        options.scope.as_deref(),
        config,
        options.write_mode.out_dir(),
    );
    log::debug!("Processing {} file(s) under {}", files.len(), start.display());

    let pipeline = Pipeline::new(config);

    #[cfg(feature = "parallel")]
    let items: Vec<ResultItem> = {
        use rayon::prelude::*;
        files
            .par_iter()
            .map(|path| build_file(root, path, &pipeline, &options.write_mode))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let items: Vec<ResultItem> = files
        .iter()
        .map(|path| build_file(root, path, &pipeline, &options.write_mode))
        .collect();

    let mut result_set: ResultSet = items.into_iter().collect();
    result_set.sort();
    Ok(result_set)
}

/// Run the build command
pub fn run_build(
    root: &Path,
    config: &AnchorConfig,
    options: &BuildOptions,
    render_config: RenderConfig,
) -> Result<()> {
    let result_set = build_tree(root, config, options)?;

    log::info!(
        "{} rewritten, {} unchanged, {} skipped, {} failed",
        result_set.count(Status::Rewritten),
        result_set.count(Status::Unchanged),
        result_set.count(Status::Skipped),
        result_set.count(Status::Failed)
    );

    if render_config.format == OutputFormat::Raw {
        write_raw_warning();
    }
    let renderer = Renderer::with_config(render_config);
    let mut stdout = std::io::stdout().lock();
    renderer
        .render_to(&result_set, &mut stdout)
        .and_then(|_| writeln!(stdout))
        .context("Failed to write build report")?;

    Ok(())
}
