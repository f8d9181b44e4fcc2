//! Bulk loading of geometry sequences
//!
//! Two strategies are available:
//!
//! - [`LoadStrategy::Safe`] reads the files one after another on the calling
//!   thread and keeps everything the readers produce, including decoded
//!   material textures.
//! - [`LoadStrategy::Fast`] spreads the files over a worker pool sized to the
//!   processor count. Each worker parses one file and hands back a
//!   [`GeometryTransfer`]; the native geometries are rebuilt on the calling
//!   thread. Textures and adjacency lists do not survive the transfer.
//!
//! Both strategies return geometries in input order and stop at the first
//! file that fails to parse.

use crate::progress::progress_bar;
use crate::{read_geometry, ReadOptions};
use meshseq_core::{Error, Geometry, GeometryKind, GeometryTransfer, Result};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::path::Path;

const LOADING_MESSAGE: &str = "mesh loading";

/// How a sequence is read from disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStrategy {
    /// Sequential, full fidelity
    Safe,
    /// Parallel, numeric attributes only
    #[default]
    Fast,
}

/// Loader configuration
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub strategy: LoadStrategy,
    pub kind: GeometryKind,
    /// Show a progress bar on stderr
    pub show_progress: bool,
    /// Worker count for the fast strategy (None = number of CPUs)
    pub num_threads: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            strategy: LoadStrategy::Fast,
            kind: GeometryKind::Auto,
            show_progress: true,
            num_threads: None,
        }
    }
}

impl LoadOptions {
    pub fn with_strategy(mut self, strategy: LoadStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_kind(mut self, kind: GeometryKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }
}

/// Load `files` with the strategy selected in `options`
pub fn load_geometries<P: AsRef<Path> + Sync>(files: &[P], options: &LoadOptions) -> Result<Vec<Geometry>> {
    log::debug!("loading {} files ({:?}, {:?})", files.len(), options.strategy, options.kind);
    match options.strategy {
        LoadStrategy::Safe => load_geometries_safe(files, options),
        LoadStrategy::Fast => load_geometries_fast(files, options),
    }
}

/// Read every file sequentially, keeping textures
pub fn load_geometries_safe<P: AsRef<Path>>(files: &[P], options: &LoadOptions) -> Result<Vec<Geometry>> {
    let progress = progress_bar(files.len(), LOADING_MESSAGE, options.show_progress);
    let read_options = ReadOptions { load_textures: true };

    let mut geometries = Vec::with_capacity(files.len());
    for file in files {
        geometries.push(read_geometry(file, options.kind, &read_options)?);
        progress.inc(1);
    }

    progress.finish();
    Ok(geometries)
}

/// Read files on a worker pool, collecting results in input order
pub fn load_geometries_fast<P: AsRef<Path> + Sync>(files: &[P], options: &LoadOptions) -> Result<Vec<Geometry>> {
    let pool = build_pool(options.num_threads)?;
    let progress = progress_bar(files.len(), LOADING_MESSAGE, options.show_progress);
    let read_options = ReadOptions { load_textures: false };
    let kind = options.kind;

    let transfers = collect_ordered(&pool, files, |file| {
        let geometry = read_geometry(file, kind, &read_options)?;
        progress.inc(1);
        Ok(GeometryTransfer::from(&geometry))
    })?;

    progress.finish();
    Ok(transfers.into_iter().map(GeometryTransfer::into_geometry).collect())
}

/// Ordered parallel map: the output follows `items`, not completion order
fn collect_ordered<T, R, F>(pool: &ThreadPool, items: &[T], f: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> Result<R> + Sync,
{
    pool.install(|| items.par_iter().map(|item| f(item)).collect())
}

fn build_pool(num_threads: Option<usize>) -> Result<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(num_threads.unwrap_or_else(num_cpus::get))
        .thread_name(|index| format!("meshseq-loader-{}", index))
        .build()
        .map_err(|e| Error::Io(std::io::Error::other(format!("failed to create loader pool: {}", e))))
}
