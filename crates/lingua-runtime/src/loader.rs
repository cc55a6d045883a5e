//! Catalog file loading: discovery, foreground loads, and cancellable
//! background loads that publish to a [`Registry`].
//!
//! Catalog files are laid out as `<locale_dir>/<domain>_<locale>.ts`
//! (e.g. `i18n/settings_sv_SE.ts`); [`discover`] enumerates them to drive
//! a language menu. Loading is the only suspending operation in the
//! engine, so it is the only part that runs on a worker thread: parse in
//! the background, publish the finished store with one registry swap, and
//! never publish anything partial — a cancelled or failed load leaves the
//! registry exactly as it was.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use lingua_catalog::{Catalog, CatalogStore, ParseError, parse};

use crate::registry::Registry;

/// Errors from a single catalog load attempt.
#[derive(Debug)]
pub enum LoadError {
    /// Reading the file failed.
    Io(io::Error),
    /// The file was read but is not a valid catalog document.
    Parse(ParseError),
    /// The load was cancelled before it could publish.
    Cancelled,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "catalog read failed: {err}"),
            Self::Parse(err) => write!(f, "catalog parse failed: {err}"),
            Self::Cancelled => write!(f, "catalog load cancelled"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Cancelled => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ParseError> for LoadError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

/// Where catalog files live and what they are named.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Directory containing the catalog files.
    pub locale_dir: PathBuf,
    /// Filename prefix shared by all catalogs (`<domain>_<locale>.ts`).
    pub domain: String,
}

impl LoaderConfig {
    #[must_use]
    pub fn new(locale_dir: impl Into<PathBuf>, domain: impl Into<String>) -> Self {
        Self {
            locale_dir: locale_dir.into(),
            domain: domain.into(),
        }
    }

    /// The path a catalog for `locale` would have under this config.
    #[must_use]
    pub fn path_for(&self, locale: &str) -> PathBuf {
        self.locale_dir
            .join(format!("{}_{}.ts", self.domain, locale))
    }
}

/// A catalog file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFile {
    /// Locale part of the filename, verbatim (e.g. `sv_SE`).
    pub locale: String,
    pub path: PathBuf,
}

/// Enumerate the catalog files matching `config`, sorted by locale.
///
/// Files that do not match the `<domain>_<locale>.ts` pattern are ignored,
/// so the locale directory may hold other assets.
pub fn discover(config: &LoaderConfig) -> io::Result<Vec<CatalogFile>> {
    let prefix = format!("{}_", config.domain);
    let mut found = Vec::new();
    for entry in fs::read_dir(&config.locale_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("ts") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(locale) = stem.strip_prefix(&prefix) else {
            continue;
        };
        if locale.is_empty() {
            continue;
        }
        found.push(CatalogFile {
            locale: locale.to_string(),
            path,
        });
    }
    found.sort_by(|a, b| a.locale.cmp(&b.locale));
    Ok(found)
}

/// Read and parse one catalog file.
pub fn load_file(path: &Path) -> Result<Catalog, LoadError> {
    let bytes = fs::read(path)?;
    Ok(parse(&bytes)?)
}

/// Load one catalog file and publish it to the registry.
///
/// On failure the registry is untouched: a previously registered catalog
/// for the same locale stays in service.
pub fn load_into(path: &Path, registry: &Registry) -> Result<(), LoadError> {
    let catalog = load_file(path)?;
    registry.register(CatalogStore::new(catalog));
    Ok(())
}

/// Handle to a background load started with [`spawn_load`].
#[derive(Debug)]
pub struct LoadHandle {
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<Result<(), LoadError>>,
}

impl LoadHandle {
    /// Request cancellation. The worker checks the flag between reading,
    /// parsing, and publishing; once cancelled it discards its work.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    /// Whether the worker has finished (successfully or not).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker and return the load outcome.
    pub fn join(self) -> Result<(), LoadError> {
        self.handle
            .join()
            .unwrap_or_else(|_| Err(LoadError::Io(io::Error::other("catalog load thread panicked"))))
    }
}

/// Load a catalog on a background thread and publish it on success.
///
/// Returns immediately; the UI thread keeps resolving against whatever is
/// currently registered until the swap lands. Cancellation via
/// [`LoadHandle::cancel`] guarantees nothing partial is ever published.
#[must_use]
pub fn spawn_load(path: PathBuf, registry: Arc<Registry>) -> LoadHandle {
    let cancel = Arc::new(AtomicBool::new(false));
    let token = Arc::clone(&cancel);
    let handle = thread::Builder::new()
        .name("lingua-load".into())
        .spawn(move || load_worker(&path, &registry, &token))
        .expect("failed to spawn catalog loader thread");
    LoadHandle { cancel, handle }
}

fn load_worker(
    path: &Path,
    registry: &Registry,
    cancel: &AtomicBool,
) -> Result<(), LoadError> {
    if cancel.load(Ordering::Acquire) {
        return Err(LoadError::Cancelled);
    }
    let bytes = fs::read(path).map_err(|err| {
        tracing::warn!(path = %path.display(), error = %err, "catalog read failed");
        LoadError::Io(err)
    })?;
    if cancel.load(Ordering::Acquire) {
        return Err(LoadError::Cancelled);
    }
    let catalog = parse(&bytes).map_err(|err| {
        tracing::warn!(path = %path.display(), error = %err, "catalog parse failed");
        LoadError::Parse(err)
    })?;
    if cancel.load(Ordering::Acquire) {
        return Err(LoadError::Cancelled);
    }
    registry.register(CatalogStore::new(catalog));
    Ok(())
}
