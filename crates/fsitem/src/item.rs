use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::{Lazy, OnceCell};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::{ResolveError, Result, SourceError};
use crate::metadata::{self, Metadata, USER_DATA};
use crate::path::{absolute_clean, prefix_len, to_slash};

static ROOT_URL: Lazy<Url> = Lazy::new(|| Url::parse("file:///").expect("static file URL"));

/// Outcome of the one-shot resolution step.
#[derive(Debug)]
enum Resolution {
    Ready { info: fs::Metadata, metadata: Metadata },
    Failed(Arc<ResolveError>),
}

/// A single file system entry exposed as a content source.
///
/// Construction performs no I/O. Status and sidecar metadata are resolved on
/// first use, exactly once, and cached for the item's lifetime. Share an item
/// across threads behind an `Arc`.
#[derive(Debug)]
pub struct Item {
    path: PathBuf,
    meta_path: Option<PathBuf>,
    name_prefix_len: usize,
    resolved: OnceCell<Resolution>,
    #[cfg(test)]
    resolve_count: std::sync::atomic::AtomicUsize,
}

impl Item {
    /// Create an item for `path`.
    ///
    /// `name_prefix_len` leading bytes of the path are stripped to form the
    /// display name. An empty `meta_path` is the same as none.
    pub fn new<P: Into<PathBuf>>(path: P, meta_path: Option<PathBuf>, name_prefix_len: usize) -> Self {
        Self {
            path: path.into(),
            meta_path: meta_path.filter(|p| !p.as_os_str().is_empty()),
            name_prefix_len,
            resolved: OnceCell::new(),
            #[cfg(test)]
            resolve_count: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Create an item discovered under `root`, named relative to it.
    pub fn under_root(root: impl AsRef<Path>, path: impl Into<PathBuf>) -> Self {
        Self::new(path, None, prefix_len(root))
    }

    /// Use `meta_path` as the sidecar metadata file.
    pub fn with_meta_path(mut self, meta_path: impl Into<PathBuf>) -> Self {
        let meta_path = meta_path.into();
        self.meta_path = Some(meta_path).filter(|p| !p.as_os_str().is_empty());
        self
    }

    /// Use the conventional sidecar file, `<path>._meta`.
    pub fn with_sidecar(self) -> Self {
        let meta_path = metadata::sidecar_path(&self.path);
        self.with_meta_path(meta_path)
    }

    /// The item's path, verbatim, including non-UTF-8 bytes. This is its identity.
    pub fn id(&self) -> &Path {
        &self.path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn meta_path(&self) -> Option<&Path> {
        self.meta_path.as_deref()
    }

    /// Display name: the path without its prefix, with `/` separators.
    ///
    /// A prefix past the end of the path (or splitting a UTF-8 sequence)
    /// gives an empty name.
    pub fn name(&self) -> String {
        let full = self.path.to_string_lossy();
        let rest = full.get(self.name_prefix_len..).unwrap_or_default();
        to_slash(rest)
    }

    /// `file://` locator for the lexically cleaned absolute path.
    pub fn url(&self) -> Url {
        Url::from_file_path(absolute_clean(&self.path)).unwrap_or_else(|()| ROOT_URL.clone())
    }

    /// Size in bytes. Strict: returns the resolution error.
    pub fn size(&self) -> Result<u64> {
        self.file_info().map(|info| info.len())
    }

    /// Link-aware status snapshot. Strict.
    pub fn file_info(&self) -> Result<&fs::Metadata> {
        match self.resolve() {
            Resolution::Ready { info, .. } => Ok(info),
            Resolution::Failed(err) => Err(SourceError::Resolve(Arc::clone(err))),
        }
    }

    /// Merged base and sidecar metadata. Strict: returns the resolution error.
    pub fn metadata(&self) -> Result<&Metadata> {
        match self.resolve() {
            Resolution::Ready { metadata, .. } => Ok(metadata),
            Resolution::Failed(err) => Err(SourceError::Resolve(Arc::clone(err))),
        }
    }

    /// Modification time as RFC 3339 text. Best effort: empty on failure.
    pub fn etag(&self) -> String {
        match self.modified() {
            Some(mtime) => DateTime::<Utc>::from(mtime).to_rfc3339_opts(SecondsFormat::Nanos, true),
            None => String::new(),
        }
    }

    /// Modification time. Best effort: `UNIX_EPOCH` on failure.
    ///
    /// A file whose real mtime is the epoch yields the same value, so the
    /// epoch alone does not signal failure; use [`Item::size`] or
    /// [`Item::metadata`] for that.
    pub fn last_mod(&self) -> SystemTime {
        self.modified().unwrap_or(UNIX_EPOCH)
    }

    /// Open the file for reading. Every call opens a fresh handle.
    pub fn open(&self) -> Result<File> {
        File::open(&self.path).map_err(|source| {
            debug!(path = %self.path.display(), error = %source, "open failed");
            SourceError::Open {
                path: self.path.clone(),
                source,
            }
        })
    }

    fn modified(&self) -> Option<SystemTime> {
        match self.resolve() {
            Resolution::Ready { info, .. } => info.modified().ok(),
            Resolution::Failed(_) => None,
        }
    }

    fn resolve(&self) -> &Resolution {
        self.resolved.get_or_init(|| match self.run_resolution() {
            Ok((info, metadata)) => Resolution::Ready { info, metadata },
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "item resolution failed");
                Resolution::Failed(Arc::new(err))
            }
        })
    }

    #[instrument(skip(self), fields(path = %self.path.display()), level = "debug")]
    fn run_resolution(&self) -> std::result::Result<(fs::Metadata, Metadata), ResolveError> {
        #[cfg(test)]
        self.resolve_count
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        let info = fs::symlink_metadata(&self.path).map_err(|source| ResolveError::Stat {
            path: self.path.clone(),
            source,
        })?;

        let mut md = metadata::base_metadata(&self.path, &info)?;

        if let Some(meta_path) = &self.meta_path {
            if let Some(user) = metadata::read_sidecar(meta_path)? {
                md.insert(USER_DATA.into(), serde_json::Value::Object(user));
            }
        }

        debug!(keys = md.len(), "item resolved");
        Ok((info, md))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use std::sync::Barrier;
    use tempfile::tempdir;

    #[test]
    fn test_name_strips_prefix() {
        let item = Item::new("/data/sub/file.txt", None, 6);
        assert_eq!(item.name(), "sub/file.txt");
        assert_eq!(item.id(), Path::new("/data/sub/file.txt"));

        let item = Item::under_root("/data", "/data/sub/file.txt");
        assert_eq!(item.name(), "sub/file.txt");
    }

    #[test]
    fn test_name_out_of_range_prefix() {
        assert_eq!(Item::new("/a", None, 99).name(), "");
        assert_eq!(Item::new("/a", None, 0).name(), "/a");
    }

    #[test]
    fn test_empty_meta_path_is_none() {
        assert!(Item::new("/a", Some(PathBuf::new()), 0).meta_path().is_none());
        assert!(Item::new("/a", None, 0).with_meta_path("").meta_path().is_none());
    }

    #[test]
    #[cfg(unix)]
    fn test_url_is_clean_file_url() {
        let item = Item::new("/data/./sub/../file.txt", None, 0);
        assert_eq!(item.url().as_str(), "file:///data/file.txt");
    }

    #[test]
    fn test_resolution_runs_once_under_contention() {
        const THREADS: usize = 16;

        let dir = tempdir().unwrap();
        let p = dir.path().join("f");
        std::fs::write(&p, b"contended").unwrap();
        let item = Item::new(&p, None, 0);
        let barrier = Barrier::new(THREADS);

        std::thread::scope(|s| {
            for i in 0..THREADS {
                let item = &item;
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    match i % 4 {
                        0 => assert_eq!(item.size().unwrap(), 9),
                        1 => assert!(item.metadata().is_ok()),
                        2 => assert!(!item.etag().is_empty()),
                        _ => assert!(item.last_mod() > UNIX_EPOCH),
                    }
                });
            }
        });

        assert_eq!(item.resolve_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_is_cached_and_shared() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("missing");
        let item = Item::new(&p, None, 0);

        let e1 = item.metadata().unwrap_err();
        let e2 = item.size().unwrap_err();
        assert!(Arc::ptr_eq(e1.as_resolve().unwrap(), e2.as_resolve().unwrap()));

        // Creating the file later does not revive a failed item.
        std::fs::write(&p, b"late").unwrap();
        assert!(item.size().is_err());
        assert_eq!(item.etag(), "");
        assert_eq!(item.resolve_count.load(Ordering::SeqCst), 1);
    }
}
