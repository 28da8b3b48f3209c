use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors raised while resolving an item's status and sidecar metadata.
///
/// Once produced, a resolution error is cached for the lifetime of the item.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("stat {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read link {path}: {source}")]
    ReadLink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read sidecar {path}: {source}")]
    SidecarRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("decode sidecar {path}: {source}")]
    SidecarDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors surfaced by item accessors.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The cached resolution failure. Every strict accessor hands out the same `Arc`.
    #[error(transparent)]
    Resolve(Arc<ResolveError>),

    /// Opening the byte stream failed. Not cached.
    #[error("open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SourceError {
    /// The cached resolution error, if this is one.
    pub fn as_resolve(&self) -> Option<&Arc<ResolveError>> {
        match self {
            SourceError::Resolve(err) => Some(err),
            SourceError::Open { .. } => None,
        }
    }

    /// Whether the underlying I/O failure was `NotFound`.
    pub fn is_not_found(&self) -> bool {
        let io_err = match self {
            SourceError::Resolve(err) => match err.as_ref() {
                ResolveError::Stat { source, .. }
                | ResolveError::ReadLink { source, .. }
                | ResolveError::SidecarRead { source, .. } => Some(source),
                ResolveError::SidecarDecode { .. } => None,
            },
            SourceError::Open { source, .. } => Some(source),
        };
        io_err.is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
