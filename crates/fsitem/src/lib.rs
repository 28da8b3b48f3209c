//! # fsitem
//!
//! A single file or directory from a local filesystem tree, exposed as a
//! content source: identity, display name, `file://` locator, size, byte
//! stream, modification time and a metadata mapping.
//!
//! ## Resolution
//!
//! Filesystem status and the optional sidecar metadata file are read lazily,
//! exactly once per [`Item`], the first time any accessor needs them. The
//! outcome (merged metadata or error) is cached for the lifetime of the item
//! and shared by every caller, including callers racing on first access.
//!
//! ## Error tiers
//!
//! - Strict: [`Item::size`], [`Item::metadata`] return the cached error.
//! - Best effort: [`Item::etag`], [`Item::last_mod`] return an empty string or
//!   the zero time instead.
//!
//! ```ignore
//! use fsitem::{Item, Source};
//!
//! let item = Item::under_root("/data", "/data/sub/file.txt").with_sidecar();
//! assert_eq!(item.name(), "sub/file.txt");
//! let md = item.metadata()?;
//! ```

mod error;
mod item;
pub mod metadata;
pub mod path;
mod source;

pub use error::{ResolveError, Result, SourceError};
pub use item::Item;
pub use metadata::{Metadata, META_FILE_EXT};
pub use source::Source;
