//! Generic content-source interface consumed by transfer and sync code.

use std::io::Read;
use std::path::Path;
use std::time::SystemTime;

use url::Url;

use crate::error::Result;
use crate::item::Item;
use crate::metadata::Metadata;

/// Something with an identity, a name, a byte stream and metadata.
///
/// `size` and `metadata` are strict and return errors. `etag` and `last_mod`
/// are best effort: on failure they yield an empty string and the zero time,
/// so callers that care about correctness must also consult a strict accessor.
pub trait Source: Send + Sync {
    /// Raw path identity. Never lossily converted.
    fn id(&self) -> &Path;

    fn name(&self) -> String;

    fn url(&self) -> Url;

    fn size(&self) -> Result<u64>;

    fn etag(&self) -> String;

    /// `UNIX_EPOCH` on failure. A genuine epoch mtime (as some reproducible
    /// build trees carry) is indistinguishable, so never read the epoch as an
    /// error; consult `size` or `metadata`.
    fn last_mod(&self) -> SystemTime;

    fn metadata(&self) -> Result<&Metadata>;

    /// Open a fresh, independent byte stream. Dropping it closes it.
    fn open(&self) -> Result<Box<dyn Read + Send>>;
}

impl Source for Item {
    fn id(&self) -> &Path {
        Item::id(self)
    }

    fn name(&self) -> String {
        Item::name(self)
    }

    fn url(&self) -> Url {
        Item::url(self)
    }

    fn size(&self) -> Result<u64> {
        Item::size(self)
    }

    fn etag(&self) -> String {
        Item::etag(self)
    }

    fn last_mod(&self) -> SystemTime {
        Item::last_mod(self)
    }

    fn metadata(&self) -> Result<&Metadata> {
        Item::metadata(self)
    }

    fn open(&self) -> Result<Box<dyn Read + Send>> {
        Ok(Box::new(Item::open(self)?))
    }
}
