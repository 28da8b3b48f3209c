use chrono::{DateTime, SecondsFormat, Utc};
use fsitem::{Metadata, Source};
use serde::Serialize;

/// JSON view of one item, as printed by `fsitem inspect`.
#[derive(Debug, Serialize)]
pub struct ItemReport {
    pub id: String,
    pub name: String,
    pub url: String,
    pub size: u64,
    pub etag: String,
    pub last_mod: String,
    pub metadata: Metadata,
}

impl ItemReport {
    /// Gather every accessor of `source`. Fails on the strict ones only.
    pub fn collect(source: &dyn Source) -> fsitem::Result<Self> {
        let metadata = source.metadata()?.clone();
        let size = source.size()?;

        Ok(Self {
            id: source.id().to_string_lossy().into_owned(),
            name: source.name(),
            url: source.url().to_string(),
            size,
            etag: source.etag(),
            last_mod: DateTime::<Utc>::from(source.last_mod()).to_rfc3339_opts(SecondsFormat::Secs, true),
            metadata,
        })
    }
}
