//! Metadata keys, base attribute derivation and sidecar decoding.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ResolveError;
use crate::path::absolute_clean;

/// Merged metadata mapping: base attributes plus, under [`USER_DATA`], the
/// decoded sidecar object.
pub type Metadata = Map<String, Value>;

pub const PATH: &str = "path";
pub const IS_DIR: &str = "is_dir";
pub const DIR: &str = "dir";
pub const NAME: &str = "name";
pub const MODE: &str = "mode";
pub const MODE_D: &str = "mode_d";
pub const PERM: &str = "perm";
pub const INODE: &str = "inode";
pub const SIZE: &str = "size";
pub const IS_HARDLINK: &str = "is_hardlink";
pub const IS_SYMLINK: &str = "is_symlink";
pub const LINK: &str = "link";
pub const USER_DATA: &str = "user_data";

/// Keys present in every successfully resolved mapping.
pub const BASE_KEYS: &[&str] = &[
    PATH,
    IS_DIR,
    DIR,
    NAME,
    MODE,
    MODE_D,
    PERM,
    INODE,
    SIZE,
    IS_HARDLINK,
    IS_SYMLINK,
];

/// Conventional suffix of sidecar metadata files.
pub const META_FILE_EXT: &str = "._meta";

/// Directory type bit of `st_mode`.
const S_IFDIR: u32 = 0o040000;

/// Conventional sidecar path for `path`: the path with [`META_FILE_EXT`] appended.
pub fn sidecar_path(path: impl AsRef<Path>) -> PathBuf {
    sidecar_path_with(path, META_FILE_EXT)
}

/// Sidecar path for `path` under a custom suffix, appended to the raw path.
pub fn sidecar_path_with(path: impl AsRef<Path>, ext: &str) -> PathBuf {
    let mut s = path.as_ref().as_os_str().to_os_string();
    s.push(ext);
    PathBuf::from(s)
}

/// Raw file system attributes, split out of `fs::Metadata` per platform.
struct RawStat {
    mode: u32,
    inode: u64,
    nlink: u64,
}

#[cfg(unix)]
fn raw_stat(info: &fs::Metadata) -> RawStat {
    use std::os::unix::fs::MetadataExt;
    RawStat {
        mode: info.mode(),
        inode: info.ino(),
        nlink: info.nlink(),
    }
}

#[cfg(not(unix))]
fn raw_stat(info: &fs::Metadata) -> RawStat {
    let perm = if info.permissions().readonly() { 0o444 } else { 0o666 };
    let kind = if info.is_dir() { S_IFDIR | 0o111 } else { 0 };
    RawStat {
        mode: kind | perm,
        inode: 0,
        nlink: 1,
    }
}

/// Derive the base metadata mapping from link-aware status information.
///
/// `info` must come from `symlink_metadata`, so a symlink describes itself and
/// not its target. For symlinks the raw target is stored under [`LINK`].
pub fn base_metadata(path: &Path, info: &fs::Metadata) -> Result<Metadata, ResolveError> {
    let raw = raw_stat(info);
    let abs = absolute_clean(path);
    let is_dir = info.is_dir();
    let is_symlink = info.file_type().is_symlink();

    let dir = abs
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = abs
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut md = Metadata::new();
    md.insert(PATH.into(), Value::from(abs.to_string_lossy().into_owned()));
    md.insert(IS_DIR.into(), Value::from(is_dir));
    md.insert(DIR.into(), Value::from(dir));
    md.insert(NAME.into(), Value::from(name));
    md.insert(MODE.into(), Value::from(raw.mode));
    md.insert(MODE_D.into(), Value::from(if is_dir { S_IFDIR } else { 0 }));
    md.insert(PERM.into(), Value::from(raw.mode & 0o777));
    md.insert(INODE.into(), Value::from(raw.inode));
    md.insert(SIZE.into(), Value::from(info.len()));
    md.insert(IS_HARDLINK.into(), Value::from(raw.nlink > 1));
    md.insert(IS_SYMLINK.into(), Value::from(is_symlink));

    if is_symlink {
        let target = fs::read_link(path).map_err(|source| ResolveError::ReadLink {
            path: path.to_path_buf(),
            source,
        })?;
        md.insert(LINK.into(), Value::from(target.to_string_lossy().into_owned()));
    }

    Ok(md)
}

/// Read and decode a sidecar metadata file.
///
/// The file must hold one JSON value: an object, or `null`. `null` and `{}`
/// both decode to `None`; anything else at the top level is a decode error.
pub fn read_sidecar(path: &Path) -> Result<Option<Metadata>, ResolveError> {
    let read_err = |source| ResolveError::SidecarRead {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(read_err)?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).map_err(read_err)?;

    let decoded: Option<Metadata> =
        serde_json::from_slice(&buf).map_err(|source| ResolveError::SidecarDecode {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(sidecar = %path.display(), bytes = buf.len(), "sidecar decoded");
    Ok(decoded.filter(|md| !md.is_empty()))
}
