//! Output records: one row per successfully extracted file.

use crate::walk::FileEntry;
use md5::{Digest, Md5};
use serde::Serialize;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// One CSV row. Field order matches the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Hex MD5 of the path bytes
    pub id: String,
    /// Cleaned extracted text
    pub text: String,
    /// Path as walked (root as given + relative path)
    pub title: String,
    /// `file://` URL of the document, or `<url base>/<relative path>`
    pub url: String,
}

impl Record {
    /// Build the record for `entry` with its extracted `text`.
    pub fn new(entry: &FileEntry, text: String, url_base: Option<&str>) -> Self {
        let title = entry.title();
        let url = match url_base {
            Some(base) => base_url(base, &entry.relative),
            None => file_url(&entry.path),
        };
        Self {
            id: document_id(&entry.path),
            text,
            title,
            url,
        }
    }
}

/// Stable identifier for a document path.
///
/// Lowercase hex MD5 of the path as stored by the OS: the same path always
/// gets the same id, in any run or process. For UTF-8 paths this is the MD5
/// of the title.
pub fn document_id<P: AsRef<OsStr>>(path: P) -> String {
    let bytes = os_bytes(path.as_ref());
    format!("{:x}", Md5::digest(&*bytes))
}

/// Raw bytes of a path. Names that are not valid UTF-8 keep their own
/// bytes, so they never collide after lossy display.
#[cfg(unix)]
fn os_bytes(path: &OsStr) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_bytes())
}

#[cfg(not(unix))]
fn os_bytes(path: &OsStr) -> Cow<'_, [u8]> {
    match path.to_string_lossy() {
        Cow::Borrowed(text) => Cow::Borrowed(text.as_bytes()),
        Cow::Owned(text) => Cow::Owned(text.into_bytes()),
    }
}

/// `file://` URL for `path`, made absolute against the current directory.
pub fn file_url(path: &Path) -> String {
    let absolute = absolute_path(path);
    let mut path = url_path(&absolute);
    if !path.starts_with('/') {
        path.insert(0, '/');
    }
    format!("file://{}", path)
}

/// `<base>/<relative>` with exactly one slash between the two.
pub fn base_url(base: &str, relative: &Path) -> String {
    format!("{}/{}", base.trim_end_matches('/'), url_path(relative))
}

/// Path string with `/` separators.
fn url_path(path: &Path) -> String {
    let text = path.to_string_lossy();
    if cfg!(windows) {
        text.replace('\\', "/")
    } else {
        text.into_owned()
    }
}

/// Absolute, lexically normalized form of `path` (`.` and `..` resolved
/// without touching the filesystem, symlinks kept).
fn absolute_path(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
