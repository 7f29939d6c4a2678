//! Recognized-file discovery under a root directory.
//!
//! Built on `walkdir`: entries are sorted by file name so a run over the
//! same tree always sees files in the same order, symbolic links are
//! followed with loop detection, and recursion depth is bounded.

use crate::extract::Format;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Deepest directory level visited when recursing.
pub const MAX_DEPTH: usize = 256;

/// A recognized file found during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Root as given joined with the relative path
    pub path: PathBuf,
    /// Path below the root
    pub relative: PathBuf,
    /// Extension without the dot, exactly as on disk
    pub extension: String,
    pub format: Format,
}

impl FileEntry {
    /// Display form of the path, used as the record title.
    pub fn title(&self) -> String {
        self.path.display().to_string()
    }
}

/// Errors encountered while walking a tree.
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Symbolic link loop at {path} (points back to {ancestor})")]
    Loop { path: PathBuf, ancestor: PathBuf },
}

impl WalkError {
    /// Path the error occurred at.
    pub fn path(&self) -> &Path {
        match self {
            Self::Unreadable { path, .. } | Self::Loop { path, .. } => path,
        }
    }
}

impl From<walkdir::Error> for WalkError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        if let Some(ancestor) = err.loop_ancestor() {
            return Self::Loop {
                path,
                ancestor: ancestor.to_path_buf(),
            };
        }
        let source = err
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walk failed"));
        Self::Unreadable { path, source }
    }
}

/// Start walking `root` for recognized files.
///
/// With `recurse` false only the root's direct children are considered.
/// Fails immediately if the root itself cannot be read; problems further
/// down the tree are yielded as `Err` items and the walk goes on.
pub fn walk(root: &Path, recurse: bool) -> Result<Walk, WalkError> {
    std::fs::read_dir(root).map_err(|source| WalkError::Unreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let max_depth = if recurse { MAX_DEPTH } else { 1 };
    let inner = WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter();

    Ok(Walk {
        root: root.to_path_buf(),
        inner,
    })
}

/// Lazy iterator over the recognized files of one tree.
pub struct Walk {
    root: PathBuf,
    inner: walkdir::IntoIter,
}

impl Walk {
    fn file_entry(&self, path: &Path) -> Option<FileEntry> {
        let extension = path.extension()?.to_str()?;
        let format = Format::from_extension(extension)?;
        let relative = path.strip_prefix(&self.root).unwrap_or(path).to_path_buf();
        Some(FileEntry {
            path: path.to_path_buf(),
            relative,
            extension: extension.to_string(),
            format,
        })
    }
}

impl Iterator for Walk {
    type Item = Result<FileEntry, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(err.into())),
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(file) = self.file_entry(entry.path()) {
                return Some(Ok(file));
            }
        }
    }
}
