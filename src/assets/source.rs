use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{ReelError, ReelResult};

/// Transport that turns a frame locator into encoded image bytes.
///
/// Implementations are called from loader worker threads, one call per frame; they must not
/// assume any ordering among calls of the same batch.
pub trait FrameSource: Send + Sync {
    /// Fetch the encoded bytes behind `locator`.
    fn fetch(&self, locator: &str) -> ReelResult<Vec<u8>>;
}

/// Serves locators from a directory on disk.
///
/// Locators are resolved relative to `root`; a leading `/` is treated as the root itself, the
/// same way a static web server maps `/images/...` to its public directory.
#[derive(Clone, Debug)]
pub struct FsFrameSource {
    root: PathBuf,
}

impl FsFrameSource {
    /// Serve files below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory locators are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path for a locator.
    pub fn resolve(&self, locator: &str) -> ReelResult<PathBuf> {
        let rel = normalize_rel_path(locator.trim_start_matches(['/', '\\']))?;
        Ok(self.root.join(Path::new(&rel)))
    }
}

impl FrameSource for FsFrameSource {
    fn fetch(&self, locator: &str) -> ReelResult<Vec<u8>> {
        let path = self.resolve(locator)?;
        std::fs::read(&path)
            .with_context(|| format!("read frame bytes from '{}'", path.display()))
            .map_err(ReelError::from)
    }
}

/// Normalize and validate a root-relative locator path.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> ReelResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(ReelError::validation("frame paths must be relative"));
    }
    if s.is_empty() {
        return Err(ReelError::validation("frame path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ReelError::validation("frame paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ReelError::validation("frame path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
