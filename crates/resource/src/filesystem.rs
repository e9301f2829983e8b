//! Loads package parts (embedded fonts and the like) from an unpacked
//! package directory.
//!
//! Part names are package-relative. A leading `/` names the package root,
//! as in `/Resources/Fonts/0A1B.ttf`. Nothing outside the root is readable:
//! `..` components are rejected, and after canonicalization the resolved
//! file must still live under the canonical root.

use fixpdf_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Default cap on a single part, large enough for CJK font programs.
pub const DEFAULT_MAX_PART_SIZE: u64 = 64 * 1024 * 1024;

#[derive(Debug)]
pub struct FilesystemResourceProvider {
    root: PathBuf,
    canonical_root: Option<PathBuf>,
    max_part_size: u64,
}

impl FilesystemResourceProvider {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        let canonical_root = root.canonicalize().ok();
        if canonical_root.is_none() {
            log::warn!("Package root {} does not exist yet", root.display());
        }
        Self {
            root,
            canonical_root,
            max_part_size: DEFAULT_MAX_PART_SIZE,
        }
    }

    pub fn with_max_part_size(mut self, bytes: u64) -> Self {
        self.max_part_size = bytes;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a part name to a file under the root.
    fn resolve(&self, part: &str) -> Result<PathBuf, ResourceError> {
        let relative = Path::new(part.strip_prefix('/').unwrap_or(part));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if part.is_empty() || escapes {
            return Err(ResourceError::NotFound(format!("{} (outside package root)", part)));
        }

        let candidate = self.root.join(relative);
        match (candidate.canonicalize(), &self.canonical_root) {
            (Ok(resolved), Some(root)) if !resolved.starts_with(root) => Err(ResourceError::NotFound(
                format!("{} (resolves outside package root)", part),
            )),
            (Ok(resolved), _) => Ok(resolved),
            (Err(_), _) => Ok(candidate),
        }
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let file = self.resolve(path)?;
        let not_found_or = |e: std::io::Error| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound(path.to_string())
            } else {
                ResourceError::LoadFailed {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            }
        };

        let size = std::fs::metadata(&file).map_err(not_found_or)?.len();
        if size > self.max_part_size {
            return Err(ResourceError::InvalidFormat(format!(
                "{} is {} bytes, over the {} byte limit",
                path, size, self.max_part_size
            )));
        }
        let data = std::fs::read(&file).map_err(not_found_or)?;
        log::debug!("Loaded part {} ({} bytes)", path, data.len());
        Ok(Arc::new(data))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.is_file()).unwrap_or(false)
    }

    fn base_path(&self) -> Option<&str> {
        self.root.to_str()
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}
