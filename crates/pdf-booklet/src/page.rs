//! Single-page PDF files on disk

use crate::tools::Inspect;
use crate::types::*;
use std::fmt;
use std::path::{Path, PathBuf};

/// Page size in points, once measured
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimensions {
    /// Not measured since the file was last replaced
    #[default]
    Unknown,
    Known { width: f64, height: f64 },
}

impl Dimensions {
    pub fn is_known(self) -> bool {
        matches!(self, Dimensions::Known { .. })
    }

    /// `(width, height)` if known
    pub fn size(self) -> Option<(f64, f64)> {
        match self {
            Dimensions::Known { width, height } => Some((width, height)),
            Dimensions::Unknown => None,
        }
    }
}

/// Identity of a page file, unique within one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageId(pub usize);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One logical page backed by a single-page PDF.
///
/// The page owns its file: dropping it or replacing the file unlinks the
/// previous one.
#[derive(Debug)]
pub struct Page {
    id: PageId,
    path: PathBuf,
    dimensions: Dimensions,
}

impl Page {
    pub fn new(id: PageId, path: impl Into<PathBuf>, dimensions: Dimensions) -> Self {
        Self {
            id,
            path: path.into(),
            dimensions,
        }
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached dimensions without probing
    pub fn cached_dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Width and height of the page, probing the file on first use.
    pub async fn dimensions<I: Inspect + ?Sized>(&mut self, tools: &I) -> Result<(f64, f64)> {
        if let Some(size) = self.dimensions.size() {
            return Ok(size);
        }

        let measured = tools.page_dimensions(&self.path).await?;
        log::trace!("Measured page {} at {:?}", self.id, measured);
        self.dimensions = measured;
        measured.size().ok_or_else(|| {
            BookletError::Config(format!("{} has no measurable size", self.path.display()))
        })
    }

    /// Point the page at a new file, unlinking the old one.
    ///
    /// `dimensions` is what the caller knows about the new file, usually
    /// [`Dimensions::Unknown`].
    pub fn replace_file(&mut self, path: impl Into<PathBuf>, dimensions: Dimensions) {
        let old = std::mem::replace(&mut self.path, path.into());
        remove_quietly(&old);
        self.dimensions = dimensions;
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        remove_quietly(&self.path);
    }
}

fn remove_quietly(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            log::debug!("Could not remove {}: {}", path.display(), e);
        }
    }
}

/// Hands out unique, deterministic file names inside the work directory
#[derive(Debug)]
pub struct PageNamer {
    dir: PathBuf,
    next: usize,
}

impl PageNamer {
    /// Ids start after `reserved`, which covers the burst pages
    pub fn new(dir: impl Into<PathBuf>, reserved: usize) -> Self {
        Self {
            dir: dir.into(),
            next: reserved + 1,
        }
    }

    pub fn allocate(&mut self, label: &str) -> (PageId, PathBuf) {
        let id = PageId(self.next);
        self.next += 1;
        let path = self.dir.join(format!("{:05}-{}.pdf", id.0, label));
        (id, path)
    }
}
