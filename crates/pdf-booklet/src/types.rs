use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookletError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("No pages to process")]
    NoPages,
    #[error("Invalid page range: {0}")]
    InvalidRange(String),
    #[error("Metadata parse error: {0}")]
    Metadata(String),
    #[error("Could not run `{tool}`: {source}")]
    ToolNotFound {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{tool}` failed with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },
    #[error("Padding page {index} is outside the book ({pages} pages)")]
    InvalidPaddingPage { index: i64, pages: usize },
    #[error("Burst produced {files} files but the document declares {declared} pages")]
    PageCountMismatch { files: usize, declared: usize },
}

pub type Result<T> = std::result::Result<T, BookletError>;

/// Where padding copies are inserted in the page sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PaddingPosition {
    /// Right after the front cover
    Front,
    /// Right before the back cover
    Back,
    /// Alternating, starting at the front
    #[default]
    Split,
}

impl PaddingPosition {
    /// Insertion index for the `copy`-th padding page (0-based) into a
    /// sequence that currently holds `len` pages.
    ///
    /// Under [`PaddingPosition::Split`] even copies go to the front and odd
    /// copies to the back, so an odd number of copies leaves the front with
    /// one more than the back.
    pub fn slot(self, copy: usize, len: usize) -> usize {
        let front = 1.min(len);
        let back = len.saturating_sub(1);
        match self {
            PaddingPosition::Front => front,
            PaddingPosition::Back => back,
            PaddingPosition::Split if copy % 2 == 0 => front,
            PaddingPosition::Split => back,
        }
    }
}

/// Statistics about the booklet
#[derive(Debug, Clone, PartialEq)]
pub struct BookletStatistics {
    /// Pages in the scanned input
    pub physical_pages: usize,
    /// Physical pages carried through unsplit
    pub single_pages: usize,
    /// Physical pages cut into two halves
    pub split_pages: usize,
    /// Logical pages after splitting
    pub book_pages: usize,
    /// Duplicated pages added to reach a multiple of four
    pub padding_pages: usize,
    /// Pages handed to imposition
    pub output_pages: usize,
    /// Printed sheets (four pages each, duplex)
    pub sheets: usize,
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct BookletReport {
    pub output: PathBuf,
    pub statistics: BookletStatistics,
}
