//! Adapters for the external PDF programs
//!
//! Every capability the pipeline needs sits behind its own narrow trait so
//! that the page accounting can run against a fake toolchain in tests.
//! [`ExternalTools`] implements all of them by shelling out to `pdftk`,
//! `pdfcrop` and `pdfjam`, and measures pages in-process with lopdf.

#![allow(async_fn_in_trait)]

mod external;
mod inspect;

pub use external::ExternalTools;
pub use inspect::first_page_dimensions;

use crate::page::Dimensions;
use crate::types::*;
use std::fmt;
use std::path::{Path, PathBuf};

/// Result of bursting a document
#[derive(Debug, Clone, PartialEq)]
pub struct BurstOutput {
    /// One file per physical page, in page order
    pub files: Vec<PathBuf>,
    /// Metadata report of the whole document
    pub metadata: String,
}

/// Crop offsets in points. Negative values cut into the page from that edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CropMargins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl CropMargins {
    /// Keep the left half of a page `width` wide
    pub fn left_half(width: f64) -> Self {
        Self {
            right: -width / 2.0,
            ..Default::default()
        }
    }

    /// Keep the right half of a page `width` wide
    pub fn right_half(width: f64) -> Self {
        Self {
            left: -width / 2.0,
            ..Default::default()
        }
    }
}

impl fmt::Display for CropMargins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.left, self.top, self.right, self.bottom)
    }
}

pub trait Burst {
    /// Explode `input` into one file per page inside `dir`.
    async fn burst(&self, input: &Path, dir: &Path) -> Result<BurstOutput>;

    /// Metadata report of `input` without writing any pages.
    async fn dump_data(&self, input: &Path) -> Result<String>;
}

pub trait Crop {
    /// Crop `input` into `output`. Without margins the page is trimmed to
    /// its visible content.
    async fn crop(&self, input: &Path, output: &Path, margins: Option<CropMargins>) -> Result<()>;
}

pub trait Resize {
    /// Put `input` on a fixed `width` x `height` canvas without scaling it.
    async fn resize(&self, input: &Path, output: &Path, width: f64, height: f64) -> Result<()>;
}

pub trait Concatenate {
    async fn concatenate(&self, inputs: &[&Path], output: &Path) -> Result<()>;
}

pub trait Impose {
    /// Reorder pages into two-up booklet signature order.
    async fn impose(&self, input: &Path, output: &Path) -> Result<()>;
}

pub trait Inspect {
    /// Visible size of the first page of `path`.
    async fn page_dimensions(&self, path: &Path) -> Result<Dimensions>;
}

/// Everything the booklet pipeline shells out for
pub trait Toolchain: Burst + Crop + Resize + Concatenate + Impose + Inspect {}

impl<T> Toolchain for T where T: Burst + Crop + Resize + Concatenate + Impose + Inspect {}
