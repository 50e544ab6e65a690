//! Bringing every page to one size

use crate::page::{Dimensions, Page, PageNamer};
use crate::tools::{Inspect, Resize};
use crate::types::*;

/// Sizes closer than this (in points) count as equal
const SIZE_TOLERANCE: f64 = 0.01;

/// Resize every page to the smallest width and smallest height found in
/// `pages`. Returns that size, or `None` for an empty slice.
///
/// Pages already at the target keep their file.
pub async fn normalize_pages<T: Resize + Inspect>(
    tools: &T,
    pages: &mut [Page],
    namer: &mut PageNamer,
) -> Result<Option<(f64, f64)>> {
    if pages.is_empty() {
        return Ok(None);
    }

    let mut width = f64::INFINITY;
    let mut height = f64::INFINITY;
    for page in pages.iter_mut() {
        let (w, h) = page.dimensions(tools).await?;
        width = width.min(w);
        height = height.min(h);
    }
    log::info!("Resizing pages to {:.2} x {:.2} pt", width, height);

    let mut resized = 0;
    for page in pages.iter_mut() {
        let (w, h) = page.dimensions(tools).await?;
        if (w - width).abs() < SIZE_TOLERANCE && (h - height).abs() < SIZE_TOLERANCE {
            continue;
        }

        let (_, path) = namer.allocate(&format!("p{}-sized", page.id().0));
        tools.resize(page.path(), &path, width, height).await?;
        page.replace_file(path, Dimensions::Known { width, height });
        resized += 1;
    }
    log::debug!("Resized {} of {} pages", resized, pages.len());

    Ok(Some((width, height)))
}
