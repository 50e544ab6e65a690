//! Cutting double-page scans in half

use crate::metadata::DocumentMetadata;
use crate::page::{Dimensions, Page, PageNamer};
use crate::range::SkipSet;
use crate::tools::{Crop, CropMargins, Inspect};
use crate::types::*;

/// Split every physical page not in `skip`, in order.
///
/// `pages[i]` is physical page `i + 1`. The cut is placed at half the width
/// reported by the metadata, or measured from the file when the page had no
/// metadata entry.
pub async fn split_pages<T: Crop + Inspect>(
    tools: &T,
    pages: Vec<Page>,
    metadata: &DocumentMetadata,
    skip: &SkipSet,
    namer: &mut PageNamer,
) -> Result<Vec<Page>> {
    let mut result = Vec::with_capacity(pages.len() * 2);

    for (i, mut page) in pages.into_iter().enumerate() {
        let number = i + 1;
        if skip.contains(number) {
            log::debug!("Keeping page {} whole", number);
            result.push(page);
            continue;
        }

        let width = match metadata.page(number) {
            Some(entry) => entry.width,
            None => page.dimensions(tools).await?.0,
        };
        let (left, right) = split_page(tools, page, width, namer).await?;
        result.push(left);
        result.push(right);
    }

    log::info!("Split into {} book pages", result.len());
    Ok(result)
}

/// Cut `page` into its left and right half. The original file is removed.
pub async fn split_page<T: Crop>(
    tools: &T,
    page: Page,
    width: f64,
    namer: &mut PageNamer,
) -> Result<(Page, Page)> {
    let (left_id, left_path) = namer.allocate(&format!("p{}-left", page.id().0));
    tools
        .crop(page.path(), &left_path, Some(CropMargins::left_half(width)))
        .await?;
    let left = Page::new(left_id, left_path, Dimensions::Unknown);

    let (right_id, right_path) = namer.allocate(&format!("p{}-right", page.id().0));
    tools
        .crop(page.path(), &right_path, Some(CropMargins::right_half(width)))
        .await?;
    let right = Page::new(right_id, right_path, Dimensions::Unknown);

    Ok((left, right))
}
