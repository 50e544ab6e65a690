//! Filling the page count up to a multiple of four

use crate::constants::padding_needed;
use crate::page::{Page, PageNamer};
use crate::range::resolve_index;
use crate::types::*;

/// Insert copies of one page until `pages.len()` is a multiple of four.
///
/// `padding_page` is a 1-based book page index (negative counts from the
/// end) resolved against the pages present before padding. Returns the
/// number of copies added.
pub async fn pad_pages(
    pages: &mut Vec<Page>,
    position: PaddingPosition,
    padding_page: i64,
    namer: &mut PageNamer,
) -> Result<usize> {
    let need = padding_needed(pages.len());
    if need == 0 {
        return Ok(0);
    }

    let source = resolve_index(padding_page, pages.len()).ok_or(
        BookletError::InvalidPaddingPage {
            index: padding_page,
            pages: pages.len(),
        },
    )?;
    let source = &pages[source - 1];
    let source_path = source.path().to_path_buf();
    let source_id = source.id();
    let dimensions = source.cached_dimensions();

    log::info!(
        "Adding {} copies of book page {} ({:?} placement)",
        need,
        padding_page,
        position
    );

    let mut copies = Vec::with_capacity(need);
    for copy in 0..need {
        let (id, path) = namer.allocate(&format!("p{}-pad{}", source_id.0, copy + 1));
        tokio::fs::copy(&source_path, &path).await?;
        copies.push(Page::new(id, path, dimensions));
    }

    for (copy, page) in copies.into_iter().enumerate() {
        let slot = position.slot(copy, pages.len());
        pages.insert(slot, page);
    }

    Ok(need)
}
