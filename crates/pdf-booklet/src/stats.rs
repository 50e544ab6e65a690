use crate::constants::{PAGES_PER_SHEET, padding_needed};
use crate::range::SkipSet;
use crate::types::*;

/// Calculate statistics for a booklet made from `physical_pages` scanned
/// pages, leaving the pages in `skip` unsplit
pub fn calculate_statistics(physical_pages: usize, skip: &SkipSet) -> Result<BookletStatistics> {
    if physical_pages == 0 {
        return Err(BookletError::NoPages);
    }

    let single_pages = skip.iter().filter(|&p| p <= physical_pages).count();
    let split_pages = physical_pages - single_pages;
    let book_pages = single_pages + split_pages * 2;
    let padding_pages = padding_needed(book_pages);
    let output_pages = book_pages + padding_pages;

    Ok(BookletStatistics {
        physical_pages,
        single_pages,
        split_pages,
        book_pages,
        padding_pages,
        output_pages,
        sheets: output_pages / PAGES_PER_SHEET,
    })
}
