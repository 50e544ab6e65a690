//! Scanned book to printable booklet
//!
//! This module sequences the whole run:
//! 1. Burst the scan into one file per physical page
//! 2. Cut every double-page scan into its left and right half
//! 3. Bring all pages to a common size
//! 4. Pad with copies of one page up to a multiple of four
//! 5. Concatenate, impose and trim into the output file

mod assemble;
mod normalize;
mod padding;
mod split;

pub use assemble::assemble;
pub use normalize::normalize_pages;
pub use padding::pad_pages;
pub use split::{split_page, split_pages};

use crate::metadata::parse_metadata;
use crate::options::BookletOptions;
use crate::page::{Page, PageId, PageNamer};
use crate::range::parse_range;
use crate::stats::calculate_statistics;
use crate::tools::{Burst, Toolchain};
use crate::types::*;
use std::path::Path;

/// Turn the scan named in `options` into a booklet.
///
/// Intermediate files live in a temporary directory that is removed when
/// the run ends, whether it succeeds or not.
pub async fn make_booklet<T: Toolchain>(
    tools: &T,
    options: &BookletOptions,
) -> Result<BookletReport> {
    options.validate()?;

    if !tokio::fs::try_exists(&options.input).await? {
        return Err(BookletError::Config(format!(
            "Input {} does not exist",
            options.input.display()
        )));
    }

    let output = options.output_path();
    if is_same_file(&options.input, &output).await? {
        return Err(BookletError::Config(format!(
            "Output {} would overwrite the input",
            output.display()
        )));
    }

    let work = tempfile::Builder::new().prefix("pdf-booklet-").tempdir()?;
    log::debug!("Working in {}", work.path().display());

    let burst = tools.burst(&options.input, work.path()).await?;
    let metadata = parse_metadata(&burst.metadata)?;
    let page_count = metadata.page_count;

    if burst.files.len() != page_count {
        return Err(BookletError::PageCountMismatch {
            files: burst.files.len(),
            declared: page_count,
        });
    }
    if page_count == 0 {
        return Err(BookletError::NoPages);
    }

    let skip = parse_range(&options.single_pages, page_count)?;
    let statistics = calculate_statistics(page_count, &skip)?;
    log::info!(
        "Processing {} -> {} with {} pages, keeping {} unsplit",
        options.input.display(),
        output.display(),
        page_count,
        if skip.is_empty() {
            "none".to_string()
        } else {
            skip.to_string()
        }
    );

    let pages: Vec<Page> = burst
        .files
        .into_iter()
        .enumerate()
        .map(|(i, path)| Page::new(PageId(i + 1), path, metadata.dimensions_of(i + 1)))
        .collect();

    let mut namer = PageNamer::new(work.path(), page_count);
    let mut pages = split_pages(tools, pages, &metadata, &skip, &mut namer).await?;
    normalize_pages(tools, &mut pages, &mut namer).await?;
    pad_pages(
        &mut pages,
        options.padding_position,
        options.padding_page,
        &mut namer,
    )
    .await?;
    debug_assert_eq!(pages.len(), statistics.output_pages);

    assemble(tools, &pages, work.path(), &output).await?;
    drop(pages);

    log::debug!("Booklet written to {}", output.display());
    Ok(BookletReport { output, statistics })
}

/// Whether `output` resolves to the existing `input` file.
///
/// The output usually doesn't exist yet, so its directory is resolved and
/// the file name joined back on. A directory that can't be resolved can't
/// hold the input either.
async fn is_same_file(input: &Path, output: &Path) -> Result<bool> {
    let input = tokio::fs::canonicalize(input).await?;

    if let Ok(resolved) = tokio::fs::canonicalize(output).await {
        return Ok(resolved == input);
    }

    let Some(name) = output.file_name() else {
        return Ok(false);
    };
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok(match tokio::fs::canonicalize(dir).await {
        Ok(dir) => dir.join(name) == input,
        Err(_) => false,
    })
}

/// Page accounting for the scan in `options` without producing anything.
pub async fn read_statistics<T: Burst>(
    tools: &T,
    options: &BookletOptions,
) -> Result<BookletStatistics> {
    options.validate()?;

    let text = tools.dump_data(&options.input).await?;
    let metadata = parse_metadata(&text)?;
    let skip = parse_range(&options.single_pages, metadata.page_count)?;
    calculate_statistics(metadata.page_count, &skip)
}
