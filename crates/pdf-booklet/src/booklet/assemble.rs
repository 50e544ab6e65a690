//! Concatenate, impose, trim

use crate::page::Page;
use crate::tools::{Concatenate, Crop, Impose};
use crate::types::*;
use std::path::Path;

const JOINED_FILE: &str = "joined.pdf";
const IMPOSED_FILE: &str = "imposed.pdf";
const TRIMMED_FILE: &str = "trimmed.pdf";

/// Merge `pages` in order, impose the result as a booklet, trim it and
/// move it to `output`. Scratch files go to `work`.
pub async fn assemble<T: Concatenate + Impose + Crop>(
    tools: &T,
    pages: &[Page],
    work: &Path,
    output: &Path,
) -> Result<()> {
    if pages.is_empty() {
        return Err(BookletError::NoPages);
    }

    let inputs: Vec<&Path> = pages.iter().map(Page::path).collect();
    let joined = work.join(JOINED_FILE);
    let imposed = work.join(IMPOSED_FILE);
    let trimmed = work.join(TRIMMED_FILE);

    tools.concatenate(&inputs, &joined).await?;
    tools.impose(&joined, &imposed).await?;
    tools.crop(&imposed, &trimmed, None).await?;

    move_file(&trimmed, output).await
}

async fn move_file(from: &Path, to: &Path) -> Result<()> {
    if let Err(e) = tokio::fs::rename(from, to).await {
        // Temp dirs often sit on another filesystem
        log::debug!("Rename to {} failed ({}), copying instead", to.display(), e);
        tokio::fs::copy(from, to).await?;
    }
    Ok(())
}
