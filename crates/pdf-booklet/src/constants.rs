//! Shared constants for booklet assembly

/// Pages on one folded sheet printed on both sides
pub const PAGES_PER_SHEET: usize = 4;

/// Default skip-set: front and back cover
pub const DEFAULT_SINGLE_PAGES: &str = "1,-1";

/// Default padding source: the last book page
pub const DEFAULT_PADDING_PAGE: i64 = -1;

/// Suffix inserted before `.pdf` for the default output path
pub const OUTPUT_SUFFIX: &str = "-printable";

/// File name pattern handed to the burst tool
pub const BURST_PATTERN: &str = "page_%04d.pdf";

/// Prefix of the files the burst tool writes
pub const BURST_PREFIX: &str = "page_";

/// Metadata dump the burst tool leaves next to its pages
pub const BURST_METADATA_FILE: &str = "doc_data.txt";

/// Number of padding pages needed to reach a multiple of [`PAGES_PER_SHEET`]
#[inline]
pub fn padding_needed(pages: usize) -> usize {
    (PAGES_PER_SHEET - pages % PAGES_PER_SHEET) % PAGES_PER_SHEET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_needed() {
        assert_eq!(padding_needed(0), 0);
        assert_eq!(padding_needed(1), 3);
        assert_eq!(padding_needed(10), 2);
        assert_eq!(padding_needed(11), 1);
        assert_eq!(padding_needed(12), 0);
        for p in 1..64 {
            let padded = p + padding_needed(p);
            assert_eq!(padded % PAGES_PER_SHEET, 0);
            assert!(padded - p < PAGES_PER_SHEET);
        }
    }
}
