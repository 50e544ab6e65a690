//! Scraping page geometry out of a `pdftk dump_data` report

use crate::page::Dimensions;
use crate::types::*;
use regex::Regex;
use std::sync::LazyLock;

const NUMBER: &str = r"(-?[\d,]*\.?\d+)";

static PAGE_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"NumberOfPages:\s+([\d,]+)").expect("valid regex"));

static PAGE_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PageMediaNumber:\s*(\d+)").expect("valid regex"));

static PAGE_DIMENSIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"PageMediaDimensions:\s*{NUMBER}\s+{NUMBER}")).expect("valid regex")
});

static CROP_RECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"PageMediaCropRect:\s*{NUMBER}\s+{NUMBER}\s+{NUMBER}\s+{NUMBER}"
    ))
    .expect("valid regex")
});

static MEDIA_RECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"PageMediaRect:\s*{NUMBER}\s+{NUMBER}\s+{NUMBER}\s+{NUMBER}"
    ))
    .expect("valid regex")
});

/// Geometry of one page entry in the dump
#[derive(Debug, Clone, PartialEq)]
pub struct PageMetadata {
    /// Value of `PageMediaNumber`
    pub number: usize,
    /// From `PageMediaDimensions`
    pub width: f64,
    pub height: f64,
    /// Crop rectangle if present, otherwise the media rectangle
    pub rect: Option<Dimensions>,
}

/// Everything the pipeline needs from the dump
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMetadata {
    /// Declared `NumberOfPages`
    pub page_count: usize,
    /// Page entries in document order
    pub pages: Vec<PageMetadata>,
}

impl DocumentMetadata {
    /// Entry for the 1-based physical page
    pub fn page(&self, page: usize) -> Option<&PageMetadata> {
        page.checked_sub(1).and_then(|i| self.pages.get(i))
    }

    /// Visible size of the 1-based physical page, if it had an entry.
    /// The crop or media rectangle wins over `PageMediaDimensions`.
    pub fn dimensions_of(&self, page: usize) -> Dimensions {
        self.page(page)
            .map(|p| {
                p.rect.unwrap_or(Dimensions::Known {
                    width: p.width,
                    height: p.height,
                })
            })
            .unwrap_or_default()
    }
}

/// Parse the full dump of a document.
///
/// Fails when `NumberOfPages` is missing or when more page entries are
/// listed than declared.
pub fn parse_metadata(text: &str) -> Result<DocumentMetadata> {
    let page_count = PAGE_COUNT
        .captures(text)
        .map(|caps| parse_count(&caps[1]))
        .transpose()?
        .ok_or_else(|| BookletError::Metadata("no NumberOfPages field".to_string()))?;

    let starts: Vec<_> = PAGE_ENTRY.captures_iter(text).collect();
    let mut pages = Vec::with_capacity(starts.len());

    for (i, caps) in starts.iter().enumerate() {
        if i + 1 > page_count {
            return Err(BookletError::Metadata(format!(
                "found more page entries than the {} declared",
                page_count
            )));
        }

        let end = starts
            .get(i + 1)
            .map_or(text.len(), |next| next.get_match().start());
        let entry = &text[caps.get_match().end()..end];

        let number = parse_count(&caps[1])?;
        let rect = parse_page_rect(entry)?;
        let (width, height) = match (PAGE_DIMENSIONS.captures(entry), rect) {
            (Some(dims), _) => (parse_number(&dims[1])?, parse_number(&dims[2])?),
            (None, Some(Dimensions::Known { width, height })) => (width, height),
            (None, _) => {
                return Err(BookletError::Metadata(format!(
                    "page {} has neither dimensions nor a media rectangle",
                    number
                )));
            }
        };

        pages.push(PageMetadata {
            number,
            width,
            height,
            rect,
        });
    }

    if pages.len() < page_count {
        log::warn!(
            "Metadata lists {} of {} pages, the rest will be measured from their files",
            pages.len(),
            page_count
        );
    }

    Ok(DocumentMetadata { page_count, pages })
}

/// Size of the first crop rectangle in `text`, falling back to the media
/// rectangle. Rectangles are `left top right bottom`.
pub fn parse_page_rect(text: &str) -> Result<Option<Dimensions>> {
    let Some(caps) = CROP_RECT
        .captures(text)
        .or_else(|| MEDIA_RECT.captures(text))
    else {
        return Ok(None);
    };

    let left = parse_number(&caps[1])?;
    let top = parse_number(&caps[2])?;
    let right = parse_number(&caps[3])?;
    let bottom = parse_number(&caps[4])?;

    Ok(Some(Dimensions::Known {
        width: (right - left).abs(),
        height: (bottom - top).abs(),
    }))
}

fn parse_count(text: &str) -> Result<usize> {
    text.replace(',', "")
        .parse()
        .map_err(|_| BookletError::Metadata(format!("'{}' is not a page count", text)))
}

fn parse_number(text: &str) -> Result<f64> {
    text.replace(',', "")
        .parse()
        .map_err(|_| BookletError::Metadata(format!("'{}' is not a number", text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = "\
InfoBegin
InfoKey: Producer
InfoValue: Scanner 3000
PdfID0: 8b2a
NumberOfPages: 3
PageMediaBegin
PageMediaNumber: 1
PageMediaRotation: 0
PageMediaRect: 0 0 612 792
PageMediaDimensions: 612 792
PageMediaBegin
PageMediaNumber: 2
PageMediaRotation: 0
PageMediaRect: 0 0 1224 792
PageMediaDimensions: 1,224 792
PageMediaCropRect: 12 10 1212 782
PageMediaBegin
PageMediaNumber: 3
PageMediaRotation: 0
PageMediaRect: 0 0 612.5 792
PageMediaDimensions: 612.5 792
";

    #[test]
    fn test_parse_full_dump() {
        let meta = parse_metadata(DUMP).unwrap();
        assert_eq!(meta.page_count, 3);
        assert_eq!(meta.pages.len(), 3);
        assert_eq!(meta.pages[1].number, 2);
        assert_eq!(meta.pages[1].width, 1224.0);
        assert_eq!(meta.pages[2].width, 612.5);
    }

    #[test]
    fn test_crop_rect_preferred() {
        let meta = parse_metadata(DUMP).unwrap();
        assert_eq!(
            meta.pages[1].rect,
            Some(Dimensions::Known {
                width: 1200.0,
                height: 772.0
            })
        );
        assert_eq!(
            meta.pages[0].rect,
            Some(Dimensions::Known {
                width: 612.0,
                height: 792.0
            })
        );
    }

    #[test]
    fn test_too_many_entries_is_an_error() {
        let dump = DUMP.replace("NumberOfPages: 3", "NumberOfPages: 2");
        assert!(matches!(
            parse_metadata(&dump),
            Err(BookletError::Metadata(_))
        ));
    }

    #[test]
    fn test_missing_page_count() {
        let dump = DUMP.replace("NumberOfPages: 3", "");
        assert!(matches!(
            parse_metadata(&dump),
            Err(BookletError::Metadata(_))
        ));
    }

    #[test]
    fn test_fewer_entries_leaves_unknown() {
        let dump = DUMP.replace("NumberOfPages: 3", "NumberOfPages: 4");
        let meta = parse_metadata(&dump).unwrap();
        assert_eq!(meta.page_count, 4);
        assert!(meta.dimensions_of(3).is_known());
        assert_eq!(
            meta.dimensions_of(2),
            Dimensions::Known {
                width: 1200.0,
                height: 772.0
            }
        );
        assert_eq!(meta.dimensions_of(4), Dimensions::Unknown);
        assert_eq!(meta.dimensions_of(0), Dimensions::Unknown);
    }

    #[test]
    fn test_rect_without_dimensions() {
        let dump = "NumberOfPages: 1\nPageMediaNumber: 1\nPageMediaRect: 0 0 100 200\n";
        let meta = parse_metadata(dump).unwrap();
        assert_eq!(meta.pages[0].width, 100.0);
        assert_eq!(meta.pages[0].height, 200.0);

        let dump = "NumberOfPages: 1\nPageMediaNumber: 1\n";
        assert!(parse_metadata(dump).is_err());
    }

    #[test]
    fn test_parse_page_rect_absent() {
        assert_eq!(parse_page_rect("NumberOfPages: 1").unwrap(), None);
    }
}
