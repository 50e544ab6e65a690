//! Printer-style page ranges
//!
//! A spec is a comma-separated list of single pages (`3`) and inclusive
//! ranges (`4-9`). Negative numbers count from the end, so `-1` is the last
//! page and `1--1` is every page.

use crate::types::*;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

static RANGE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-?\d+)-(-?\d+)$").expect("valid range regex"));

static SINGLE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+$").expect("valid index regex"));

/// Physical pages exempted from splitting (1-based, sorted)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipSet(BTreeSet<usize>);

impl SkipSet {
    pub fn contains(&self, page: usize) -> bool {
        self.0.contains(&page)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<usize> for SkipSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        SkipSet(iter.into_iter().collect())
    }
}

impl fmt::Display for SkipSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for page in &self.0 {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{}", page)?;
            first = false;
        }
        Ok(())
    }
}

/// Resolve a possibly end-relative index against `count` pages.
///
/// Negative values count from the end (`-1` is `count`). Returns `None`
/// for `0` and for anything outside `1..=count`.
pub fn resolve_index(index: i64, count: usize) -> Option<usize> {
    let count = i64::try_from(count).ok()?;
    let resolved = if index < 0 { count + index + 1 } else { index };
    if (1..=count).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}

/// Expand a page-range spec into the set of pages it names.
pub fn parse_range(spec: &str, count: usize) -> Result<SkipSet> {
    let mut pages = BTreeSet::new();

    for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (start, stop) = if let Some(caps) = RANGE_TOKEN.captures(token) {
            (parse_number(&caps[1])?, parse_number(&caps[2])?)
        } else if SINGLE_TOKEN.is_match(token) {
            let index = parse_number(token)?;
            (index, index)
        } else {
            return Err(BookletError::InvalidRange(format!(
                "'{}' is neither a page nor a range",
                token
            )));
        };

        let start = resolve_endpoint(start, count, token)?;
        let stop = resolve_endpoint(stop, count, token)?;

        if start > stop {
            log::warn!(
                "Range '{}' resolves to {}-{} which is empty, ignoring it",
                token,
                start,
                stop
            );
            continue;
        }

        pages.extend(start..=stop);
    }

    Ok(SkipSet(pages))
}

fn parse_number(text: &str) -> Result<i64> {
    text.parse()
        .map_err(|_| BookletError::InvalidRange(format!("'{}' is out of range", text)))
}

fn resolve_endpoint(index: i64, count: usize, token: &str) -> Result<usize> {
    resolve_index(index, count).ok_or_else(|| {
        BookletError::InvalidRange(format!(
            "page {} in '{}' is outside the document ({} pages)",
            index, token, count
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(set: &SkipSet) -> Vec<usize> {
        set.iter().collect()
    }

    #[test]
    fn test_default_spec_is_covers() {
        for n in 1..20 {
            let set = parse_range("1,-1", n).unwrap();
            let mut expected = vec![1, n];
            expected.dedup();
            assert_eq!(pages(&set), expected);
        }
    }

    #[test]
    fn test_unary_minus_range_covers_everything() {
        for n in 1..20 {
            let set = parse_range("1--1", n).unwrap();
            assert_eq!(pages(&set), (1..=n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_mixed_spec() {
        let set = parse_range("2,4-6,-1", 10).unwrap();
        assert_eq!(pages(&set), vec![2, 4, 5, 6, 10]);
        assert_eq!(set.to_string(), "2,4,5,6,10");
    }

    #[test]
    fn test_negative_range_endpoints() {
        let set = parse_range("-3--1", 10).unwrap();
        assert_eq!(pages(&set), vec![8, 9, 10]);
    }

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index(-3, 10), Some(8));
        assert_eq!(resolve_index(-1, 10), Some(10));
        assert_eq!(resolve_index(-10, 10), Some(1));
        assert_eq!(resolve_index(-11, 10), None);
        assert_eq!(resolve_index(0, 10), None);
        assert_eq!(resolve_index(11, 10), None);
        assert_eq!(resolve_index(1, 0), None);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let set = parse_range("5-2", 10).unwrap();
        assert!(set.is_empty());

        let set = parse_range("1,-1-2", 10).unwrap();
        assert_eq!(pages(&set), vec![1]);
    }

    #[test]
    fn test_whitespace_and_empty_tokens() {
        let set = parse_range(" 1 , ,3-4,", 5).unwrap();
        assert_eq!(pages(&set), vec![1, 3, 4]);
        assert!(parse_range("", 5).unwrap().is_empty());
    }

    #[test]
    fn test_overlapping_ranges_dedup() {
        let set = parse_range("1-4,3-6,4", 10).unwrap();
        assert_eq!(set.len(), 6);
    }

    #[test]
    fn test_rejects_garbage_and_out_of_bounds() {
        assert!(matches!(
            parse_range("a", 5),
            Err(BookletError::InvalidRange(_))
        ));
        assert!(matches!(
            parse_range("1-2-3", 5),
            Err(BookletError::InvalidRange(_))
        ));
        assert!(matches!(
            parse_range("0", 5),
            Err(BookletError::InvalidRange(_))
        ));
        assert!(matches!(
            parse_range("2-9", 5),
            Err(BookletError::InvalidRange(_))
        ));
        assert!(matches!(
            parse_range("-6", 5),
            Err(BookletError::InvalidRange(_))
        ));
    }
}
