use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::constants::http::{PAGINATION_ELEMENTS_HEADER, PAGINATION_PAGES_HEADER};

/// Totals reported alongside a listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total_pages: u64,
    pub total_elements: u64,
}

impl Pagination {
    pub fn new(total_pages: u64, total_elements: u64) -> Self {
        Self {
            total_pages,
            total_elements,
        }
    }

    /// Missing or malformed headers count as zero
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(parse_count)
                .unwrap_or(0)
        };

        Self {
            total_pages: read(PAGINATION_PAGES_HEADER),
            total_elements: read(PAGINATION_ELEMENTS_HEADER),
        }
    }
}

/// Leading decimal digits of the value; `"12abc"` is 12, `"abc"` is 0
fn parse_count(raw: &str) -> u64 {
    let trimmed = raw.trim_start();
    let digits = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .map_or(trimmed, |end| &trimmed[..end]);
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use rstest::rstest;

    #[rstest]
    #[case("7", 7)]
    #[case(" 42", 42)]
    #[case("12abc", 12)]
    #[case("abc", 0)]
    #[case("", 0)]
    #[case("-3", 0)]
    fn parses_leading_digits(#[case] raw: &str, #[case] expected: u64) {
        assert_eq!(parse_count(raw), expected);
    }

    #[test]
    fn reads_both_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(PAGINATION_PAGES_HEADER, HeaderValue::from_static("3"));
        headers.insert(PAGINATION_ELEMENTS_HEADER, HeaderValue::from_static("61"));

        assert_eq!(Pagination::from_headers(&headers), Pagination::new(3, 61));
    }

    #[test]
    fn missing_headers_are_zero() {
        assert_eq!(Pagination::from_headers(&HeaderMap::new()), Pagination::default());
    }
}
