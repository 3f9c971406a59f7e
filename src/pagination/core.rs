use serde::Serialize;

use crate::route::{PaginationConfig, PaginationStyle};

/// Request-scoped pagination window.
///
/// Built per request from a route's [`PaginationConfig`] and the resolved
/// offset/limit parameter values; prepended to the target operation's
/// arguments by the pagination stage.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageInfo {
    /// Name of the offset parameter in the query string.
    pub offset_param: String,
    /// Name of the limit parameter in the query string.
    pub limit_param: String,
    pub offset: u64,
    pub limit: u64,
}

impl PageInfo {
    #[must_use]
    pub fn new(config: &PaginationConfig, offset: u64, limit: u64) -> Self {
        Self {
            offset_param: config.offset_param.clone(),
            limit_param: config.limit_param.clone(),
            offset,
            limit,
        }
    }

    /// Whether the window starts inside the first page.
    #[must_use]
    pub fn is_first_offset(&self) -> bool {
        self.offset < self.limit
    }

    /// Offset of the next page: `limit` for the zero offset, otherwise
    /// `offset + limit`, clamped to `total` when known.
    #[must_use]
    pub fn next_offset(&self, total: Option<u64>) -> u64 {
        if self.offset == 0 {
            return self.limit;
        }
        let next = self.offset + self.limit;
        match total {
            Some(total) if next > total => total,
            _ => next,
        }
    }

    /// Offset of the previous page: `offset - limit` clamped to zero, or
    /// `total - limit` when the offset has run past a known total.
    #[must_use]
    pub fn previous_offset(&self, total: Option<u64>) -> u64 {
        if let Some(total) = total {
            if self.offset >= total {
                return total.saturating_sub(self.limit);
            }
        }
        self.offset.saturating_sub(self.limit)
    }
}

/// Computed link targets for a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLinks {
    pub previous: Option<String>,
    pub next: Option<String>,
}

/// Computes pagination link header values.
///
/// URL rewriting is textual on the literal query string of the originating
/// request: the value after the first boundary occurrence of `name=` is
/// replaced in place, preserving every other character and the original
/// ordering; an absent parameter is appended as `&name=value`. No query
/// parsing or re-serialization happens here.
#[derive(Debug, Default)]
pub struct PaginationCalculator;

impl PaginationCalculator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Compute previous/next link URLs for the page.
    ///
    /// `result_len` is the size of the returned result set; a full page
    /// (`result_len == limit`) is what signals that more pages may exist.
    #[must_use]
    pub fn links(
        &self,
        style: &PaginationStyle,
        page: &PageInfo,
        path: &str,
        query: &str,
        total: Option<u64>,
        result_len: usize,
    ) -> PageLinks {
        let emit_previous = !page.is_first_offset();
        let emit_next = match style {
            PaginationStyle::HeaderPair { .. } => result_len as u64 == page.limit,
            PaginationStyle::WebLinking => result_len as u64 >= page.limit,
        };

        let previous = emit_previous.then(|| {
            page_url(path, query, page, page.previous_offset(total))
        });
        let next = emit_next.then(|| page_url(path, query, page, page.next_offset(total)));

        PageLinks { previous, next }
    }

    /// Compute the response headers for the page, per the route's
    /// presentation mode.
    ///
    /// Header-pair mode emits `{prefix}Links-Previous` unless the window is
    /// inside the first page, and `{prefix}Links-Next` only when the result
    /// set filled the page. Web-linking mode emits a single RFC 5988 `Link`
    /// header combining `rel="previous"` and/or `rel="next"`.
    #[must_use]
    pub fn link_headers(
        &self,
        config: &PaginationConfig,
        page: &PageInfo,
        path: &str,
        query: &str,
        total: Option<u64>,
        result_len: usize,
    ) -> Vec<(String, String)> {
        let links = self.links(&config.style, page, path, query, total, result_len);
        match &config.style {
            PaginationStyle::HeaderPair { prefix } => {
                let mut headers = Vec::new();
                if let Some(previous) = links.previous {
                    headers.push((format!("{prefix}Links-Previous"), previous));
                }
                if let Some(next) = links.next {
                    headers.push((format!("{prefix}Links-Next"), next));
                }
                headers
            }
            PaginationStyle::WebLinking => {
                let mut parts = Vec::new();
                if let Some(previous) = &links.previous {
                    parts.push(format!("<{previous}>; rel=\"previous\""));
                }
                if let Some(next) = &links.next {
                    parts.push(format!("<{next}>; rel=\"next\""));
                }
                if parts.is_empty() {
                    Vec::new()
                } else {
                    vec![("Link".to_string(), parts.join(", "))]
                }
            }
        }
    }
}

fn page_url(path: &str, query: &str, page: &PageInfo, offset: u64) -> String {
    let rewritten = rewrite_query(query, &page.offset_param, offset);
    let rewritten = rewrite_query(&rewritten, &page.limit_param, page.limit);
    format!("{path}?{rewritten}")
}

/// Replace the value of the first boundary occurrence of `name=` in the
/// literal query string, or append `&name=value` when absent.
#[must_use]
pub fn rewrite_query(query: &str, name: &str, value: u64) -> String {
    if let Some(start) = find_param(query, name) {
        let value_start = start + name.len() + 1;
        let value_end = query[value_start..]
            .find('&')
            .map_or(query.len(), |pos| value_start + pos);
        let mut rewritten = String::with_capacity(query.len() + 8);
        rewritten.push_str(&query[..value_start]);
        rewritten.push_str(&value.to_string());
        rewritten.push_str(&query[value_end..]);
        rewritten
    } else {
        format!("{query}&{name}={value}")
    }
}

/// Byte offset of the first `name=` occurrence sitting at a parameter
/// boundary (start of string or right after `&`).
fn find_param(query: &str, name: &str) -> Option<usize> {
    let needle = format!("{name}=");
    let mut searched = 0;
    while let Some(pos) = query[searched..].find(&needle) {
        let start = searched + pos;
        if start == 0 || query.as_bytes()[start - 1] == b'&' {
            return Some(start);
        }
        searched = start + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(offset: u64, limit: u64) -> PageInfo {
        PageInfo {
            offset_param: "offset".to_string(),
            limit_param: "limit".to_string(),
            offset,
            limit,
        }
    }

    #[test]
    fn first_page_next_offset_is_limit() {
        let p = page(0, 10);
        assert!(p.is_first_offset());
        assert_eq!(p.next_offset(Some(100)), 10);
    }

    #[test]
    fn next_offset_clamps_to_total() {
        let p = page(95, 10);
        assert_eq!(p.next_offset(Some(100)), 100);
        assert_eq!(p.next_offset(None), 105);
    }

    #[test]
    fn previous_offset_clamps_to_zero() {
        assert_eq!(page(5, 10).previous_offset(None), 0);
        assert_eq!(page(30, 10).previous_offset(Some(100)), 20);
    }

    #[test]
    fn previous_offset_clamps_past_total() {
        assert_eq!(page(200, 10).previous_offset(Some(100)), 90);
    }

    #[test]
    fn rewrite_replaces_value_in_place() {
        assert_eq!(
            rewrite_query("offset=0&limit=10&sort=name", "offset", 10),
            "offset=10&limit=10&sort=name"
        );
        assert_eq!(
            rewrite_query("sort=name&offset=20", "offset", 10),
            "sort=name&offset=10"
        );
    }

    #[test]
    fn rewrite_appends_missing_parameter() {
        assert_eq!(rewrite_query("sort=name", "offset", 10), "sort=name&offset=10");
    }

    #[test]
    fn rewrite_ignores_suffix_matches() {
        // "xoffset=" must not satisfy a lookup for "offset".
        assert_eq!(
            rewrite_query("xoffset=1&offset=2", "offset", 9),
            "xoffset=1&offset=9"
        );
    }
}
