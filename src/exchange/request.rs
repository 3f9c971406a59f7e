use http::Method;
use std::io::Read;

/// Read-only view of an inbound HTTP request.
///
/// Implemented by the hosting transport. Query and form parameters are merged
/// into one multi-valued map: [`param_values`](Self::param_values) returns
/// every value supplied for a name, in arrival order, so the parameter
/// resolver can reject duplicates where a single value is expected.
pub trait HttpRequest {
    /// HTTP method of the request.
    fn method(&self) -> &Method;

    /// Normalized request path, without the query string.
    fn path(&self) -> &str;

    /// Literal query string, without the leading `?`. Empty when absent.
    ///
    /// Pagination link rewriting operates on this string textually, so it
    /// must be the original wire form, not a re-serialization.
    fn query_string(&self) -> &str;

    /// Header lookup, case-insensitive per RFC 7230.
    fn header(&self, name: &str) -> Option<&str>;

    /// Cookie lookup by name.
    fn cookie(&self, name: &str) -> Option<&str>;

    /// All values supplied for a query/form parameter, in arrival order.
    fn param_values(&self, name: &str) -> &[String];

    /// Names of all query/form parameters present on the request.
    fn param_names(&self) -> Vec<&str>;

    /// Request body as a byte stream.
    fn body(&self) -> Box<dyn Read + '_>;

    /// Content type of the request body, if declared.
    fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Parsed `Accept` preferences in client order, parameters stripped.
    fn accept(&self) -> Vec<String> {
        parse_accept(self.header("accept"))
    }
}

/// Parse query string parameters from a raw path or query string.
///
/// Accepts either a full path (`/users?limit=10&limit=20`) or a bare query
/// string. Values are URL-decoded; duplicate names are preserved in order.
#[must_use]
pub fn parse_query_params(path_or_query: &str) -> Vec<(String, String)> {
    let query = match path_or_query.find('?') {
        Some(pos) => &path_or_query[pos + 1..],
        None if path_or_query.starts_with('/') => "",
        None => path_or_query,
    };
    if query.is_empty() {
        return Vec::new();
    }
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Parse a `Cookie` header value into name/value pairs.
#[must_use]
pub fn parse_cookies(header: Option<&str>) -> Vec<(String, String)> {
    header
        .map(|c| {
            c.split(';')
                .filter_map(|pair| {
                    let mut parts = pair.trim().splitn(2, '=');
                    let name = parts.next()?.trim();
                    if name.is_empty() {
                        return None;
                    }
                    let value = parts.next().unwrap_or("").trim();
                    Some((name.to_string(), value.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Parse an `Accept` header into an ordered list of media types.
///
/// Media-type parameters (including `q`) are stripped; client ordering is
/// preserved and stands in for quality ranking. Types are lowercased.
#[must_use]
pub fn parse_accept(header: Option<&str>) -> Vec<String> {
    header
        .map(|h| {
            h.split(',')
                .filter_map(|part| {
                    let media = part.split(';').next().unwrap_or("").trim();
                    if media.is_empty() {
                        None
                    } else {
                        Some(media.to_ascii_lowercase())
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}
