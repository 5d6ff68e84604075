//! Read-only view of the parts of a request an API key can live in.

use actix_web::dev::ServiceRequest;
use actix_web::http::header::HeaderMap;
use actix_web::HttpRequest;

use super::config::KeyName;

/// Multi-valued name/value pairs, kept in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct MultiMap(Vec<(String, Vec<String>)>);

impl MultiMap {
    fn append(&mut self, name: String, value: String) {
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, values)) => values.push(value),
            None => self.0.push((name, vec![value])),
        }
    }

    fn find(&self, key: &KeyName) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(name, _)| key.matches(name))
            .map(|(_, values)| values.as_slice())
    }

    fn find_ignore_case(&self, name: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }
}

/// Headers and query parameters of one request.
///
/// Built once per request and only read by the authentication scheme.
///
/// # Example
///
/// ```
/// use actix_apikey_core::http::security::api_key::{KeyName, RequestView};
///
/// let view = RequestView::new()
///     .header("X-API-KEY", "sk_live_abc123")
///     .query_param("page", "2");
///
/// assert_eq!(view.find_header(&KeyName::new("x-api-key")), Some(&["sk_live_abc123".to_string()][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestView {
    headers: MultiMap,
    query: MultiMap,
}

impl RequestView {
    /// Creates an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header value. Repeating a name appends another value.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name.into(), value.into());
        self
    }

    /// Adds a query parameter value. Repeating a name appends another value.
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.append(name.into(), value.into());
        self
    }

    /// Builds a view from a header map and a raw (still encoded) query string.
    ///
    /// Header values that are not visible ASCII are skipped.
    pub fn from_parts(headers: &HeaderMap, query_string: &str) -> Self {
        let mut view = RequestView::new();
        for (name, value) in headers.iter() {
            if let Ok(value) = value.to_str() {
                view.headers.append(name.as_str().to_string(), value.to_string());
            }
        }
        for (name, value) in url::form_urlencoded::parse(query_string.as_bytes()) {
            view.query.append(name.into_owned(), value.into_owned());
        }
        view
    }

    /// Builds a view from an Actix service request.
    pub fn from_service_request(req: &ServiceRequest) -> Self {
        Self::from_parts(req.headers(), req.query_string())
    }

    /// Builds a view from an Actix HTTP request.
    pub fn from_http_request(req: &HttpRequest) -> Self {
        Self::from_parts(req.headers(), req.query_string())
    }

    /// Values of the first header whose name matches `key`.
    pub fn find_header(&self, key: &KeyName) -> Option<&[String]> {
        self.headers.find(key)
    }

    /// Values of the first query parameter whose name matches `key`.
    pub fn find_query(&self, key: &KeyName) -> Option<&[String]> {
        self.query.find(key)
    }

    /// Values of a header looked up the way HTTP names compare: ignoring case.
    pub fn header_values(&self, name: &str) -> Option<&[String]> {
        self.headers.find_ignore_case(name)
    }
}
