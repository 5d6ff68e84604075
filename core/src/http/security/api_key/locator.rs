//! Finds the candidate API key in a request.

use actix_web::http::header::AUTHORIZATION;

use super::config::{ApiKeyConfig, KeyName, KeyNames};
use super::error::ApiKeyError;
use super::request::RequestView;

/// Where a candidate key was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// A named header.
    Header,
    /// The `Authorization` header, after the scheme token.
    AuthorizationHeader,
    /// A named query parameter.
    Query,
}

/// A candidate key, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedKey {
    /// Name of the header or parameter it came from, as sent by the client.
    pub name: String,
    pub value: String,
    pub source: KeySource,
}

/// Splits an `Authorization` header value into its scheme token and parameter.
///
/// Both parts must be present: `"Bearer abc"` parses, `"abc"` and
/// `"Bearer "` do not.
pub fn parse_authorization(value: &str) -> Result<(&str, &str), ApiKeyError> {
    let value = value.trim();
    let (scheme, parameter) = value
        .split_once(|c: char| c.is_ascii_whitespace())
        .ok_or(ApiKeyError::MalformedHeader)?;
    let parameter = parameter.trim();

    if scheme.is_empty() || parameter.is_empty() {
        return Err(ApiKeyError::MalformedHeader);
    }
    Ok((scheme, parameter))
}

/// Looks for an API key in the locations an [`ApiKeyConfig`] allows.
///
/// Headers are tried before query parameters; within each class the first
/// declared name that the request carries wins.
pub struct ApiKeyLocator<'a> {
    config: &'a ApiKeyConfig,
    scheme_name: &'a str,
}

impl<'a> ApiKeyLocator<'a> {
    /// `scheme_name` is the name of the active authentication scheme, used as
    /// the expected `Authorization` token when the configuration asks for it.
    pub fn new(config: &'a ApiKeyConfig, scheme_name: &'a str) -> Self {
        Self {
            config,
            scheme_name,
        }
    }

    /// Returns the first candidate key, or `None` when no allowed location
    /// carries one.
    pub fn locate(&self, view: &RequestView) -> Option<LocatedKey> {
        if self.config.is_header_lookup_allowed() {
            if let Some(found) = self.locate_in_headers(view) {
                return Some(found);
            }
        }
        if self.config.is_query_lookup_allowed() {
            return self.locate_in_query(view);
        }
        None
    }

    fn locate_in_headers(&self, view: &RequestView) -> Option<LocatedKey> {
        if self.config.uses_authorization_header() {
            return self.locate_in_authorization(view);
        }
        scan(self.config.get_header_keys(), KeySource::Header, |key| {
            view.find_header(key)
        })
    }

    fn locate_in_authorization(&self, view: &RequestView) -> Option<LocatedKey> {
        let values = view.header_values(AUTHORIZATION.as_str())?;
        let raw = match values {
            [single] => single.as_str(),
            _ => {
                tracing::debug!("multiple Authorization headers, ignoring them");
                return None;
            }
        };

        let (scheme, parameter) = match parse_authorization(raw) {
            Ok(parts) => parts,
            Err(err) => {
                tracing::debug!(error = %err, "unusable Authorization header");
                return None;
            }
        };

        let expected = self.config.expected_token(self.scheme_name);
        if !scheme.eq_ignore_ascii_case(expected) {
            tracing::debug!(
                scheme,
                expected,
                "Authorization header carries another scheme"
            );
            return None;
        }

        Some(LocatedKey {
            name: AUTHORIZATION.as_str().to_string(),
            value: parameter.to_string(),
            source: KeySource::AuthorizationHeader,
        })
    }

    fn locate_in_query(&self, view: &RequestView) -> Option<LocatedKey> {
        scan(self.config.get_query_keys(), KeySource::Query, |key| {
            view.find_query(key)
        })
    }
}

fn scan<'v, F>(names: &KeyNames, source: KeySource, lookup: F) -> Option<LocatedKey>
where
    F: Fn(&KeyName) -> Option<&'v [String]>,
{
    names.iter().find_map(|key| {
        lookup(key).map(|values| LocatedKey {
            name: key.get_name().to_string(),
            // Repeated values are joined as HTTP list syntax does.
            value: values.join(","),
            source,
        })
    })
}
