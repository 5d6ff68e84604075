//! API Key configuration.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Default header carrying the API key.
pub const DEFAULT_HEADER_KEY: &str = "X-API-KEY";
/// Default query parameter carrying the API key.
pub const DEFAULT_QUERY_KEY: &str = "apikey";
/// Default scheme token expected in `Authorization: <token> <key>`.
pub const DEFAULT_AUTHORIZATION_SCHEME: &str = "Bearer";

/// A header or query parameter name, with its matching rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyName {
    name: String,
    #[serde(default)]
    case_sensitive: bool,
}

impl KeyName {
    /// A name matched regardless of letter case.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_case(name, false)
    }

    pub fn with_case(name: impl Into<String>, case_sensitive: bool) -> Self {
        Self {
            name: name.into(),
            case_sensitive,
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }

    /// Checks a request-side name against this entry.
    pub fn matches(&self, candidate: &str) -> bool {
        if self.case_sensitive {
            return candidate == self.name;
        }
        candidate.eq_ignore_ascii_case(&self.name)
            || (!candidate.is_ascii() && candidate.to_lowercase() == self.name.to_lowercase())
    }
}

/// Ordered set of key names. Declaration order is lookup priority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<KeyName>", into = "Vec<KeyName>")]
pub struct KeyNames(Vec<KeyName>);

impl KeyNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a name. A name already present with the same spelling keeps
    /// its earlier position and rule.
    pub fn add(&mut self, name: KeyName) {
        if !self.0.iter().any(|existing| existing.name == name.name) {
            self.0.push(name);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyName> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<KeyName> for KeyNames {
    fn from_iter<I: IntoIterator<Item = KeyName>>(iter: I) -> Self {
        let mut names = KeyNames::new();
        for name in iter {
            names.add(name);
        }
        names
    }
}

impl From<Vec<KeyName>> for KeyNames {
    fn from(names: Vec<KeyName>) -> Self {
        names.into_iter().collect()
    }
}

impl From<KeyNames> for Vec<KeyName> {
    fn from(names: KeyNames) -> Self {
        names.0
    }
}

/// Errors raised when a configuration cannot be installed.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ApiKeyConfigError {
    /// Neither header nor query lookup is enabled.
    #[display("API key configuration enables neither header nor query lookup")]
    NoLookupEnabled,

    /// `Authorization` lookup has no scheme token to compare against.
    #[display("API key configuration uses the Authorization header without a scheme token")]
    MissingAuthorizationScheme,

    /// Header lookup is enabled but no header names are declared.
    #[display("API key configuration enables header lookup without header names")]
    NoHeaderKeys,

    /// Query lookup is enabled but no parameter names are declared.
    #[display("API key configuration enables query lookup without parameter names")]
    NoQueryKeys,

    /// A declared header or parameter name is empty.
    #[display("API key configuration declares an empty {location} name")]
    EmptyKeyName { location: &'static str },

    /// A case-sensitive header name that no request can carry. Header names
    /// reach the scheme lowercased, so exact matches need a lowercase name.
    #[display("case-sensitive header name {name:?} must be lowercase ASCII")]
    UnmatchableHeaderKey { name: String },

    /// The `Authorization` scheme token contains whitespace.
    #[display("authorization scheme {scheme:?} must be a single token")]
    InvalidAuthorizationScheme { scheme: String },

    /// The authentication scheme name is empty.
    #[display("authentication scheme name must not be empty")]
    EmptySchemeName,

    /// The authentication scheme name cannot be sent in a response header.
    #[display("authentication scheme name {name:?} is not a valid header value")]
    InvalidSchemeName { name: String },
}

/// Configuration for API Key authentication.
///
/// Header lookup is tried before query lookup. Within a location class, names
/// are tried in the order they were declared and the first match wins.
///
/// # Example
///
/// ```
/// use actix_apikey_core::http::security::api_key::ApiKeyConfig;
///
/// let config = ApiKeyConfig::new()
///     .allow_query_lookup(false)
///     .header_key("ApiKey")
///     .add_header_key("x-tenant-key", true);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.get_header_keys().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKeyConfig {
    allow_header_lookup: bool,
    allow_query_lookup: bool,
    header_keys: KeyNames,
    query_keys: KeyNames,
    use_authorization_header: bool,
    authorization_scheme: String,
    use_scheme_name_as_token: bool,
}

impl Default for ApiKeyConfig {
    fn default() -> Self {
        Self {
            allow_header_lookup: true,
            allow_query_lookup: true,
            header_keys: std::iter::once(KeyName::new(DEFAULT_HEADER_KEY)).collect(),
            query_keys: std::iter::once(KeyName::new(DEFAULT_QUERY_KEY)).collect(),
            use_authorization_header: false,
            authorization_scheme: DEFAULT_AUTHORIZATION_SCHEME.to_string(),
            use_scheme_name_as_token: false,
        }
    }
}

impl ApiKeyConfig {
    /// Creates a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables looking for the key in request headers.
    pub fn allow_header_lookup(mut self, allow: bool) -> Self {
        self.allow_header_lookup = allow;
        self
    }

    /// Enables or disables looking for the key in query parameters.
    pub fn allow_query_lookup(mut self, allow: bool) -> Self {
        self.allow_query_lookup = allow;
        self
    }

    /// Adds a case-insensitive header name after the existing ones.
    pub fn header_key(self, name: impl Into<String>) -> Self {
        self.add_header_key(name, false)
    }

    /// Adds a header name with an explicit matching rule.
    pub fn add_header_key(mut self, name: impl Into<String>, case_sensitive: bool) -> Self {
        self.header_keys.add(KeyName::with_case(name, case_sensitive));
        self
    }

    /// Replaces every header name, defaults included.
    pub fn header_keys(mut self, names: impl IntoIterator<Item = KeyName>) -> Self {
        self.header_keys = names.into_iter().collect();
        self
    }

    /// Adds a case-insensitive query parameter name after the existing ones.
    pub fn query_key(self, name: impl Into<String>) -> Self {
        self.add_query_key(name, false)
    }

    /// Adds a query parameter name with an explicit matching rule.
    pub fn add_query_key(mut self, name: impl Into<String>, case_sensitive: bool) -> Self {
        self.query_keys.add(KeyName::with_case(name, case_sensitive));
        self
    }

    /// Replaces every query parameter name, defaults included.
    pub fn query_keys(mut self, names: impl IntoIterator<Item = KeyName>) -> Self {
        self.query_keys = names.into_iter().collect();
        self
    }

    /// Reads the key from `Authorization: <scheme> <key>` instead of the
    /// named headers.
    pub fn use_authorization_header(mut self, enabled: bool) -> Self {
        self.use_authorization_header = enabled;
        self
    }

    /// Sets the scheme token expected in the `Authorization` header.
    pub fn authorization_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.authorization_scheme = scheme.into();
        self
    }

    /// Expects the authentication scheme's own name as the `Authorization`
    /// token instead of [`authorization_scheme`](Self::authorization_scheme).
    pub fn use_scheme_name_as_token(mut self, enabled: bool) -> Self {
        self.use_scheme_name_as_token = enabled;
        self
    }

    pub fn is_header_lookup_allowed(&self) -> bool {
        self.allow_header_lookup
    }

    pub fn is_query_lookup_allowed(&self) -> bool {
        self.allow_query_lookup
    }

    pub fn get_header_keys(&self) -> &KeyNames {
        &self.header_keys
    }

    pub fn get_query_keys(&self) -> &KeyNames {
        &self.query_keys
    }

    pub fn uses_authorization_header(&self) -> bool {
        self.use_authorization_header
    }

    pub fn get_authorization_scheme(&self) -> &str {
        &self.authorization_scheme
    }

    pub fn uses_scheme_name_as_token(&self) -> bool {
        self.use_scheme_name_as_token
    }

    /// The token an `Authorization` header must carry for the given scheme.
    pub fn expected_token<'a>(&'a self, scheme_name: &'a str) -> &'a str {
        if self.use_scheme_name_as_token {
            scheme_name
        } else {
            &self.authorization_scheme
        }
    }

    /// Checks that the configuration can ever produce a success.
    pub fn validate(&self) -> Result<(), ApiKeyConfigError> {
        if !self.allow_header_lookup && !self.allow_query_lookup {
            return Err(ApiKeyConfigError::NoLookupEnabled);
        }

        if self.allow_header_lookup {
            if self.use_authorization_header {
                if !self.use_scheme_name_as_token {
                    let scheme = &self.authorization_scheme;
                    if scheme.trim().is_empty() {
                        return Err(ApiKeyConfigError::MissingAuthorizationScheme);
                    }
                    if scheme.chars().any(char::is_whitespace) {
                        return Err(ApiKeyConfigError::InvalidAuthorizationScheme {
                            scheme: scheme.clone(),
                        });
                    }
                }
            } else {
                if self.header_keys.is_empty() {
                    return Err(ApiKeyConfigError::NoHeaderKeys);
                }
                if self.header_keys.iter().any(KeyName::is_blank) {
                    return Err(ApiKeyConfigError::EmptyKeyName { location: "header" });
                }
                if let Some(key) = self
                    .header_keys
                    .iter()
                    .find(|k| k.case_sensitive && !is_lowercase_ascii(&k.name))
                {
                    return Err(ApiKeyConfigError::UnmatchableHeaderKey {
                        name: key.name.clone(),
                    });
                }
            }
        }

        if self.allow_query_lookup {
            if self.query_keys.is_empty() {
                return Err(ApiKeyConfigError::NoQueryKeys);
            }
            if self.query_keys.iter().any(KeyName::is_blank) {
                return Err(ApiKeyConfigError::EmptyKeyName {
                    location: "query parameter",
                });
            }
        }

        Ok(())
    }
}

fn is_lowercase_ascii(name: &str) -> bool {
    name.bytes().all(|b| b.is_ascii() && !b.is_ascii_uppercase())
}
