//! Principal produced by a successful authentication.
//!
//! # Spring Equivalent
//! `Authentication` principal / `UserDetails`

use std::collections::BTreeMap;
use std::fmt;

/// An authenticated identity: a name, roles, authorities and free-form claims.
///
/// The validator decides what goes in here; the authentication scheme only
/// records which scheme produced it.
///
/// # Example
/// ```
/// use actix_apikey_core::http::security::User;
///
/// let user = User::new("billing-service")
///     .roles(&["API_USER".into()])
///     .authorities(&["invoices:read".into()])
///     .claim("tenant", "acme");
///
/// assert!(user.has_role("API_USER"));
/// assert_eq!(user.get_claim("tenant"), Some("acme"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    username: String,
    roles: Vec<String>,
    authorities: Vec<String>,
    claims: BTreeMap<String, String>,
    authentication_scheme: Option<String>,
}

impl User {
    /// Creates a principal with the given name and no roles or claims.
    pub fn new(username: impl Into<String>) -> Self {
        User {
            username: username.into(),
            roles: Vec::new(),
            authorities: Vec::new(),
            claims: BTreeMap::new(),
            authentication_scheme: None,
        }
    }

    /// Returns the username.
    pub fn get_username(&self) -> &str {
        &self.username
    }

    /// Returns the user's roles.
    pub fn get_roles(&self) -> &[String] {
        &self.roles
    }

    /// Returns the user's authorities.
    pub fn get_authorities(&self) -> &[String] {
        &self.authorities
    }

    /// Returns all claims.
    pub fn get_claims(&self) -> &BTreeMap<String, String> {
        &self.claims
    }

    /// Returns a single claim value.
    pub fn get_claim(&self, name: &str) -> Option<&str> {
        self.claims.get(name).map(String::as_str)
    }

    /// Returns the name of the scheme that authenticated this user, if any.
    pub fn get_authentication_scheme(&self) -> Option<&str> {
        self.authentication_scheme.as_deref()
    }

    /// Adds roles to the user (builder pattern).
    pub fn roles(mut self, roles: &[String]) -> Self {
        for role in roles {
            if !self.roles.contains(role) {
                self.roles.push(role.clone());
            }
        }
        self
    }

    /// Adds authorities to the user (builder pattern).
    pub fn authorities(mut self, authorities: &[String]) -> Self {
        for authority in authorities {
            if !self.authorities.contains(authority) {
                self.authorities.push(authority.clone());
            }
        }
        self
    }

    /// Sets a claim, replacing any previous value under the same name.
    pub fn claim(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.insert(name.into(), value.into());
        self
    }

    /// Records the scheme that authenticated this user.
    pub fn authenticated_by(mut self, scheme: impl Into<String>) -> Self {
        self.authentication_scheme = Some(scheme.into());
        self
    }

    /// Checks if the user has a specific role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Checks if the user has ANY of the specified roles.
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }

    /// Checks if the user has a specific authority.
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    /// Checks if the user has ANY of the specified authorities.
    pub fn has_any_authority(&self, authorities: &[&str]) -> bool {
        authorities.iter().any(|auth| self.has_authority(auth))
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User {{ username: {}, roles: {:?}, authorities: {:?} }}",
            self.username, self.roles, self.authorities
        )
    }
}
