//! Inbound acceptance policies.
//!
//! Both default to the permissive behavior: any sender origin, any URL.

// ============================================================================
// Imports
// ============================================================================

use regex::Regex;
use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// OriginPattern
// ============================================================================

/// One entry of an origin allow-list.
///
/// Either an exact origin (`https://example.com`, normalized through
/// [`Url`]) or a subdomain wildcard (`https://*.example.com`, which does not
/// match the bare `https://example.com`).
#[derive(Debug, Clone)]
pub struct OriginPattern {
    raw: String,
    matcher: Matcher,
}

#[derive(Debug, Clone)]
enum Matcher {
    Exact(String),
    Wildcard(Regex),
}

impl OriginPattern {
    /// Parses a pattern.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the pattern is not an http(s) origin
    /// - [`Error::Pattern`] if the wildcard cannot be compiled
    pub fn parse(pattern: &str) -> Result<Self> {
        let pattern = pattern.trim();
        let matcher = if pattern.contains('*') {
            Self::compile_wildcard(pattern)?
        } else {
            Matcher::Exact(Self::normalize(pattern)?)
        };

        Ok(Self {
            raw: pattern.to_string(),
            matcher,
        })
    }

    /// Returns the pattern as written.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns `true` if `origin` matches.
    #[must_use]
    pub fn matches(&self, origin: &str) -> bool {
        match &self.matcher {
            Matcher::Exact(expected) => origin == expected,
            Matcher::Wildcard(regex) => regex.is_match(origin),
        }
    }

    fn normalize(pattern: &str) -> Result<String> {
        let url = Url::parse(pattern)
            .map_err(|e| Error::config(format!("invalid origin {pattern:?}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "origin {pattern:?} must use http or https"
            )));
        }
        Ok(url.origin().ascii_serialization())
    }

    fn compile_wildcard(pattern: &str) -> Result<Matcher> {
        let Some((scheme, host)) = pattern.split_once("://") else {
            return Err(Error::config(format!("invalid origin {pattern:?}")));
        };
        if !host.starts_with("*.") || host[2..].contains('*') {
            return Err(Error::config(format!(
                "wildcard must be a leading subdomain label in {pattern:?}"
            )));
        }
        // Normalized with the wildcard filled in: paths and default ports drop out.
        let normalized = Self::normalize(&format!("{scheme}://wildcard.{}", &host[2..]))?;
        let Some((scheme, suffix)) = normalized.split_once("://wildcard.") else {
            return Err(Error::config(format!("invalid origin {pattern:?}")));
        };

        let suffix = regex::escape(suffix);
        let scheme = regex::escape(scheme);
        let regex = Regex::new(&format!(
            r"^{scheme}://[a-z0-9-]+(?:\.[a-z0-9-]+)*\.{suffix}$"
        ))?;
        Ok(Matcher::Wildcard(regex))
    }
}

// ============================================================================
// OriginPolicy
// ============================================================================

/// Which sender origins may open the modal over the cross-frame channel.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "Option<Vec<String>>")]
pub enum OriginPolicy {
    /// Accept every origin.
    #[default]
    Any,
    /// Accept only origins matching one of the patterns.
    AllowList(Vec<OriginPattern>),
}

impl OriginPolicy {
    /// Builds an allow-list.
    ///
    /// # Errors
    ///
    /// Fails on the first pattern [`OriginPattern::parse`] rejects.
    pub fn allow_list<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| OriginPattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::AllowList(patterns))
    }

    /// Returns `true` if `origin` is accepted.
    #[must_use]
    pub fn allows(&self, origin: &str) -> bool {
        match self {
            Self::Any => true,
            Self::AllowList(patterns) => patterns.iter().any(|p| p.matches(origin)),
        }
    }

    /// Checks `origin`.
    ///
    /// # Errors
    ///
    /// - [`Error::OriginRejected`] if the origin is not accepted
    pub fn check(&self, origin: &str) -> Result<()> {
        if self.allows(origin) {
            Ok(())
        } else {
            Err(Error::origin_rejected(origin))
        }
    }
}

impl TryFrom<Option<Vec<String>>> for OriginPolicy {
    type Error = Error;

    fn try_from(value: Option<Vec<String>>) -> Result<Self> {
        match value {
            None => Ok(Self::Any),
            Some(patterns) => Self::allow_list(patterns),
        }
    }
}

// ============================================================================
// UrlPolicy
// ============================================================================

/// What the host accepts as a URL to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UrlPolicy {
    /// No validation; the URL is loaded as given.
    #[default]
    Opaque,
    /// Absolute `http` or `https` URLs only.
    HttpOnly,
}

impl UrlPolicy {
    /// Checks `url`.
    ///
    /// # Errors
    ///
    /// - [`Error::UrlRejected`] if the policy refuses the URL
    pub fn check(self, url: &str) -> Result<()> {
        match self {
            Self::Opaque => Ok(()),
            Self::HttpOnly => {
                let parsed = Url::parse(url).map_err(|e| Error::url_rejected(url, e.to_string()))?;
                if matches!(parsed.scheme(), "http" | "https") {
                    Ok(())
                } else {
                    Err(Error::url_rejected(
                        url,
                        format!("scheme {} not allowed", parsed.scheme()),
                    ))
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
