//! Import specifier parsing.
//!
//! Splits an import id into its base path and query parameters. Parsing follows
//! `application/x-www-form-urlencoded` rules and is deliberately permissive:
//! empty pairs are skipped, `=` is optional, and `+` decodes to a space. The
//! only rejected input is percent-encoding that decodes to invalid UTF-8.

use percent_encoding::percent_decode_str;

use crate::error::VirtualError;
use crate::kind::ContentKind;

/// A parsed import specifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Specifier<'a> {
    base: &'a str,
    query: Vec<(String, String)>,
}

impl<'a> Specifier<'a> {
    /// Parse `id` into base and query.
    ///
    /// Only the text between the first and second `?` is treated as the query;
    /// anything after a second `?` is ignored.
    pub fn parse(id: &'a str) -> Result<Self, VirtualError> {
        let Some((base, rest)) = id.split_once('?') else {
            return Ok(Self {
                base: id,
                query: Vec::new(),
            });
        };
        let raw_query = rest.split('?').next().unwrap_or_default();

        let query = raw_query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                Ok((decode(key, id)?, decode(value, id)?))
            })
            .collect::<Result<_, VirtualError>>()?;

        Ok(Self { base, query })
    }

    /// Base path with the query removed.
    #[must_use]
    pub fn base(&self) -> &'a str {
        self.base
    }

    /// Decoded query pairs in order of appearance.
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Check whether the query contains `key`, with or without a value.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.query.iter().any(|(k, _)| k == key)
    }

    /// First content kind whose marker appears in the query.
    #[must_use]
    pub fn content_kind(&self) -> Option<ContentKind> {
        self.query
            .iter()
            .find_map(|(key, _)| ContentKind::from_marker(key))
    }
}

/// Decode one form-urlencoded component.
fn decode(raw: &str, id: &str) -> Result<String, VirtualError> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| VirtualError::MalformedSpecifier {
            id: id.to_owned(),
            reason: e.to_string(),
        })
}
