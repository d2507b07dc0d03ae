//! Representation negotiation
//!
//! Resolves a requested media type to a representation variant and a
//! hypermedia flag. Media types follow a small grammar:
//!
//! ```text
//! media-type = type "/" facet *("." facet) ["+" suffix] *(";" parameter)
//! ```
//!
//! A trailing `hateoas` facet asks for embedded links; the remaining facets
//! form the primary subtype, which selects the variant by exact match.
//!
//! | media type                                          | variant    | links |
//! |-----------------------------------------------------|------------|-------|
//! | `application/json`                                  | `Default`  | no    |
//! | `application/vnd.example.hateoas+json`              | `Default`  | yes   |
//! | `application/vnd.example.author.full+json`          | `Full`     | no    |
//! | `application/vnd.example.author.friendly.hateoas+json` | `Friendly` | yes |

use crate::core::error::ValidationError;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

const HATEOAS_FACET: &str = "hateoas";

/// Why a media type string was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaTypeError {
    #[error("media type is empty")]
    Empty,

    #[error("missing '/' between type and subtype")]
    MissingSeparator,

    #[error("invalid type '{0}'")]
    InvalidType(String),

    #[error("invalid subtype facet '{0}'")]
    InvalidFacet(String),

    #[error("invalid structured suffix '{0}'")]
    InvalidSuffix(String),

    #[error("invalid parameter '{0}'")]
    InvalidParameter(String),
}

/// Parsed media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    pub main_type: String,
    /// Dot-separated subtype facets, e.g. `["vnd", "example", "author", "full"]`
    pub facets: Vec<String>,
    /// Structured syntax suffix after `+`, e.g. `json`
    pub suffix: Option<String>,
    pub parameters: Vec<(String, String)>,
}

fn restricted_name() -> &'static Regex {
    static RESTRICTED_NAME: OnceLock<Regex> = OnceLock::new();
    RESTRICTED_NAME.get_or_init(|| {
        // RFC 6838 restricted-name, without '.' and '+' which the grammar splits on
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9!#$&^_-]{0,126}$")
            .expect("restricted-name pattern is valid")
    })
}

impl MediaType {
    /// Parse a media type string
    pub fn parse(input: &str) -> Result<Self, MediaTypeError> {
        let mut parts = input.split(';');
        let essence = parts.next().map(str::trim).unwrap_or_default();
        if essence.is_empty() {
            return Err(MediaTypeError::Empty);
        }

        let (main_type, subtype) = essence
            .split_once('/')
            .ok_or(MediaTypeError::MissingSeparator)?;

        if !restricted_name().is_match(main_type) {
            return Err(MediaTypeError::InvalidType(main_type.to_string()));
        }

        let (tree, suffix) = match subtype.rsplit_once('+') {
            Some((tree, suffix)) => {
                if !restricted_name().is_match(suffix) {
                    return Err(MediaTypeError::InvalidSuffix(suffix.to_string()));
                }
                (tree, Some(suffix.to_lowercase()))
            }
            None => (subtype, None),
        };

        let facets = tree
            .split('.')
            .map(|facet| {
                if restricted_name().is_match(facet) {
                    Ok(facet.to_string())
                } else {
                    Err(MediaTypeError::InvalidFacet(facet.to_string()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let parameters = parts
            .map(str::trim)
            .filter(|param| !param.is_empty())
            .map(|param| {
                param
                    .split_once('=')
                    .filter(|(name, _)| restricted_name().is_match(name.trim()))
                    .map(|(name, value)| {
                        (
                            name.trim().to_lowercase(),
                            value.trim().trim_matches('"').to_string(),
                        )
                    })
                    .ok_or_else(|| MediaTypeError::InvalidParameter(param.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            main_type: main_type.to_lowercase(),
            facets,
            suffix,
            parameters,
        })
    }

    /// Subtype without its structured suffix
    pub fn subtype_tree(&self) -> String {
        self.facets.join(".")
    }

    /// Whether this is exactly `vnd.<namespace>.<resource>`, ignoring case
    pub fn is_vendor_type(&self, namespace: &str, resource: &str) -> bool {
        self.subtype_tree()
            .eq_ignore_ascii_case(&format!("vnd.{}.{}", namespace, resource))
    }

    /// Whether the last facet requests hypermedia links
    pub fn requests_links(&self) -> bool {
        self.facets
            .last()
            .is_some_and(|facet| facet.eq_ignore_ascii_case(HATEOAS_FACET))
    }

    /// Subtype tree with a trailing `hateoas` facet removed
    pub fn primary_subtype(&self) -> String {
        let facets = if self.requests_links() {
            &self.facets[..self.facets.len() - 1]
        } else {
            &self.facets[..]
        };
        facets.join(".")
    }
}

/// Representation variant of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Default,
    Full,
    Friendly,
}

impl Variant {
    /// Facet naming this variant in vendor media types
    pub fn facet(self) -> Option<&'static str> {
        match self {
            Variant::Default => None,
            Variant::Full => Some("full"),
            Variant::Friendly => Some("friendly"),
        }
    }
}

/// Outcome of negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MediaTypeSelection {
    pub variant: Variant,
    pub include_links: bool,
}

impl Default for MediaTypeSelection {
    fn default() -> Self {
        Self {
            variant: Variant::Default,
            include_links: false,
        }
    }
}

/// Maps primary subtypes to variants for one resource kind
#[derive(Debug, Clone, Default)]
pub struct RepresentationNegotiator {
    variants: HashMap<String, Variant>,
}

impl RepresentationNegotiator {
    /// Negotiator with no vendor variants; everything resolves to `Default`
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `vnd.<namespace>.<resource>.<variant>` for every named variant
    ///
    /// # Example
    /// ```rust,ignore
    /// let negotiator = RepresentationNegotiator::for_resource("example", "author");
    /// // "vnd.example.author.full" -> Full, "vnd.example.author.friendly" -> Friendly
    /// ```
    pub fn for_resource(namespace: &str, resource: &str) -> Self {
        [Variant::Full, Variant::Friendly]
            .into_iter()
            .fold(Self::new(), |negotiator, variant| {
                let facet = variant.facet().unwrap_or_default();
                negotiator.with_variant(format!("vnd.{}.{}.{}", namespace, resource, facet), variant)
            })
    }

    /// Register an exact primary subtype for a variant
    pub fn with_variant(mut self, primary_subtype: impl Into<String>, variant: Variant) -> Self {
        self.variants
            .insert(primary_subtype.into().to_lowercase(), variant);
        self
    }

    /// Resolve a media type string to a variant and link policy
    pub fn negotiate(&self, media_type: &str) -> Result<MediaTypeSelection, ValidationError> {
        let parsed = MediaType::parse(media_type).map_err(|e| ValidationError::InvalidMediaType {
            value: media_type.to_string(),
            message: e.to_string(),
        })?;

        let variant = self
            .variants
            .get(&parsed.primary_subtype().to_lowercase())
            .copied()
            .unwrap_or(Variant::Default);

        Ok(MediaTypeSelection {
            variant,
            include_links: parsed.requests_links(),
        })
    }

    /// Negotiate an optional `Accept` value
    ///
    /// Only the first entry of a list is considered. An absent value, a
    /// blank value or a wildcard range selects the default.
    pub fn negotiate_accept(
        &self,
        accept: Option<&str>,
    ) -> Result<MediaTypeSelection, ValidationError> {
        let first = accept
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .unwrap_or_default();

        if first.is_empty() || first.contains('*') {
            return Ok(MediaTypeSelection::default());
        }
        self.negotiate(first)
    }
}
