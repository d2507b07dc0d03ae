//! Route registry for URI resolution
//!
//! Maps route names to path templates such as `/api/authors/{authorId}` and
//! resolves them against a base URL. Template placeholders are filled from
//! route values; values that fill no placeholder become query parameters in
//! insertion order.

use crate::core::error::ConfigError;
use indexmap::IndexMap;
use std::collections::HashMap;
use url::Url;

/// Route names known to the course library
pub mod routes {
    pub const GET_ROOT: &str = "GetRoot";
    pub const GET_AUTHORS: &str = "GetAuthors";
    pub const GET_AUTHOR: &str = "GetAuthor";
    pub const CREATE_AUTHOR: &str = "CreateAuthor";
    pub const GET_AUTHOR_COLLECTION: &str = "GetAuthorCollection";
    pub const CREATE_AUTHOR_COLLECTION: &str = "CreateAuthorCollection";
    pub const GET_COURSES_FOR_AUTHOR: &str = "GetCoursesForAuthor";
    pub const CREATE_COURSE_FOR_AUTHOR: &str = "CreateCourseForAuthor";
    pub const GET_COURSE_FOR_AUTHOR: &str = "GetCourseForAuthor";
}

/// Ordered route values
///
/// Names are matched against template placeholders case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteValues {
    values: IndexMap<String, String>,
}

impl RouteValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.values.insert(name.into(), value.to_string());
        self
    }

    /// Add a value only when present
    pub fn with_opt<V: ToString>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.find(name).map(|(_, value)| value)
    }

    fn find(&self, name: &str) -> Option<(&str, &str)> {
        self.values
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// URI resolution capability used by the link builder
pub trait UriResolver: Send + Sync {
    /// Absolute URI for a named route, or `None` when the route is unknown
    /// or a placeholder has no value
    fn resolve_uri(&self, route: &str, values: &RouteValues) -> Option<String>;
}

/// Registry of named route templates under one base URL
#[derive(Debug, Clone)]
pub struct RouteRegistry {
    base_url: Url,
    templates: HashMap<String, String>,
}

impl RouteRegistry {
    /// Create an empty registry; the base URL must be hierarchical
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url).map_err(|e| ConfigError::InvalidValue {
            field: "server.base_url".to_string(),
            value: base_url.to_string(),
            message: e.to_string(),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                field: "server.base_url".to_string(),
                value: base_url.to_string(),
                message: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            base_url,
            templates: HashMap::new(),
        })
    }

    /// Registry with every course library route
    pub fn course_library(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(base_url)?
            .with_route(routes::GET_ROOT, "/api")
            .with_route(routes::GET_AUTHORS, "/api/authors")
            .with_route(routes::GET_AUTHOR, "/api/authors/{authorId}")
            .with_route(routes::CREATE_AUTHOR, "/api/authors")
            .with_route(routes::GET_AUTHOR_COLLECTION, "/api/authorcollections/({authorIds})")
            .with_route(routes::CREATE_AUTHOR_COLLECTION, "/api/authorcollections")
            .with_route(routes::GET_COURSES_FOR_AUTHOR, "/api/authors/{authorId}/courses")
            .with_route(routes::CREATE_COURSE_FOR_AUTHOR, "/api/authors/{authorId}/courses")
            .with_route(
                routes::GET_COURSE_FOR_AUTHOR,
                "/api/authors/{authorId}/courses/{courseId}",
            ))
    }

    pub fn with_route(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(name.into(), template.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Template registered for a route
    pub fn template(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }

    /// Route names, sorted
    pub fn route_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Substitute `{name}` placeholders of one path segment
fn fill_segment<'a>(
    segment: &str,
    values: &'a RouteValues,
    used: &mut Vec<&'a str>,
) -> Option<String> {
    let mut filled = String::with_capacity(segment.len());
    let mut rest = segment;

    while let Some(start) = rest.find('{') {
        let end = start + rest[start..].find('}')?;
        filled.push_str(&rest[..start]);

        let (key, value) = values.find(&rest[start + 1..end])?;
        filled.push_str(value);
        used.push(key);

        rest = &rest[end + 1..];
    }

    filled.push_str(rest);
    Some(filled)
}

impl UriResolver for RouteRegistry {
    fn resolve_uri(&self, route: &str, values: &RouteValues) -> Option<String> {
        let template = self.templates.get(route)?;
        let mut url = self.base_url.clone();
        let mut used = Vec::new();

        {
            let mut segments = url.path_segments_mut().ok()?;
            segments.pop_if_empty();
            for segment in template.split('/').filter(|s| !s.is_empty()) {
                segments.push(&fill_segment(segment, values, &mut used)?);
            }
        }

        let mut query = values
            .iter()
            .filter(|(key, _)| !used.contains(key))
            .peekable();
        if query.peek().is_some() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Some(url.to_string())
    }
}
