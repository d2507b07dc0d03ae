//! Property mapping registry
//!
//! Translates the logical, client-facing property names of an output shape
//! into the physical property names of its storage shape. Tables are built
//! once at startup and shared read-only between requests.

use crate::core::error::ConfigError;
use crate::core::shaping::Shape;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Target of a single logical property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    logical_name: String,
    physical_names: Vec<String>,
    revert: bool,
}

impl MappingEntry {
    /// Create an entry; at least one physical property is required
    pub fn new<I, S>(
        logical_name: impl Into<String>,
        physical_names: I,
        revert: bool,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let logical_name = logical_name.into();
        let physical_names: Vec<String> = physical_names.into_iter().map(Into::into).collect();

        if physical_names.is_empty() {
            return Err(ConfigError::EmptyMapping { logical_name });
        }

        Ok(Self {
            logical_name,
            physical_names,
            revert,
        })
    }

    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    /// Physical properties in declaration order, never empty
    pub fn physical_names(&self) -> &[String] {
        &self.physical_names
    }

    /// Whether the requested direction is inverted on the physical properties
    pub fn revert(&self) -> bool {
        self.revert
    }
}

/// Mapping table for one (source shape, destination shape) pair
///
/// Logical names are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: HashMap<String, MappingEntry>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, replacing any entry with the same logical name
    pub fn with_entry(mut self, entry: MappingEntry) -> Self {
        self.insert(entry);
        self
    }

    pub fn insert(&mut self, entry: MappingEntry) {
        self.entries
            .insert(entry.logical_name.to_lowercase(), entry);
    }

    pub fn get(&self, logical_name: &str) -> Option<&MappingEntry> {
        self.entries.get(&logical_name.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Case-insensitive membership check used before sorting or shaping
pub fn contains_logical_name(table: &MappingTable, name: &str) -> bool {
    table.get(name).is_some()
}

/// Check that every clause of a sort specification has a mapping entry
///
/// A blank specification is valid: the storage default order applies.
pub fn valid_mapping_exists_for(table: &MappingTable, sort_spec: &str) -> bool {
    crate::core::sort::parse_sort_clauses(sort_spec)
        .iter()
        .all(|clause| contains_logical_name(table, &clause.logical_name))
}

/// Declarative form of a mapping table, as found in configuration files
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MappingConfig {
    /// Client-facing shape name (e.g., "AuthorDto")
    pub source: String,

    /// Storage shape name (e.g., "Author")
    pub destination: String,

    /// Logical property definitions
    pub properties: Vec<PropertyMappingConfig>,
}

/// One logical property inside a [`MappingConfig`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyMappingConfig {
    pub name: String,
    pub targets: Vec<String>,
    #[serde(default)]
    pub revert: bool,
}

impl MappingConfig {
    /// Build the runtime table, rejecting entries without targets
    pub fn to_table(&self) -> Result<MappingTable, ConfigError> {
        let mut table = MappingTable::new();
        for property in &self.properties {
            table.insert(MappingEntry::new(
                property.name.clone(),
                property.targets.iter().cloned(),
                property.revert,
            )?);
        }
        Ok(table)
    }
}

/// Storage-side type that mapping tables translate into
pub trait MappingTarget {
    /// Name used as the destination of a mapping table
    const TARGET_NAME: &'static str;
}

/// Registry of mapping tables keyed by shape pair
///
/// Immutable once handed to the server; clone the `Arc` holding it to share.
#[derive(Debug, Clone, Default)]
pub struct PropertyMappingRegistry {
    tables: HashMap<(String, String), MappingTable>,
}

impl PropertyMappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table for a shape pair given by type
    pub fn register<S: Shape, D: MappingTarget>(self, table: MappingTable) -> Self {
        self.register_named(S::SHAPE_NAME, D::TARGET_NAME, table)
    }

    /// Register a table for a shape pair given by name
    pub fn register_named(
        mut self,
        source: impl Into<String>,
        destination: impl Into<String>,
        table: MappingTable,
    ) -> Self {
        let key = (source.into(), destination.into());
        tracing::debug!(
            source = %key.0,
            destination = %key.1,
            entries = table.len(),
            "registered property mapping"
        );
        self.tables.insert(key, table);
        self
    }

    /// Register every table declared in configuration
    pub fn register_configs(mut self, configs: &[MappingConfig]) -> Result<Self, ConfigError> {
        for config in configs {
            let table = config.to_table()?;
            self = self.register_named(config.source.clone(), config.destination.clone(), table);
        }
        Ok(self)
    }

    /// Look up the table for a shape pair given by type
    pub fn lookup<S: Shape, D: MappingTarget>(&self) -> Result<&MappingTable, ConfigError> {
        self.lookup_named(S::SHAPE_NAME, D::TARGET_NAME)
    }

    /// Look up the table for a shape pair given by name
    pub fn lookup_named(&self, source: &str, destination: &str) -> Result<&MappingTable, ConfigError> {
        self.tables
            .get(&(source.to_string(), destination.to_string()))
            .ok_or_else(|| ConfigError::MissingMapping {
                source: source.to_string(),
                destination: destination.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
