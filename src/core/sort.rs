//! Sort expression builder
//!
//! Parses client sort specifications such as `"name desc, age"` and resolves
//! them through a [`MappingTable`] into ordering instructions on physical
//! properties. Execution is left to the repository.

use crate::core::error::ValidationError;
use crate::core::mapping::MappingTable;
use serde::Serialize;
use std::fmt;

/// Sort direction of one ordering instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn from_descending(descending: bool) -> Self {
        if descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }

    pub fn is_descending(self) -> bool {
        self == SortDirection::Descending
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ascending"),
            SortDirection::Descending => write!(f, "descending"),
        }
    }
}

/// Ordering instruction on a physical property
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortInstruction {
    pub property: String,
    pub direction: SortDirection,
}

impl SortInstruction {
    pub fn new(property: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }
}

impl fmt::Display for SortInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.property, self.direction)
    }
}

/// One client clause before mapping resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortClause {
    pub logical_name: String,
    pub descending: bool,
}

/// Split a sort specification into clauses, left to right
///
/// Each clause is trimmed and split at its first interior space into a
/// logical name and a direction token. Only `desc` (any case) selects
/// descending order. Empty clauses are skipped.
pub fn parse_sort_clauses(spec: &str) -> Vec<SortClause> {
    spec.split(',')
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .map(|clause| match clause.split_once(' ') {
            Some((name, direction)) => SortClause {
                logical_name: name.to_string(),
                descending: direction.trim().eq_ignore_ascii_case("desc"),
            },
            None => SortClause {
                logical_name: clause.to_string(),
                descending: false,
            },
        })
        .collect()
}

/// Build ordering instructions for a sort specification
///
/// Every clause expands to one instruction per physical property of its
/// mapping entry, all sharing `requested XOR revert` as direction. A blank
/// specification yields no instructions.
///
/// # Example
/// ```rust,ignore
/// // Name -> [FirstName, LastName], Age -> [DateOfBirth] (revert)
/// let instructions = build_sort_instructions("name desc,age", &table)?;
/// // [FirstName descending, LastName descending, DateOfBirth descending]
/// ```
pub fn build_sort_instructions(
    spec: &str,
    table: &MappingTable,
) -> Result<Vec<SortInstruction>, ValidationError> {
    let mut instructions = Vec::new();

    for clause in parse_sort_clauses(spec) {
        let entry = table
            .get(&clause.logical_name)
            .ok_or_else(|| ValidationError::UnknownSortProperty {
                property: clause.logical_name.clone(),
            })?;

        let direction = SortDirection::from_descending(clause.descending ^ entry.revert());
        instructions.extend(
            entry
                .physical_names()
                .iter()
                .map(|property| SortInstruction::new(property.clone(), direction)),
        );
    }

    Ok(instructions)
}

#[cfg(test)]
mod tests {
    use super::SortDirection::{Ascending, Descending};
    use super::*;
    use crate::core::mapping::MappingEntry;

    fn table() -> MappingTable {
        MappingTable::new()
            .with_entry(MappingEntry::new("Name", ["FirstName", "LastName"], false).unwrap())
            .with_entry(MappingEntry::new("Age", ["DateOfBirth"], true).unwrap())
            .with_entry(MappingEntry::new("MainCategory", ["MainCategory"], false).unwrap())
    }

    #[test]
    fn test_default_order_expands_name() {
        let instructions = build_sort_instructions("Name", &table()).unwrap();
        assert_eq!(
            instructions,
            vec![
                SortInstruction::new("FirstName", Ascending),
                SortInstruction::new("LastName", Ascending),
            ]
        );
    }

    #[test]
    fn test_revert_inverts_requested_direction() {
        let asc = build_sort_instructions("age", &table()).unwrap();
        assert_eq!(asc, vec![SortInstruction::new("DateOfBirth", Descending)]);

        let desc = build_sort_instructions("age desc", &table()).unwrap();
        assert_eq!(desc, vec![SortInstruction::new("DateOfBirth", Ascending)]);
    }

    #[test]
    fn test_clause_order_is_preserved() {
        let instructions = build_sort_instructions("name desc,age", &table()).unwrap();
        assert_eq!(
            instructions,
            vec![
                SortInstruction::new("FirstName", Descending),
                SortInstruction::new("LastName", Descending),
                SortInstruction::new("DateOfBirth", Descending),
            ]
        );
    }

    #[test]
    fn test_blank_spec_yields_nothing() {
        assert!(build_sort_instructions("", &table()).unwrap().is_empty());
        assert!(build_sort_instructions("  ", &table()).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_property_is_named() {
        let err = build_sort_instructions("mainCategory, rating desc", &table()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownSortProperty {
                property: "rating".to_string()
            }
        );
    }

    #[test]
    fn test_direction_token_ignores_case_and_padding() {
        let instructions = build_sort_instructions("  maincategory   DESC ", &table()).unwrap();
        assert_eq!(instructions, vec![SortInstruction::new("MainCategory", Descending)]);
    }

    #[test]
    fn test_parse_skips_empty_clauses() {
        let clauses = parse_sort_clauses("name,, age desc,");
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[1].logical_name, "age");
        assert!(clauses[1].descending);
    }

    #[test]
    fn test_instruction_display() {
        let instruction = SortInstruction::new("DateOfBirth", Descending);
        assert_eq!(instruction.to_string(), "DateOfBirth descending");
    }
}
