//! Execution of ordering instructions over in-memory data

use crate::core::sort::{SortDirection, SortInstruction};
use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use uuid::Uuid;

/// Comparable value of one physical property
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum OrderKey<'a> {
    Text(&'a str),
    Date(Option<DateTime<Utc>>),
    Id(Uuid),
}

/// A stored type whose physical properties can be ordered by name
pub trait Orderable {
    /// Name used in error messages
    const TYPE_NAME: &'static str;

    /// Value of a physical property, matched case-insensitively
    fn order_key(&self, property: &str) -> Option<OrderKey<'_>>;

    /// Whether the type has an orderable property with this name
    fn has_property(property: &str) -> bool;
}

/// Sort items by instructions, first instruction most significant
///
/// The sort is stable, so an empty instruction list keeps the input order.
/// Unknown properties are rejected before anything is reordered.
pub fn apply_ordering<T: Orderable>(items: &mut [T], instructions: &[SortInstruction]) -> Result<()> {
    if let Some(unknown) = instructions
        .iter()
        .find(|instruction| !T::has_property(&instruction.property))
    {
        return Err(anyhow!(
            "Property '{}' cannot be ordered on '{}'",
            unknown.property,
            T::TYPE_NAME
        ));
    }

    items.sort_by(|a, b| {
        instructions
            .iter()
            .map(|instruction| {
                let ordering = a
                    .order_key(&instruction.property)
                    .cmp(&b.order_key(&instruction.property));
                match instruction.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            })
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });

    Ok(())
}
