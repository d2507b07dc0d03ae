//! Data shaping
//!
//! Projects output objects down to a caller-selected subset of their fields.
//! Every output shape declares its fields once, in order, through the
//! [`Shape`] trait (usually generated by [`impl_shape!`](crate::impl_shape)),
//! so no runtime introspection is needed.

use crate::core::error::ValidationError;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// Declared field of an output shape
pub struct FieldDescriptor<T> {
    /// Canonical field name as it appears in shaped output
    pub name: &'static str,

    /// Reads the field value from an instance
    pub read: fn(&T) -> Value,
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .finish()
    }
}

/// An output shape with a static, ordered field registry
pub trait Shape: Sized + 'static {
    /// Shape name used in error messages and mapping lookups
    const SHAPE_NAME: &'static str;

    /// Declared fields in declaration order
    fn fields() -> &'static [FieldDescriptor<Self>];

    /// Case-insensitive field lookup
    fn field(name: &str) -> Option<&'static FieldDescriptor<Self>> {
        Self::fields()
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
    }
}

/// Serialize a field value for a shaped record
///
/// Values that cannot be represented as JSON become `null`.
pub fn to_field_value<V: Serialize + ?Sized>(value: &V) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Ordered name/value representation of a shaped object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedRecord {
    values: IndexMap<String, Value>,
}

impl ShapedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Field names in record order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Append a trailing field, e.g. the `links` of a hypermedia representation
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values.into_iter().collect())
    }
}

impl Serialize for ShapedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

/// Validated selection of fields for one shape
///
/// Built before any data is touched; shaping with a selection cannot fail.
pub struct FieldSelection<T: Shape> {
    fields: Vec<&'static FieldDescriptor<T>>,
    _shape: PhantomData<fn(&T)>,
}

impl<T: Shape> Clone for FieldSelection<T> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            _shape: PhantomData,
        }
    }
}

impl<T: Shape> fmt::Debug for FieldSelection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSelection")
            .field("shape", &T::SHAPE_NAME)
            .field("fields", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl<T: Shape> FieldSelection<T> {
    /// Every declared field, in declaration order
    pub fn all() -> Self {
        Self {
            fields: T::fields().iter().collect(),
            _shape: PhantomData,
        }
    }

    /// Parse a comma-separated field list
    ///
    /// Entries are trimmed and matched case-insensitively. A missing or
    /// blank list selects every declared field. Selected fields keep
    /// declaration order and appear once.
    pub fn parse(fields: Option<&str>) -> Result<Self, ValidationError> {
        let Some(fields) = fields.filter(|f| !f.trim().is_empty()) else {
            return Ok(Self::all());
        };

        let mut selected = vec![false; T::fields().len()];
        for requested in fields.split(',').map(str::trim) {
            let position = T::fields()
                .iter()
                .position(|field| field.name.eq_ignore_ascii_case(requested))
                .ok_or_else(|| ValidationError::UnknownField {
                    field: requested.to_string(),
                    shape: T::SHAPE_NAME.to_string(),
                })?;
            selected[position] = true;
        }

        Ok(Self {
            fields: T::fields()
                .iter()
                .zip(selected)
                .filter_map(|(field, keep)| keep.then_some(field))
                .collect(),
            _shape: PhantomData,
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name)
    }

    /// Project one object onto the selected fields
    pub fn apply(&self, source: &T) -> ShapedRecord {
        let mut record = ShapedRecord::new();
        for field in &self.fields {
            record.insert(field.name, (field.read)(source));
        }
        record
    }
}

/// Check a field list against a shape without shaping anything
pub fn fields_are_valid<T: Shape>(fields: Option<&str>) -> bool {
    FieldSelection::<T>::parse(fields).is_ok()
}

/// Shape a single object
pub fn shape<T: Shape>(source: &T, fields: Option<&str>) -> Result<ShapedRecord, ValidationError> {
    let selection = FieldSelection::<T>::parse(fields)?;
    Ok(selection.apply(source))
}

/// Shape a sequence of objects lazily
///
/// The field list is validated up front; records are produced one per input
/// element, in input order, as the returned iterator is consumed.
pub fn shape_collection<I, T>(
    source: I,
    fields: Option<&str>,
) -> Result<ShapedIter<I::IntoIter, T>, ValidationError>
where
    I: IntoIterator,
    I::Item: std::borrow::Borrow<T>,
    T: Shape,
{
    let selection = FieldSelection::<T>::parse(fields)?;
    Ok(ShapedIter {
        inner: source.into_iter(),
        selection,
    })
}

/// Iterator returned by [`shape_collection`]
pub struct ShapedIter<I, T: Shape> {
    inner: I,
    selection: FieldSelection<T>,
}

impl<I: Clone, T: Shape> Clone for ShapedIter<I, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            selection: self.selection.clone(),
        }
    }
}

impl<I, T> Iterator for ShapedIter<I, T>
where
    I: Iterator,
    I::Item: std::borrow::Borrow<T>,
    T: Shape,
{
    type Item = ShapedRecord;

    fn next(&mut self) -> Option<Self::Item> {
        use std::borrow::Borrow;
        self.inner
            .next()
            .map(|item| self.selection.apply(item.borrow()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
