//! Core representation pipeline: errors, shaping, sort mapping, paging,
//! media type negotiation and the repository seam

pub mod error;
pub mod mapping;
pub mod negotiation;
pub mod query;
pub mod service;
pub mod shaping;
pub mod sort;

pub use error::{ApiError, ApiResult, ConfigError, EntityError, RequestError, ValidationError};
pub use mapping::{
    MappingConfig, MappingEntry, MappingTable, MappingTarget, PropertyMappingConfig,
    PropertyMappingRegistry, contains_logical_name, valid_mapping_exists_for,
};
pub use negotiation::{
    MediaType, MediaTypeError, MediaTypeSelection, RepresentationNegotiator, Variant,
};
pub use query::{PageState, PagedList, PaginationMetadata, ResourceUriType};
pub use service::{AuthorFilter, CourseLibraryRepository};
pub use shaping::{
    FieldDescriptor, FieldSelection, Shape, ShapedRecord, fields_are_valid, shape,
    shape_collection,
};
pub use sort::{SortDirection, SortInstruction, build_sort_instructions};
