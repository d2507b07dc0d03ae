//! # Course Library
//!
//! A REST resource server for authors and their courses, built around a
//! small representation pipeline.
//!
//! ## Features
//!
//! - **Data Shaping**: Clients pick a subset of fields with `?fields=`
//! - **Sort Mapping**: `?orderBy=` names output properties, mapped onto
//!   stored properties with optional direction reversal
//! - **Paging**: `X-Pagination` metadata with previous/next page URIs
//! - **Content Negotiation**: Vendor media types select the representation
//!   variant and toggle hypermedia links
//! - **Hypermedia Links**: Resources and collection pages carry `links`
//! - **Configuration-Based**: Server, paging and extra mappings from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use course_library::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_config(AppConfig::from_yaml_file("config.yaml")?)
//!         .with_repository(InMemoryCourseLibraryRepository::seeded())
//!         .serve("127.0.0.1:3000")
//!         .await
//! }
//! ```
//!
//! ```text
//! GET /api/authors?mainCategory=Rum&orderBy=age desc&fields=id,name
//! Accept: application/vnd.example.hateoas+json
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod links;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{ApiError, ApiResult, ConfigError, EntityError, RequestError, ValidationError},
        mapping::{
            MappingEntry, MappingTable, MappingTarget, PropertyMappingRegistry,
            valid_mapping_exists_for,
        },
        negotiation::{MediaTypeSelection, RepresentationNegotiator, Variant},
        query::{PageState, PagedList, PaginationMetadata, ResourceUriType},
        service::{AuthorFilter, CourseLibraryRepository},
        shaping::{FieldSelection, Shape, ShapedRecord, fields_are_valid, shape, shape_collection},
        sort::{SortDirection, SortInstruction, build_sort_instructions},
    };

    // === Macros ===
    pub use crate::impl_shape;

    // === Entities ===
    pub use crate::entities::{
        Author, AuthorDto, AuthorForCreationDto, AuthorForCreationWithDateOfDeathDto, AuthorFullDto,
        AuthorsQuery, AuthorsResourceParameters,
        Course, CourseDto, CourseForCreationDto, CourseForUpdateDto,
    };

    // === Links ===
    pub use crate::links::{
        Link, LinkedCollection, LinkedResource, PageableQuery, RouteRegistry, RouteValues,
        UriResolver, routes,
    };

    // === Storage ===
    pub use crate::storage::InMemoryCourseLibraryRepository;

    // === Config ===
    pub use crate::config::{AppConfig, MediaConfig, PagingConfig, ServerConfig};

    // === Server ===
    pub use crate::server::{RestExposure, ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
