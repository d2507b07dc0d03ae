//! Hypermedia links
//!
//! This module provides link types, the named route registry that resolves
//! URIs, and the builders that assemble link sets for resources and pages.

pub mod builder;
pub mod link;
pub mod registry;

pub use builder::{
    LinkedResource, PageableQuery, Relation, collection_resource_uri, links_for_collection,
    links_for_resource, root_links,
};
pub use link::{Link, LinkedCollection, with_links};
pub use registry::{RouteRegistry, RouteValues, UriResolver, routes};
