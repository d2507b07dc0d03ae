//! Server host holding the shared application state
//!
//! The host is built once at startup and shared read-only by every request
//! through an `Arc`. Nothing in it is mutated after construction except the
//! repository's own storage.

use crate::config::AppConfig;
use crate::core::error::ConfigError;
use crate::core::mapping::PropertyMappingRegistry;
use crate::core::negotiation::RepresentationNegotiator;
use crate::core::service::CourseLibraryRepository;
use crate::entities::{Author, AuthorDto};
use crate::links::RouteRegistry;
use std::sync::Arc;

/// Resource kind used in author vendor media types
pub const AUTHOR_RESOURCE: &str = "author";

/// Vendor input type of an author created with a date of death
pub const AUTHOR_WITH_DATE_OF_DEATH_INPUT: &str = "authorforcreationwithdateofdeath";

/// Host context containing all server state
///
/// # Example
///
/// ```rust,ignore
/// let host = ServerHost::from_builder_components(
///     config,
///     Arc::new(InMemoryCourseLibraryRepository::seeded()),
///     mappings,
/// )?;
/// let app = RestExposure::build_router(Arc::new(host), Vec::new());
/// ```
pub struct ServerHost {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Storage collaborator
    pub repository: Arc<dyn CourseLibraryRepository>,

    /// Property mapping tables, immutable after startup
    pub mappings: Arc<PropertyMappingRegistry>,

    /// Named routes used to resolve link URIs
    pub routes: Arc<RouteRegistry>,

    /// Media type negotiation for author representations
    pub author_negotiator: Arc<RepresentationNegotiator>,
}

impl ServerHost {
    /// Build the host from builder components
    ///
    /// Fails when the base URL is unusable or when a mapping table the
    /// handlers depend on is missing; both are startup defects.
    pub fn from_builder_components(
        config: AppConfig,
        repository: Arc<dyn CourseLibraryRepository>,
        mappings: PropertyMappingRegistry,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        mappings.lookup::<AuthorDto, Author>()?;

        let routes = RouteRegistry::course_library(&config.server.base_url())?;
        let author_negotiator =
            RepresentationNegotiator::for_resource(&config.media.namespace, AUTHOR_RESOURCE);

        tracing::info!(
            base_url = %routes.base_url(),
            mappings = mappings.len(),
            namespace = %config.media.namespace,
            "server host ready"
        );

        Ok(Self {
            config: Arc::new(config),
            repository,
            mappings: Arc::new(mappings),
            routes: Arc::new(routes),
            author_negotiator: Arc::new(author_negotiator),
        })
    }
}
