//! ServerBuilder for fluent API to build HTTP servers

use super::host::ServerHost;
use super::exposure::RestExposure;
use crate::config::AppConfig;
use crate::core::mapping::PropertyMappingRegistry;
use crate::core::service::CourseLibraryRepository;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating the course library HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(AppConfig::from_yaml_file("config.yaml")?)
///     .with_repository(InMemoryCourseLibraryRepository::seeded())
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    repository: Option<Arc<dyn CourseLibraryRepository>>,
    mappings: Option<PropertyMappingRegistry>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with the default configuration
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            repository: None,
            mappings: None,
            custom_routes: Vec::new(),
        }
    }

    /// Use the given configuration
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the repository (required)
    pub fn with_repository(mut self, repository: impl CourseLibraryRepository + 'static) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// Set a shared repository (required, alternative to `with_repository`)
    pub fn with_shared_repository(mut self, repository: Arc<dyn CourseLibraryRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Replace the mapping registry derived from configuration
    pub fn with_mapping_registry(mut self, mappings: PropertyMappingRegistry) -> Self {
        self.mappings = Some(mappings);
        self
    }

    /// Add custom routes to the server
    ///
    /// # Example
    ///
    /// ```ignore
    /// let admin_routes = Router::new().route("/admin/reseed", post(reseed));
    ///
    /// ServerBuilder::new()
    ///     .with_repository(repository)
    ///     .with_custom_routes(admin_routes)
    ///     .build()?;
    /// ```
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the shared host
    pub fn build_host(&mut self) -> Result<ServerHost> {
        let repository = self.repository.take().ok_or_else(|| {
            anyhow::anyhow!("CourseLibraryRepository is required. Call .with_repository()")
        })?;

        let mappings = match self.mappings.take() {
            Some(mappings) => mappings,
            None => self.config.mapping_registry()?,
        };

        Ok(ServerHost::from_builder_components(
            self.config.clone(),
            repository,
            mappings,
        )?)
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let host = Arc::new(self.build_host()?);
        let custom_routes = std::mem::take(&mut self.custom_routes);
        Ok(RestExposure::build_router(host, custom_routes))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    ///
    /// # Example
    ///
    /// ```ignore
    /// ServerBuilder::new()
    ///     .with_repository(repository)
    ///     .serve("127.0.0.1:3000").await?;
    /// ```
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
