//! Course Library Example
//!
//! Serves the seeded course library over HTTP:
//! - Paged, filtered and sorted author collections with `X-Pagination`
//! - Field selection with `?fields=`
//! - Vendor media types for full/friendly representations and links
//!
//! Run with an optional configuration file:
//!
//! ```text
//! cargo run --example course_library -- demos/course_library/config.yaml
//! ```

use course_library::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path);
            AppConfig::from_yaml_file(&path)?
        }
        None => AppConfig::default(),
    };

    let bind = config.server.bind.clone();
    let base_url = config.server.base_url();
    let namespace = config.media.namespace.clone();

    println!("🚀 Course Library");
    println!("\n🌐 Server running on {}", base_url);
    println!("\n📚 Routes:");
    println!("    GET    /api                                  - Root links");
    println!("    GET    /api/authors                          - List authors (paged)");
    println!("    POST   /api/authors                          - Create an author");
    println!("    OPTIONS /api/authors                         - Allowed methods");
    println!("    GET    /api/authors/{{authorId}}               - Get an author");
    println!("    GET    /api/authorcollections/({{ids}})        - Get several authors");
    println!("    POST   /api/authorcollections                - Create several authors");
    println!("    GET    /api/authors/{{authorId}}/courses       - List courses");
    println!("    POST   /api/authors/{{authorId}}/courses       - Create a course");
    println!("    GET    /api/authors/{{authorId}}/courses/{{id}}  - Get a course");
    println!("    PUT    /api/authors/{{authorId}}/courses/{{id}}  - Replace a course");
    println!("\n💡 Try:");
    println!(
        "    curl -i '{}/api/authors?mainCategory=Rum&orderBy=age%20desc&fields=id,name'",
        base_url.trim_end_matches('/')
    );
    println!(
        "    curl -H 'Accept: application/vnd.{}.author.full.hateoas+json' {}/api/authors",
        namespace,
        base_url.trim_end_matches('/')
    );

    ServerBuilder::new()
        .with_config(config)
        .with_repository(InMemoryCourseLibraryRepository::seeded())
        .serve(&bind)
        .await
}
