//! HTTP server of the course library
//!
//! `ServerBuilder` assembles a `ServerHost` from configuration and a
//! repository, and `RestExposure` turns the host into an Axum router.

pub mod builder;
pub mod exposure;
pub mod host;
pub mod router;

pub use builder::ServerBuilder;
pub use exposure::RestExposure;
pub use exposure::rest::handlers::{AUTHORS_ALLOW, X_PAGINATION};
pub use host::ServerHost;
