//! Route table of the course library API

use crate::server::exposure::rest::handlers::{
    authors_options, create_author, create_author_collection, create_course_for_author,
    get_author, get_author_collection, get_authors, get_course_for_author, get_courses_for_author,
    get_root, update_course_for_author,
};
use crate::server::host::ServerHost;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

/// Build the API routes
///
/// - GET /api - Root document with entry links
/// - GET|HEAD /api/authors - Paged, filtered, sorted, shaped authors
/// - POST /api/authors - Create an author with optional courses
/// - OPTIONS /api/authors - Allowed methods
/// - GET /api/authors/{authorId} - One author in the negotiated representation
/// - GET /api/authorcollections/({authorIds}) - Several authors by ID
/// - POST /api/authorcollections - Create several authors
/// - GET|POST /api/authors/{authorId}/courses - Courses of an author
/// - GET|PUT /api/authors/{authorId}/courses/{courseId} - One course, full update
pub fn build_api_routes(host: Arc<ServerHost>) -> Router {
    Router::new()
        .route("/api", get(get_root))
        .route(
            "/api/authors",
            get(get_authors)
                .post(create_author)
                .options(authors_options),
        )
        .route("/api/authors/{authorId}", get(get_author))
        .route(
            "/api/authors/{authorId}/courses",
            get(get_courses_for_author).post(create_course_for_author),
        )
        .route(
            "/api/authors/{authorId}/courses/{courseId}",
            get(get_course_for_author).put(update_course_for_author),
        )
        .route("/api/authorcollections", post(create_author_collection))
        .route("/api/authorcollections/{authorIds}", get(get_author_collection))
        .with_state(host)
}
