//! End-to-end tests of the author and course endpoints
//!
//! These tests drive the full router: query parsing, sort mapping, paging
//! headers, creation with `Location`, and course sub-resources.

use axum::http::{HeaderValue, Method, StatusCode, header};
use axum_test::TestServer;
use course_library::prelude::*;
use serde_json::{Value, json};

const BERRY: &str = "d28888e9-2ba9-473a-a40f-e38cb54f9b35";
const NANCY: &str = "da2fd609-d754-4feb-8acd-c4f9ff13ba96";
const ATHERTON: &str = "2ee49fe3-edf2-4f91-8409-3eb25ce6ca51";
const OVERTHROWING_MUTINY: &str = "d8663e5e-7494-4f81-8739-6e0de1bea7ee";

// =============================================================================
// Test Server Setup
// =============================================================================

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.base_url = Some("http://library.test".to_string());
    config
}

fn create_test_server() -> TestServer {
    let app = ServerBuilder::new()
        .with_config(test_config())
        .with_repository(InMemoryCourseLibraryRepository::seeded())
        .build()
        .expect("Failed to build app");

    TestServer::new(app).expect("Failed to create test server")
}

fn first_names(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|author| {
            author["name"]
                .as_str()
                .and_then(|name| name.split(' ').next())
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

fn pagination(response: &axum_test::TestResponse) -> Value {
    let header = response
        .headers()
        .get("x-pagination")
        .expect("X-Pagination header");
    serde_json::from_str(header.to_str().unwrap()).unwrap()
}

// =============================================================================
// Health Check Tests
// =============================================================================

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        let server = create_test_server();

        let response = server.get("/health").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "course-library");
    }
}

// =============================================================================
// Root Tests
// =============================================================================

mod root_tests {
    use super::*;

    #[tokio::test]
    async fn test_root_links() {
        let server = create_test_server();

        let response = server.get("/api").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(
            body,
            json!([
                { "href": "http://library.test/api", "rel": "self", "method": "GET" },
                { "href": "http://library.test/api/authors", "rel": "authors", "method": "GET" },
                { "href": "http://library.test/api/authors", "rel": "create_author", "method": "POST" }
            ])
        );
    }
}

// =============================================================================
// Author Collection Tests
// =============================================================================

mod author_collection_tests {
    use super::*;

    #[tokio::test]
    async fn test_default_listing_is_ordered_by_name() {
        let server = create_test_server();

        let response = server.get("/api/authors").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(
            first_names(&body),
            ["Arnold", "Atherton", "Berry", "Eli", "Nancy", "Rutherford", "Seabury"]
        );
        assert_eq!(body[0]["name"], "Arnold The Unseen Stafford");
        assert_eq!(body[0]["mainCategory"], "Singing");
    }

    #[tokio::test]
    async fn test_paging_header() {
        let server = create_test_server();

        let response = server
            .get("/api/authors")
            .add_query_param("pageNumber", 2)
            .add_query_param("pageSize", 2)
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(first_names(&body), ["Berry", "Eli"]);

        let metadata = pagination(&response);
        assert_eq!(metadata["totalCount"], 7);
        assert_eq!(metadata["pageSize"], 2);
        assert_eq!(metadata["currentPage"], 2);
        assert_eq!(metadata["totalPages"], 4);
        assert_eq!(
            metadata["previousPageLink"],
            "http://library.test/api/authors?orderBy=Name&pageNumber=1&pageSize=2"
        );
        assert_eq!(
            metadata["nextPageLink"],
            "http://library.test/api/authors?orderBy=Name&pageNumber=3&pageSize=2"
        );
    }

    #[tokio::test]
    async fn test_first_page_has_no_previous_link() {
        let server = create_test_server();

        let response = server.get("/api/authors").await;
        let metadata = pagination(&response);
        assert_eq!(metadata["totalPages"], 1);
        assert!(metadata["previousPageLink"].is_null());
        assert!(metadata["nextPageLink"].is_null());
    }

    #[tokio::test]
    async fn test_page_size_is_capped() {
        let server = create_test_server();

        let response = server
            .get("/api/authors")
            .add_query_param("pageSize", 500)
            .await;
        response.assert_status_ok();
        assert_eq!(pagination(&response)["pageSize"], 20);
    }

    #[tokio::test]
    async fn test_page_number_far_past_the_end_is_empty() {
        let server = create_test_server();

        let response = server
            .get("/api/authors")
            .add_query_param("pageNumber", usize::MAX.to_string())
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert!(body.as_array().unwrap().is_empty());

        let metadata = pagination(&response);
        assert_eq!(metadata["currentPage"], json!(usize::MAX));
        assert!(metadata["nextPageLink"].is_null());
        assert!(metadata["previousPageLink"].is_string());
    }

    #[tokio::test]
    async fn test_filter_and_search() {
        let server = create_test_server();

        let response = server
            .get("/api/authors")
            .add_query_param("mainCategory", "Rum")
            .await;
        let body: Value = response.json();
        assert_eq!(first_names(&body), ["Atherton", "Nancy"]);

        let response = server
            .get("/api/authors")
            .add_query_param("searchQuery", "ing")
            .await;
        let body: Value = response.json();
        assert_eq!(first_names(&body), ["Arnold", "Eli"]);
    }

    #[tokio::test]
    async fn test_filter_value_is_carried_into_page_links() {
        let server = create_test_server();

        let response = server
            .get("/api/authors")
            .add_query_param("mainCategory", "Rum")
            .add_query_param("pageSize", 1)
            .await;
        let metadata = pagination(&response);
        assert_eq!(
            metadata["nextPageLink"],
            "http://library.test/api/authors?orderBy=Name&pageNumber=2&pageSize=1&mainCategory=Rum"
        );
    }

    #[tokio::test]
    async fn test_order_by_age_descending_lists_oldest_first() {
        let server = create_test_server();

        let response = server
            .get("/api/authors")
            .add_query_param("orderBy", "age desc")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(
            first_names(&body),
            ["Seabury", "Arnold", "Eli", "Nancy", "Berry", "Rutherford", "Atherton"]
        );
    }

    #[tokio::test]
    async fn test_multiple_sort_clauses() {
        let server = create_test_server();

        let response = server
            .get("/api/authors")
            .add_query_param("orderBy", "mainCategory, name desc")
            .await;
        let body: Value = response.json();
        assert_eq!(
            first_names(&body),
            ["Rutherford", "Seabury", "Nancy", "Atherton", "Berry", "Eli", "Arnold"]
        );
    }

    #[tokio::test]
    async fn test_fields_are_shaped_in_declaration_order() {
        let server = create_test_server();

        let response = server
            .get("/api/authors")
            .add_query_param("fields", "name, id")
            .add_query_param("pageSize", 1)
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        let record = body[0].as_object().unwrap();
        assert_eq!(record.keys().collect::<Vec<_>>(), ["id", "name"]);
    }

    #[tokio::test]
    async fn test_head_returns_headers_only() {
        let server = create_test_server();

        let response = server.method(Method::HEAD, "/api/authors").await;
        response.assert_status_ok();
        assert!(response.headers().contains_key("x-pagination"));
        assert!(response.as_bytes().is_empty());
    }

    #[tokio::test]
    async fn test_options_lists_allowed_methods() {
        let server = create_test_server();

        let response = server.method(Method::OPTIONS, "/api/authors").await;
        response.assert_status_ok();
        assert_eq!(
            response.headers().get(header::ALLOW),
            Some(&HeaderValue::from_static("GET,HEAD,POST,OPTIONS"))
        );
    }

    #[tokio::test]
    async fn test_cors_preflight_is_answered_by_policy() {
        let server = create_test_server();

        let response = server
            .method(Method::OPTIONS, "/api/authors")
            .add_header(header::ORIGIN, HeaderValue::from_static("http://client.test"))
            .add_header(
                header::ACCESS_CONTROL_REQUEST_METHOD,
                HeaderValue::from_static("POST"),
            )
            .await;
        response.assert_status_ok();
        assert!(
            response
                .headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );
        assert!(response.headers().get(header::ALLOW).is_none());
    }

    #[tokio::test]
    async fn test_cors_exposes_paging_header() {
        let server = create_test_server();

        let response = server
            .get("/api/authors")
            .add_header(header::ORIGIN, HeaderValue::from_static("http://client.test"))
            .await;
        response.assert_status_ok();
        let exposed = response
            .headers()
            .get(header::ACCESS_CONTROL_EXPOSE_HEADERS)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        assert!(exposed.contains("x-pagination"));
        assert!(exposed.contains("location"));
    }
}

// =============================================================================
// Single Author Tests
// =============================================================================

mod single_author_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_author() {
        let server = create_test_server();

        let response = server.get(&format!("/api/authors/{}", BERRY)).await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["id"], BERRY);
        assert_eq!(body["name"], "Berry Griffin Beak Eldritch");
        assert_eq!(body["mainCategory"], "Ships");
        assert!(body["age"].as_i64().unwrap() >= 45);
        assert!(body.get("links").is_none());
    }

    #[tokio::test]
    async fn test_get_author_with_fields() {
        let server = create_test_server();

        let response = server
            .get(&format!("/api/authors/{}", NANCY))
            .add_query_param("fields", "MAINCATEGORY")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body, json!({ "mainCategory": "Rum" }));
    }

    #[tokio::test]
    async fn test_unknown_author_is_not_found() {
        let server = create_test_server();

        let id = Uuid::new_v4();
        let response = server.get(&format!("/api/authors/{}", id)).await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert_eq!(body["code"], "ENTITY_NOT_FOUND");
        assert_eq!(body["details"]["id"], id.to_string());
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let server = create_test_server();

        let response = server.get("/api/authors/not-a-uuid").await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "INVALID_ENTITY_ID");
    }
}

// =============================================================================
// Author Creation Tests
// =============================================================================

mod author_creation_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_author_with_courses() {
        let server = create_test_server();

        let response = server
            .post("/api/authors")
            .json(&json!({
                "firstName": "Jane",
                "lastName": "Skewers",
                "dateOfBirth": "1968-04-01T00:00:00Z",
                "mainCategory": "Rum",
                "courses": [
                    { "title": "Top Pirate Hits of Last Decade", "description": "Learn the lyrics." }
                ]
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        let id = body["id"].as_str().unwrap().to_string();
        assert_eq!(body["name"], "Jane Skewers");
        assert_eq!(body["links"][0]["rel"], "self");
        assert_eq!(
            body["links"][0]["href"],
            format!("http://library.test/api/authors/{}", id)
        );
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            format!("http://library.test/api/authors/{}", id).as_str()
        );

        let response = server.get(&format!("/api/authors/{}/courses", id)).await;
        response.assert_status_ok();
        let courses: Value = response.json();
        assert_eq!(courses[0]["title"], "Top Pirate Hits of Last Decade");
        assert_eq!(courses[0]["authorId"], id);
    }

    #[tokio::test]
    async fn test_create_author_with_date_of_death() {
        let server = create_test_server();
        let anne = json!({
            "firstName": "Anne",
            "lastName": "Bonny",
            "dateOfBirth": "1697-03-08T00:00:00Z",
            "dateOfDeath": "1782-04-22T00:00:00Z",
            "mainCategory": "Ships"
        });

        let response = server
            .post("/api/authors")
            .json(&anne)
            .content_type("application/vnd.example.authorforcreationwithdateofdeath+json")
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["age"], 85);

        // Plain creation input has no date of death
        let response = server.post("/api/authors").json(&anne).await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert!(body["age"].as_i64().unwrap() > 300);
    }

    #[tokio::test]
    async fn test_create_author_with_malformed_body() {
        let server = create_test_server();

        let response = server
            .post("/api/authors")
            .json(&json!({ "firstName": "Jane" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "INVALID_BODY");
    }
}

// =============================================================================
// Author Collection Resource Tests
// =============================================================================

mod author_collection_resource_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_author_collection() {
        let server = create_test_server();

        let response = server
            .get(&format!("/api/authorcollections/({},{})", BERRY, ATHERTON))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(first_names(&body), ["Atherton", "Berry"]);
    }

    #[tokio::test]
    async fn test_incomplete_collection_is_not_found() {
        let server = create_test_server();

        let missing = Uuid::new_v4();
        let response = server
            .get(&format!("/api/authorcollections/({},{})", BERRY, missing))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert_eq!(body["details"]["missing"], json!([missing.to_string()]));
    }

    #[tokio::test]
    async fn test_create_author_collection() {
        let server = create_test_server();

        let response = server
            .post("/api/authorcollections")
            .json(&json!([
                {
                    "firstName": "Anne",
                    "lastName": "Bonny",
                    "dateOfBirth": "1697-03-08T00:00:00Z",
                    "mainCategory": "Ships"
                },
                {
                    "firstName": "Mary",
                    "lastName": "Read",
                    "dateOfBirth": "1685-01-01T00:00:00Z",
                    "mainCategory": "Ships"
                }
            ]))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|author| author["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids.len(), 2);

        let location = response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert_eq!(
            location,
            format!("http://library.test/api/authorcollections/({},{})", ids[0], ids[1])
        );

        let path = location.trim_start_matches("http://library.test");
        server.get(path).await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_create_empty_collection_is_rejected() {
        let server = create_test_server();

        let response = server.post("/api/authorcollections").json(&json!([])).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "EMPTY_BODY");
    }
}

// =============================================================================
// Course Tests
// =============================================================================

mod course_tests {
    use super::*;

    #[tokio::test]
    async fn test_courses_of_author_are_ordered_by_title() {
        let server = create_test_server();

        let response = server.get(&format!("/api/authors/{}/courses", BERRY)).await;
        response.assert_status_ok();

        let body: Value = response.json();
        let titles: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|course| course["title"].as_str().unwrap())
            .collect();
        assert_eq!(
            titles,
            ["Commandeering a Ship Without Getting Caught", "Overthrowing Mutiny"]
        );
    }

    #[tokio::test]
    async fn test_get_single_course() {
        let server = create_test_server();

        let response = server
            .get(&format!("/api/authors/{}/courses/{}", BERRY, OVERTHROWING_MUTINY))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["title"], "Overthrowing Mutiny");
        assert_eq!(body["authorId"], BERRY);

        let response = server
            .get(&format!("/api/authors/{}/courses/{}", NANCY, OVERTHROWING_MUTINY))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_courses_of_unknown_author() {
        let server = create_test_server();

        let response = server
            .get(&format!("/api/authors/{}/courses", Uuid::new_v4()))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_course_for_author() {
        let server = create_test_server();

        let response = server
            .post(&format!("/api/authors/{}/courses", NANCY))
            .json(&json!({ "title": "Rum Tasting for Beginners" }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        let course_id = body["id"].as_str().unwrap();
        assert_eq!(body["authorId"], NANCY);
        assert_eq!(body["description"], "");
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            format!("http://library.test/api/authors/{}/courses/{}", NANCY, course_id).as_str()
        );
    }

    #[tokio::test]
    async fn test_create_course_for_unknown_author() {
        let server = create_test_server();

        let response = server
            .post(&format!("/api/authors/{}/courses", Uuid::new_v4()))
            .json(&json!({ "title": "Nowhere" }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_course_for_author() {
        let server = create_test_server();
        let uri = format!("/api/authors/{}/courses/{}", BERRY, OVERTHROWING_MUTINY);

        let response = server
            .put(&uri)
            .json(&json!({
                "title": "Overthrowing Mutiny, Revised",
                "description": "Now with a chapter on loyal parrots."
            }))
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let body: Value = server.get(&uri).await.json();
        assert_eq!(body["title"], "Overthrowing Mutiny, Revised");
        assert_eq!(body["description"], "Now with a chapter on loyal parrots.");
        assert_eq!(body["authorId"], BERRY);
    }

    #[tokio::test]
    async fn test_update_course_requires_description() {
        let server = create_test_server();

        let response = server
            .put(&format!("/api/authors/{}/courses/{}", BERRY, OVERTHROWING_MUTINY))
            .json(&json!({ "title": "Overthrowing Mutiny" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "INVALID_BODY");
    }

    #[tokio::test]
    async fn test_update_unknown_course_is_not_found() {
        let server = create_test_server();
        let update = json!({ "title": "Ghost Ship", "description": "Boo." });

        let response = server
            .put(&format!("/api/authors/{}/courses/{}", NANCY, OVERTHROWING_MUTINY))
            .json(&update)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let response = server
            .put(&format!("/api/authors/{}/courses/{}", Uuid::new_v4(), OVERTHROWING_MUTINY))
            .json(&update)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}
