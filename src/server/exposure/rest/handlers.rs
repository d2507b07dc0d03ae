//! HTTP handlers of the course library API
//!
//! Every author read runs the same pipeline: negotiate the representation,
//! resolve the sort mapping, validate the field list for the negotiated
//! shape, and only then query the repository. Client faults therefore never
//! reach storage.

use crate::core::error::{ApiError, ApiResult, EntityError, RequestError, ValidationError};
use crate::core::negotiation::{MediaType, MediaTypeSelection, Variant};
use crate::core::query::PaginationMetadata;
use crate::core::shaping::{FieldSelection, Shape, ShapedRecord, shape};
use crate::core::sort::{SortInstruction, build_sort_instructions};
use crate::entities::{
    Author, AuthorDto, AuthorForCreationDto, AuthorForCreationWithDateOfDeathDto, AuthorFullDto,
    AuthorsQuery, AuthorsResourceParameters, Course, CourseDto, CourseForCreationDto,
    CourseForUpdateDto,
};
use crate::links::{
    Link, LinkedCollection, LinkedResource, RouteValues, UriResolver, collection_resource_uri,
    links_for_collection, links_for_resource, root_links, routes, with_links,
};
use crate::server::host::{AUTHOR_WITH_DATE_OF_DEATH_INPUT, ServerHost};
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Response header carrying [`PaginationMetadata`] as JSON
pub const X_PAGINATION: HeaderName = HeaderName::from_static("x-pagination");

/// Methods advertised by `OPTIONS /api/authors`
pub const AUTHORS_ALLOW: &str = "GET,HEAD,POST,OPTIONS";

const AUTHOR_ENTITY: &str = "Author";
const COURSE_ENTITY: &str = "Course";

/// Optional field list of a single-resource request
#[derive(Debug, Default, Deserialize)]
pub struct FieldsQuery {
    #[serde(default)]
    pub fields: Option<String>,
}

fn accept_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
}

/// Content type of a negotiated representation
///
/// Vendor selections echo the requested media type without parameters;
/// everything else is plain JSON.
fn content_type(accept: Option<&str>, selection: MediaTypeSelection) -> HeaderValue {
    if selection != MediaTypeSelection::default() {
        let essence = accept
            .and_then(|value| value.split(',').next())
            .and_then(|first| first.split(';').next())
            .map(str::trim)
            .unwrap_or_default();
        if let Ok(value) = HeaderValue::from_str(essence) {
            return value;
        }
    }
    HeaderValue::from_static("application/json")
}

fn representation(status: StatusCode, content_type: HeaderValue, body: &impl Serialize) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, content_type);
    response
}

fn created(location: Option<String>, body: &impl Serialize) -> Response {
    let mut response = (StatusCode::CREATED, Json(body)).into_response();
    if let Some(value) = location.and_then(|uri| HeaderValue::from_str(&uri).ok()) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}

fn pagination_header(metadata: &PaginationMetadata) -> ApiResult<HeaderValue> {
    let json = serde_json::to_string(metadata).map_err(|e| ApiError::Internal(e.to_string()))?;
    HeaderValue::from_str(&json).map_err(|e| ApiError::Internal(e.to_string()))
}

fn query_error(rejection: QueryRejection) -> ApiError {
    ValidationError::InvalidValue {
        field: "query".to_string(),
        message: rejection.body_text(),
    }
    .into()
}

fn body_error(rejection: JsonRejection) -> ApiError {
    RequestError::InvalidBody {
        message: rejection.body_text(),
    }
    .into()
}

fn decode_body<T: DeserializeOwned>(body: Value) -> ApiResult<T> {
    serde_json::from_value(body).map_err(|e| {
        RequestError::InvalidBody {
            message: e.to_string(),
        }
        .into()
    })
}

/// Whether `Content-Type` names the date-of-death author input
fn has_date_of_death_input(host: &ServerHost, headers: &HeaderMap) -> ApiResult<bool> {
    let Some(value) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return Ok(false);
    };

    let media_type = MediaType::parse(value).map_err(|e| ValidationError::InvalidMediaType {
        value: value.to_string(),
        message: e.to_string(),
    })?;
    Ok(media_type.is_vendor_type(&host.config.media.namespace, AUTHOR_WITH_DATE_OF_DEATH_INPUT))
}

fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        RequestError::InvalidEntityId {
            id: raw.to_string(),
        }
        .into()
    })
}

/// Parse `(id1,id2,...)`; duplicates collapse, first occurrence wins
fn parse_id_list(raw: &str) -> ApiResult<Vec<Uuid>> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(trimmed);

    let mut ids = Vec::new();
    for part in inner.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let id = parse_id(part)?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    if ids.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "authorIds".to_string(),
            message: "at least one author id is required".to_string(),
        }
        .into());
    }
    Ok(ids)
}

fn repository_failure(
    entity_type: &'static str,
    operation: &'static str,
) -> impl FnOnce(anyhow::Error) -> ApiError {
    move |err| {
        tracing::error!(entity_type, operation, error = %err, "repository operation failed");
        EntityError::OperationFailed {
            entity_type: entity_type.to_string(),
            operation: operation.to_string(),
            message: err.to_string(),
        }
        .into()
    }
}

async fn require_author(host: &ServerHost, author_id: Uuid) -> ApiResult<()> {
    let exists = host
        .repository
        .author_exists(&author_id)
        .await
        .map_err(repository_failure(AUTHOR_ENTITY, "find"))?;

    if exists {
        Ok(())
    } else {
        Err(EntityError::NotFound {
            entity_type: AUTHOR_ENTITY.to_string(),
            id: author_id,
        }
        .into())
    }
}

async fn store_author(
    host: &ServerHost,
    (author, courses): (Author, Vec<Course>),
) -> ApiResult<Author> {
    let author = host
        .repository
        .add_author(author)
        .await
        .map_err(repository_failure(AUTHOR_ENTITY, "create"))?;

    for course in courses {
        host.repository
            .add_course(&author.id, course)
            .await
            .map_err(repository_failure(COURSE_ENTITY, "create"))?;
    }

    tracing::info!(author_id = %author.id, "author created");
    Ok(author)
}

/// GET /api
pub async fn get_root(State(host): State<Arc<ServerHost>>) -> Json<Vec<Link>> {
    Json(root_links(host.routes.as_ref()))
}

/// GET|HEAD /api/authors
pub async fn get_authors(
    State(host): State<Arc<ServerHost>>,
    headers: HeaderMap,
    query: Result<Query<AuthorsResourceParameters>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = query.map_err(query_error)?;
    let accept = accept_header(&headers);
    let selection = host.author_negotiator.negotiate_accept(accept)?;
    tracing::debug!(?selection, "author collection representation negotiated");
    let params = params.with_paging(&host.config.paging);

    let table = host.mappings.lookup::<AuthorDto, Author>()?;
    let ordering = build_sort_instructions(&params.order_by, table)?;

    let content_type = content_type(accept, selection);
    match selection.variant {
        Variant::Full => {
            author_page::<AuthorFullDto>(&host, &params, &ordering, selection, content_type).await
        }
        Variant::Default | Variant::Friendly => {
            author_page::<AuthorDto>(&host, &params, &ordering, selection, content_type).await
        }
    }
}

async fn author_page<T>(
    host: &ServerHost,
    params: &AuthorsQuery,
    ordering: &[SortInstruction],
    selection: MediaTypeSelection,
    content_type: HeaderValue,
) -> ApiResult<Response>
where
    T: Shape + LinkedResource + for<'a> From<&'a Author>,
{
    let fields = FieldSelection::<T>::parse(params.fields.as_deref())?;

    let page = host
        .repository
        .get_authors(
            &params.filter(),
            ordering,
            params.page_number,
            params.page_size,
        )
        .await
        .map_err(repository_failure(AUTHOR_ENTITY, "list"))?
        .map(|author| T::from(&author));

    let resolver: &dyn UriResolver = host.routes.as_ref();
    let metadata = PaginationMetadata::new(&page.state, |kind| {
        collection_resource_uri(resolver, routes::GET_AUTHORS, params, kind)
    });

    let mut response = if selection.include_links {
        let value = page
            .items
            .iter()
            .map(|dto| {
                let links = links_for_resource::<T>(resolver, dto.resource_id(), None);
                with_links(fields.apply(dto), &links)
            })
            .collect();
        let links = links_for_collection(resolver, routes::GET_AUTHORS, params, &page.state);
        representation(StatusCode::OK, content_type, &LinkedCollection { value, links })
    } else {
        let value: Vec<ShapedRecord> = page.items.iter().map(|dto| fields.apply(dto)).collect();
        representation(StatusCode::OK, content_type, &value)
    };

    response
        .headers_mut()
        .insert(X_PAGINATION, pagination_header(&metadata)?);
    Ok(response)
}

/// OPTIONS /api/authors
pub async fn authors_options() -> impl IntoResponse {
    (StatusCode::OK, [(header::ALLOW, AUTHORS_ALLOW)])
}

/// POST /api/authors
///
/// The body is read as [`AuthorForCreationWithDateOfDeathDto`] when sent as
/// `application/vnd.<namespace>.authorforcreationwithdateofdeath+json`, and
/// as [`AuthorForCreationDto`] otherwise.
pub async fn create_author(
    State(host): State<Arc<ServerHost>>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(body) = body.map_err(body_error)?;
    let entities = if has_date_of_death_input(&host, &headers)? {
        decode_body::<AuthorForCreationWithDateOfDeathDto>(body)?.into_entities()
    } else {
        decode_body::<AuthorForCreationDto>(body)?.into_entities()
    };
    let author = store_author(&host, entities).await?;

    let dto = AuthorDto::from(&author);
    let links = links_for_resource::<AuthorDto>(host.routes.as_ref(), dto.id, None);
    let record = with_links(shape(&dto, None)?, &links);

    let location = host.routes.resolve_uri(
        routes::GET_AUTHOR,
        &RouteValues::new().with("authorId", dto.id),
    );
    Ok(created(location, &record))
}

/// GET /api/authors/{authorId}
pub async fn get_author(
    State(host): State<Arc<ServerHost>>,
    Path(author_id): Path<String>,
    headers: HeaderMap,
    query: Result<Query<FieldsQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(query) = query.map_err(query_error)?;
    let author_id = parse_id(&author_id)?;
    let accept = accept_header(&headers);
    let selection = host.author_negotiator.negotiate_accept(accept)?;
    tracing::debug!(?selection, %author_id, "author representation negotiated");
    let fields = query.fields.as_deref();

    let content_type = content_type(accept, selection);
    match selection.variant {
        Variant::Full => {
            single_author::<AuthorFullDto>(&host, author_id, fields, selection, content_type).await
        }
        Variant::Default | Variant::Friendly => {
            single_author::<AuthorDto>(&host, author_id, fields, selection, content_type).await
        }
    }
}

async fn single_author<T>(
    host: &ServerHost,
    author_id: Uuid,
    fields: Option<&str>,
    selection: MediaTypeSelection,
    content_type: HeaderValue,
) -> ApiResult<Response>
where
    T: Shape + LinkedResource + for<'a> From<&'a Author>,
{
    let field_selection = FieldSelection::<T>::parse(fields)?;

    let author = host
        .repository
        .get_author(&author_id)
        .await
        .map_err(repository_failure(AUTHOR_ENTITY, "find"))?
        .ok_or_else(|| EntityError::NotFound {
            entity_type: AUTHOR_ENTITY.to_string(),
            id: author_id,
        })?;

    let dto = T::from(&author);
    let mut record = field_selection.apply(&dto);
    if selection.include_links {
        let links = links_for_resource::<T>(host.routes.as_ref(), author_id, fields);
        record = with_links(record, &links);
    }

    Ok(representation(StatusCode::OK, content_type, &record))
}

/// GET /api/authorcollections/({authorIds})
pub async fn get_author_collection(
    State(host): State<Arc<ServerHost>>,
    Path(author_ids): Path<String>,
) -> ApiResult<Json<Vec<AuthorDto>>> {
    let ids = parse_id_list(&author_ids)?;

    let authors = host
        .repository
        .get_authors_by_ids(&ids)
        .await
        .map_err(repository_failure(AUTHOR_ENTITY, "list"))?;

    let missing: Vec<Uuid> = ids
        .iter()
        .filter(|id| !authors.iter().any(|author| author.id == **id))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(EntityError::CollectionIncomplete {
            entity_type: AUTHOR_ENTITY.to_string(),
            missing,
        }
        .into());
    }

    Ok(Json(authors.iter().map(AuthorDto::from).collect()))
}

/// POST /api/authorcollections
pub async fn create_author_collection(
    State(host): State<Arc<ServerHost>>,
    body: Result<Json<Vec<AuthorForCreationDto>>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(inputs) = body.map_err(body_error)?;
    if inputs.is_empty() {
        return Err(RequestError::EmptyBody.into());
    }

    let mut authors = Vec::with_capacity(inputs.len());
    for input in inputs {
        let author = store_author(&host, input.into_entities()).await?;
        authors.push(AuthorDto::from(&author));
    }

    let ids = authors
        .iter()
        .map(|dto| dto.id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let location = host.routes.resolve_uri(
        routes::GET_AUTHOR_COLLECTION,
        &RouteValues::new().with("authorIds", ids),
    );
    Ok(created(location, &authors))
}

/// GET /api/authors/{authorId}/courses
pub async fn get_courses_for_author(
    State(host): State<Arc<ServerHost>>,
    Path(author_id): Path<String>,
) -> ApiResult<Json<Vec<CourseDto>>> {
    let author_id = parse_id(&author_id)?;
    require_author(&host, author_id).await?;

    let courses = host
        .repository
        .get_courses(&author_id)
        .await
        .map_err(repository_failure(COURSE_ENTITY, "list"))?;

    Ok(Json(courses.iter().map(CourseDto::from).collect()))
}

/// GET /api/authors/{authorId}/courses/{courseId}
pub async fn get_course_for_author(
    State(host): State<Arc<ServerHost>>,
    Path((author_id, course_id)): Path<(String, String)>,
) -> ApiResult<Json<CourseDto>> {
    let author_id = parse_id(&author_id)?;
    let course_id = parse_id(&course_id)?;
    require_author(&host, author_id).await?;

    let courses = host
        .repository
        .get_courses(&author_id)
        .await
        .map_err(repository_failure(COURSE_ENTITY, "find"))?;

    courses
        .iter()
        .find(|course| course.id == course_id)
        .map(|course| Json(CourseDto::from(course)))
        .ok_or_else(|| {
            EntityError::NotFound {
                entity_type: COURSE_ENTITY.to_string(),
                id: course_id,
            }
            .into()
        })
}

/// POST /api/authors/{authorId}/courses
pub async fn create_course_for_author(
    State(host): State<Arc<ServerHost>>,
    Path(author_id): Path<String>,
    body: Result<Json<CourseForCreationDto>, JsonRejection>,
) -> ApiResult<Response> {
    let author_id = parse_id(&author_id)?;
    let Json(input) = body.map_err(body_error)?;
    require_author(&host, author_id).await?;

    let course = host
        .repository
        .add_course(&author_id, input.into_course(author_id))
        .await
        .map_err(repository_failure(COURSE_ENTITY, "create"))?;

    let location = host.routes.resolve_uri(
        routes::GET_COURSE_FOR_AUTHOR,
        &RouteValues::new()
            .with("authorId", author_id)
            .with("courseId", course.id),
    );
    Ok(created(location, &CourseDto::from(&course)))
}

/// PUT /api/authors/{authorId}/courses/{courseId}
///
/// Replaces title and description of an existing course.
pub async fn update_course_for_author(
    State(host): State<Arc<ServerHost>>,
    Path((author_id, course_id)): Path<(String, String)>,
    body: Result<Json<CourseForUpdateDto>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let author_id = parse_id(&author_id)?;
    let course_id = parse_id(&course_id)?;
    let Json(input) = body.map_err(body_error)?;
    require_author(&host, author_id).await?;

    let updated = host
        .repository
        .update_course(&author_id, input.into_course(author_id, course_id))
        .await
        .map_err(repository_failure(COURSE_ENTITY, "update"))?;

    match updated {
        Some(course) => {
            tracing::info!(%author_id, course_id = %course.id, "course updated");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(EntityError::NotFound {
            entity_type: COURSE_ENTITY.to_string(),
            id: course_id,
        }
        .into()),
    }
}
