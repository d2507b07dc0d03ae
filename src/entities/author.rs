//! Author resource

use crate::config::PagingConfig;
use crate::core::error::ConfigError;
use crate::core::mapping::{MappingEntry, MappingTable, MappingTarget};
use crate::core::service::AuthorFilter;
use crate::entities::course::{Course, CourseForCreationDto};
use crate::links::{LinkedResource, PageableQuery, Relation, RouteValues, routes};
use chrono::{DateTime, Datelike, Months, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: DateTime<Utc>,
    pub date_of_death: Option<DateTime<Utc>>,
    pub main_category: String,
}

impl Author {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: DateTime<Utc>,
        main_category: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth,
            date_of_death: None,
            main_category: main_category.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Age in whole years, up to the date of death if there is one
    pub fn age(&self) -> i32 {
        current_age(self.date_of_birth, self.date_of_death)
    }
}

impl MappingTarget for Author {
    const TARGET_NAME: &'static str = "Author";
}

/// Whole years between birth and `at`
///
/// An anniversary falling on February 29 counts on February 28 in common years.
pub fn age_at(date_of_birth: DateTime<Utc>, at: DateTime<Utc>) -> i32 {
    let years = at.year() - date_of_birth.year();
    let shift = Months::new(years.unsigned_abs() * 12);
    let anniversary = if years >= 0 {
        date_of_birth.checked_add_months(shift)
    } else {
        date_of_birth.checked_sub_months(shift)
    };

    match anniversary {
        Some(anniversary) if at < anniversary => years - 1,
        _ => years,
    }
}

/// Age today, or at the date of death
pub fn current_age(date_of_birth: DateTime<Utc>, date_of_death: Option<DateTime<Utc>>) -> i32 {
    age_at(date_of_birth, date_of_death.unwrap_or_else(Utc::now))
}

crate::impl_shape!(
    AuthorDto,
    "AuthorDto",
    {
        id: Uuid => "id",
        /// First and last name
        name: String => "name",
        age: i32 => "age",
        main_category: String => "mainCategory",
    }
);

crate::impl_shape!(
    AuthorFullDto,
    "AuthorFullDto",
    {
        id: Uuid => "id",
        first_name: String => "firstName",
        last_name: String => "lastName",
        date_of_birth: DateTime<Utc> => "dateOfBirth",
        main_category: String => "mainCategory",
    }
);

impl From<&Author> for AuthorDto {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            name: author.full_name(),
            age: author.age(),
            main_category: author.main_category.clone(),
        }
    }
}

impl From<&Author> for AuthorFullDto {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            date_of_birth: author.date_of_birth,
            main_category: author.main_category.clone(),
        }
    }
}

/// Fixed relations of every author representation
pub const AUTHOR_RELATIONS: &[Relation] = &[
    Relation {
        route: routes::CREATE_COURSE_FOR_AUTHOR,
        rel: "create_course_for_author",
        method: "POST",
    },
    Relation {
        route: routes::GET_COURSES_FOR_AUTHOR,
        rel: "courses",
        method: "GET",
    },
];

impl LinkedResource for AuthorDto {
    const SELF_ROUTE: &'static str = routes::GET_AUTHOR;
    const ID_VALUE: &'static str = "authorId";
    const RELATIONS: &'static [Relation] = AUTHOR_RELATIONS;

    fn resource_id(&self) -> Uuid {
        self.id
    }
}

impl LinkedResource for AuthorFullDto {
    const SELF_ROUTE: &'static str = routes::GET_AUTHOR;
    const ID_VALUE: &'static str = "authorId";
    const RELATIONS: &'static [Relation] = AUTHOR_RELATIONS;

    fn resource_id(&self) -> Uuid {
        self.id
    }
}

/// Mapping of `AuthorDto` sort properties onto `Author`
///
/// `Age` sorts on the date of birth with the direction inverted: the oldest
/// author has the earliest date.
pub fn author_property_mapping() -> Result<MappingTable, ConfigError> {
    Ok(MappingTable::new()
        .with_entry(MappingEntry::new("Id", ["Id"], false)?)
        .with_entry(MappingEntry::new("MainCategory", ["MainCategory"], false)?)
        .with_entry(MappingEntry::new("Age", ["DateOfBirth"], true)?)
        .with_entry(MappingEntry::new("Name", ["FirstName", "LastName"], false)?))
}

/// Input for creating an author, optionally with courses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorForCreationDto {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: DateTime<Utc>,
    pub main_category: String,
    #[serde(default)]
    pub courses: Vec<CourseForCreationDto>,
}

impl AuthorForCreationDto {
    /// New author entity plus its initial courses
    pub fn into_entities(self) -> (Author, Vec<Course>) {
        let author = Author::new(
            self.first_name,
            self.last_name,
            self.date_of_birth,
            self.main_category,
        );

        let courses = self
            .courses
            .into_iter()
            .map(|course| course.into_course(author.id))
            .collect();
        (author, courses)
    }
}

/// Creation input of an author who may already have died
///
/// Sent as `application/vnd.<namespace>.authorforcreationwithdateofdeath+json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorForCreationWithDateOfDeathDto {
    #[serde(flatten)]
    pub author: AuthorForCreationDto,
    #[serde(default)]
    pub date_of_death: Option<DateTime<Utc>>,
}

impl AuthorForCreationWithDateOfDeathDto {
    pub fn into_entities(self) -> (Author, Vec<Course>) {
        let (mut author, courses) = self.author.into_entities();
        author.date_of_death = self.date_of_death;
        (author, courses)
    }
}

fn default_page_number() -> usize {
    1
}

fn default_order_by() -> String {
    "Name".to_string()
}

/// Query parameters of the author collection
///
/// # Example
/// ```rust,ignore
/// GET /api/authors?mainCategory=Rum&orderBy=age desc&pageNumber=2&fields=id,name
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorsResourceParameters {
    #[serde(default, alias = "maincategory")]
    pub main_category: Option<String>,

    #[serde(default, alias = "searchquery")]
    pub search_query: Option<String>,

    /// Page number (starts at 1)
    #[serde(default = "default_page_number", alias = "pagenumber")]
    pub page_number: usize,

    /// Requested page size; the configured default applies when absent
    #[serde(default, alias = "pagesize")]
    pub page_size: Option<usize>,

    /// Sort specification over `AuthorDto` properties
    #[serde(default = "default_order_by", alias = "orderby")]
    pub order_by: String,

    /// Comma-separated shaping fields
    #[serde(default)]
    pub fields: Option<String>,
}

impl Default for AuthorsResourceParameters {
    fn default() -> Self {
        Self {
            main_category: None,
            search_query: None,
            page_number: default_page_number(),
            page_size: None,
            order_by: default_order_by(),
            fields: None,
        }
    }
}

impl AuthorsResourceParameters {
    /// Apply paging limits: page number at least 1, page size defaulted and
    /// clamped to the configured maximum
    pub fn with_paging(self, paging: &PagingConfig) -> AuthorsQuery {
        let page_size = self
            .page_size
            .unwrap_or(paging.default_page_size)
            .clamp(1, paging.max_page_size.max(1));

        AuthorsQuery {
            main_category: self.main_category,
            search_query: self.search_query,
            page_number: self.page_number.max(1),
            page_size,
            order_by: self.order_by,
            fields: self.fields,
        }
    }
}

/// Author collection query with paging limits applied
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorsQuery {
    pub main_category: Option<String>,
    pub search_query: Option<String>,
    pub page_number: usize,
    pub page_size: usize,
    pub order_by: String,
    pub fields: Option<String>,
}

impl AuthorsQuery {
    pub fn filter(&self) -> AuthorFilter {
        AuthorFilter {
            main_category: self.main_category.clone(),
            search_query: self.search_query.clone(),
        }
    }
}

impl PageableQuery for AuthorsQuery {
    fn page_number(&self) -> usize {
        self.page_number
    }

    fn route_values(&self, page_number: usize) -> RouteValues {
        RouteValues::new()
            .with_opt("fields", self.fields.as_deref())
            .with("orderBy", &self.order_by)
            .with("pageNumber", page_number)
            .with("pageSize", self.page_size)
            .with_opt("mainCategory", self.main_category.as_deref())
            .with_opt("searchQuery", self.search_query.as_deref())
    }
}
