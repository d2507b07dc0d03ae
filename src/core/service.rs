//! Repository trait for the course library
//!
//! The representation pipeline only builds ordering instructions; executing
//! queries is left to an implementation of [`CourseLibraryRepository`].

use crate::core::query::PagedList;
use crate::core::sort::SortInstruction;
use crate::entities::{Author, Course};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Filters of the author collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorFilter {
    /// Exact main category, compared after trimming
    pub main_category: Option<String>,

    /// Substring of the main category, first name or last name
    pub search_query: Option<String>,
}

impl AuthorFilter {
    /// Trimmed main category, `None` when blank
    pub fn main_category(&self) -> Option<&str> {
        self.main_category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Trimmed search query, `None` when blank
    pub fn search_query(&self) -> Option<&str> {
        self.search_query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

/// Storage collaborator of the course library
///
/// Implementations are storage-agnostic; see
/// [`InMemoryCourseLibraryRepository`](crate::storage::InMemoryCourseLibraryRepository).
#[async_trait]
pub trait CourseLibraryRepository: Send + Sync {
    /// One page of filtered authors in the given order
    ///
    /// An empty `ordering` leaves the storage default order.
    async fn get_authors(
        &self,
        filter: &AuthorFilter,
        ordering: &[SortInstruction],
        page_number: usize,
        page_size: usize,
    ) -> Result<PagedList<Author>>;

    /// Get an author by ID
    async fn get_author(&self, id: &Uuid) -> Result<Option<Author>>;

    /// Authors with the given IDs, ordered by name; unknown IDs are skipped
    async fn get_authors_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Author>>;

    /// Store a new author
    async fn add_author(&self, author: Author) -> Result<Author>;

    async fn author_exists(&self, id: &Uuid) -> Result<bool>;

    /// Courses of one author
    async fn get_courses(&self, author_id: &Uuid) -> Result<Vec<Course>>;

    /// Store a new course for an existing author
    async fn add_course(&self, author_id: &Uuid, course: Course) -> Result<Course>;

    /// Replace an existing course of an author
    ///
    /// Returns `None` when the author has no course with that ID.
    async fn update_course(&self, author_id: &Uuid, course: Course) -> Result<Option<Course>>;
}
