//! In-memory implementation of CourseLibraryRepository for testing and development

use crate::core::query::PagedList;
use crate::core::service::{AuthorFilter, CourseLibraryRepository};
use crate::core::sort::SortInstruction;
use crate::entities::{Author, Course};
use crate::storage::ordering::{OrderKey, Orderable, apply_ordering};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

const AUTHOR_PROPERTIES: &[&str] = &[
    "Id",
    "FirstName",
    "LastName",
    "DateOfBirth",
    "DateOfDeath",
    "MainCategory",
];

impl Orderable for Author {
    const TYPE_NAME: &'static str = "Author";

    fn order_key(&self, property: &str) -> Option<OrderKey<'_>> {
        match property.to_ascii_lowercase().as_str() {
            "id" => Some(OrderKey::Id(self.id)),
            "firstname" => Some(OrderKey::Text(&self.first_name)),
            "lastname" => Some(OrderKey::Text(&self.last_name)),
            "dateofbirth" => Some(OrderKey::Date(Some(self.date_of_birth))),
            "dateofdeath" => Some(OrderKey::Date(self.date_of_death)),
            "maincategory" => Some(OrderKey::Text(&self.main_category)),
            _ => None,
        }
    }

    fn has_property(property: &str) -> bool {
        AUTHOR_PROPERTIES
            .iter()
            .any(|known| known.eq_ignore_ascii_case(property))
    }
}

/// In-memory course library repository
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
/// Authors keep insertion order, which is the default collection order.
#[derive(Clone, Default)]
pub struct InMemoryCourseLibraryRepository {
    authors: Arc<RwLock<Vec<Author>>>,
    courses: Arc<RwLock<HashMap<Uuid, Vec<Course>>>>,
}

impl InMemoryCourseLibraryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository holding the sample authors and courses
    pub fn seeded() -> Self {
        let authors = seed_authors();
        let mut courses: HashMap<Uuid, Vec<Course>> =
            authors.iter().map(|author| (author.id, Vec::new())).collect();
        for course in seed_courses() {
            courses.entry(course.author_id).or_default().push(course);
        }

        Self {
            authors: Arc::new(RwLock::new(authors)),
            courses: Arc::new(RwLock::new(courses)),
        }
    }

    fn matches(author: &Author, filter: &AuthorFilter) -> bool {
        let category_matches = filter
            .main_category()
            .is_none_or(|category| author.main_category == category);

        let search_matches = filter.search_query().is_none_or(|query| {
            author.main_category.contains(query)
                || author.first_name.contains(query)
                || author.last_name.contains(query)
        });

        category_matches && search_matches
    }
}

#[async_trait]
impl CourseLibraryRepository for InMemoryCourseLibraryRepository {
    async fn get_authors(
        &self,
        filter: &AuthorFilter,
        ordering: &[SortInstruction],
        page_number: usize,
        page_size: usize,
    ) -> Result<PagedList<Author>> {
        let mut selected: Vec<Author> = {
            let authors = self
                .authors
                .read()
                .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

            authors
                .iter()
                .filter(|author| Self::matches(author, filter))
                .cloned()
                .collect()
        };

        apply_ordering(&mut selected, ordering)?;

        tracing::debug!(
            matched = selected.len(),
            instructions = ordering.len(),
            page_number,
            page_size,
            "author query executed"
        );

        Ok(PagedList::create(selected, page_number, page_size))
    }

    async fn get_author(&self, id: &Uuid) -> Result<Option<Author>> {
        let authors = self
            .authors
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(authors.iter().find(|author| &author.id == id).cloned())
    }

    async fn get_authors_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Author>> {
        let mut found: Vec<Author> = {
            let authors = self
                .authors
                .read()
                .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

            authors
                .iter()
                .filter(|author| ids.contains(&author.id))
                .cloned()
                .collect()
        };

        found.sort_by(|a, b| {
            a.first_name
                .cmp(&b.first_name)
                .then_with(|| a.last_name.cmp(&b.last_name))
        });
        Ok(found)
    }

    async fn add_author(&self, author: Author) -> Result<Author> {
        let mut authors = self
            .authors
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if authors.iter().any(|existing| existing.id == author.id) {
            return Err(anyhow!("Author with id '{}' already exists", author.id));
        }
        authors.push(author.clone());

        let mut courses = self
            .courses
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        courses.entry(author.id).or_default();

        Ok(author)
    }

    async fn author_exists(&self, id: &Uuid) -> Result<bool> {
        let authors = self
            .authors
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(authors.iter().any(|author| &author.id == id))
    }

    async fn get_courses(&self, author_id: &Uuid) -> Result<Vec<Course>> {
        let courses = self
            .courses
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut found = courses.get(author_id).cloned().unwrap_or_default();
        found.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(found)
    }

    async fn add_course(&self, author_id: &Uuid, mut course: Course) -> Result<Course> {
        if !self.author_exists(author_id).await? {
            return Err(anyhow!("Author with id '{}' not found", author_id));
        }

        let mut courses = self
            .courses
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        course.author_id = *author_id;
        courses.entry(*author_id).or_default().push(course.clone());

        Ok(course)
    }

    async fn update_course(&self, author_id: &Uuid, mut course: Course) -> Result<Option<Course>> {
        let mut courses = self
            .courses
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let Some(existing) = courses
            .get_mut(author_id)
            .and_then(|owned| owned.iter_mut().find(|existing| existing.id == course.id))
        else {
            return Ok(None);
        };

        course.author_id = *author_id;
        *existing = course.clone();
        Ok(Some(course))
    }
}

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
        .unwrap_or_default()
}

fn seed_author(id: u128, first: &str, last: &str, born: DateTime<Utc>, category: &str) -> Author {
    Author {
        id: Uuid::from_u128(id),
        first_name: first.to_string(),
        last_name: last.to_string(),
        date_of_birth: born,
        date_of_death: None,
        main_category: category.to_string(),
    }
}

fn seed_authors() -> Vec<Author> {
    vec![
        seed_author(
            0xd28888e9_2ba9_473a_a40f_e38cb54f9b35,
            "Berry",
            "Griffin Beak Eldritch",
            date(1980, 7, 23),
            "Ships",
        ),
        seed_author(
            0xda2fd609_d754_4feb_8acd_c4f9ff13ba96,
            "Nancy",
            "Swashbuckler Rye",
            date(1978, 5, 21),
            "Rum",
        ),
        seed_author(
            0x2902b665_1190_4c70_9915_b9c2d7680450,
            "Eli",
            "Ivory Bones Sweet",
            date(1957, 12, 16),
            "Singing",
        ),
        seed_author(
            0x102b566b_ba1f_404c_b2df_e2cde39ade09,
            "Arnold",
            "The Unseen Stafford",
            date(1957, 3, 6),
            "Singing",
        ),
        seed_author(
            0x5b3621c0_7b12_4e80_9c8b_3398cba7ee05,
            "Seabury",
            "Toxic Reyson",
            date(1956, 11, 23),
            "Maps",
        ),
        seed_author(
            0x2aadd2df_7caf_45ab_9355_7f6332985a87,
            "Rutherford",
            "Fearless Cloven",
            date(1981, 4, 5),
            "General debauchery",
        ),
        seed_author(
            0x2ee49fe3_edf2_4f91_8409_3eb25ce6ca51,
            "Atherton",
            "Crow Ridley",
            date(1982, 10, 11),
            "Rum",
        ),
    ]
}

fn seed_course(id: u128, author_id: u128, title: &str, description: &str) -> Course {
    Course {
        id: Uuid::from_u128(id),
        author_id: Uuid::from_u128(author_id),
        title: title.to_string(),
        description: description.to_string(),
    }
}

fn seed_courses() -> Vec<Course> {
    vec![
        seed_course(
            0x5b1c2b4d_48c7_402a_80c3_cc796ad49c6b,
            0xd28888e9_2ba9_473a_a40f_e38cb54f9b35,
            "Commandeering a Ship Without Getting Caught",
            "Commandeering a ship in rough waters isn't easy.  Commandeering it without getting caught is even harder.  In this course you'll learn how to sail away and avoid those pesky musketeers.",
        ),
        seed_course(
            0xd8663e5e_7494_4f81_8739_6e0de1bea7ee,
            0xd28888e9_2ba9_473a_a40f_e38cb54f9b35,
            "Overthrowing Mutiny",
            "In this course, the author provides tips to avoid, or, if needed, overthrow pirate mutiny.",
        ),
        seed_course(
            0xd173e20d_159e_4127_9ce9_b0ac2564ad97,
            0xda2fd609_d754_4feb_8acd_c4f9ff13ba96,
            "Avoiding Brawls While Drinking as Much Rum as You Desire",
            "Every good pirate loves rum, but it also has a tendency to get you into trouble.  In this course you'll learn how to avoid that.  This new exclusive edition includes an additional chapter on how to run fast without falling while drunk.",
        ),
        seed_course(
            0x40ff5488_fdab_45b5_bc3a_14302d59869a,
            0x2902b665_1190_4c70_9915_b9c2d7680450,
            "Singalong Pirate Hits",
            "In this course you'll learn how to sing all-time favourite pirate songs without sounding like you actually know the words or how to hold a note.",
        ),
    ]
}
