//! Paging state and paged results

use serde::Serialize;

/// Position of one page inside a larger ordered collection
///
/// Supplied by the repository alongside the page items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    /// Total number of items (after filters)
    pub total_count: usize,

    /// Number of items per page
    pub page_size: usize,

    /// Current page number (starts at 1)
    pub current_page: usize,

    /// Total number of pages
    pub total_pages: usize,

    pub has_previous: bool,
    pub has_next: bool,
}

impl PageState {
    /// Derive page state from position and totals
    ///
    /// `has_previous` holds iff `current_page > 1`, `has_next` iff
    /// `current_page < total_pages`.
    pub fn new(current_page: usize, page_size: usize, total_count: usize) -> Self {
        // Ensure page size is at least 1 to avoid division by zero
        let page_size = page_size.max(1);
        let current_page = current_page.max(1);
        let total_pages = total_count.div_ceil(page_size);

        Self {
            total_count,
            page_size,
            current_page,
            total_pages,
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
        }
    }

    /// Zero-based offset of the first item on the current page
    ///
    /// Saturates, so a page far past the end yields an empty slice.
    pub fn offset(&self) -> usize {
        (self.current_page - 1).saturating_mul(self.page_size)
    }
}

/// One page of items plus its [`PageState`]
#[derive(Debug, Clone, PartialEq)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub state: PageState,
}

impl<T> PagedList<T> {
    /// Cut one page out of an already filtered and ordered sequence
    ///
    /// # Example
    /// ```rust,ignore
    /// let page = PagedList::create(authors, 2, 10);
    /// assert_eq!(page.state.current_page, 2);
    /// ```
    pub fn create(source: Vec<T>, page_number: usize, page_size: usize) -> Self {
        let state = PageState::new(page_number, page_size, source.len());
        let items = source
            .into_iter()
            .skip(state.offset())
            .take(state.page_size)
            .collect();
        Self { items, state }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedList<U> {
        PagedList {
            items: self.items.into_iter().map(f).collect(),
            state: self.state,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Which page a collection URI points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceUriType {
    PreviousPage,
    NextPage,
    Current,
}

impl ResourceUriType {
    /// Page number this URI type targets, relative to `current_page`
    pub fn page_number(self, current_page: usize) -> usize {
        match self {
            ResourceUriType::PreviousPage => current_page.saturating_sub(1).max(1),
            ResourceUriType::NextPage => current_page.saturating_add(1),
            ResourceUriType::Current => current_page,
        }
    }
}

/// Pagination metadata sent alongside a collection
///
/// Serialized into the `X-Pagination` response header. Page links are
/// `null` when no such page exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub total_count: usize,
    pub page_size: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub previous_page_link: Option<String>,
    pub next_page_link: Option<String>,
}

impl PaginationMetadata {
    /// Build metadata, resolving page links only where the page exists
    pub fn new(
        state: &PageState,
        mut page_uri: impl FnMut(ResourceUriType) -> Option<String>,
    ) -> Self {
        Self {
            total_count: state.total_count,
            page_size: state.page_size,
            current_page: state.current_page,
            total_pages: state.total_pages,
            previous_page_link: if state.has_previous {
                page_uri(ResourceUriType::PreviousPage)
            } else {
                None
            },
            next_page_link: if state.has_next {
                page_uri(ResourceUriType::NextPage)
            } else {
                None
            },
        }
    }
}
