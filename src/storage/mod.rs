//! Storage implementations

pub mod in_memory;
pub mod ordering;

pub use in_memory::InMemoryCourseLibraryRepository;
pub use ordering::{OrderKey, Orderable, apply_ordering};
