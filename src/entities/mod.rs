//! Resources of the course library and their output shapes

pub mod macros;

pub mod author;
pub mod course;

pub use author::{
    AUTHOR_RELATIONS, Author, AuthorDto, AuthorForCreationDto, AuthorForCreationWithDateOfDeathDto,
    AuthorFullDto, AuthorsQuery, AuthorsResourceParameters, author_property_mapping,
};
pub use course::{Course, CourseDto, CourseForCreationDto, CourseForUpdateDto};
