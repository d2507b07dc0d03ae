//! Course resource

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored course, owned by one author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub description: String,
}

crate::impl_shape!(
    CourseDto,
    "CourseDto",
    {
        id: Uuid => "id",
        title: String => "title",
        description: String => "description",
        author_id: Uuid => "authorId",
    }
);

impl From<&Course> for CourseDto {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            title: course.title.clone(),
            description: course.description.clone(),
            author_id: course.author_id,
        }
    }
}

/// Input for creating a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseForCreationDto {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl CourseForCreationDto {
    pub fn into_course(self, author_id: Uuid) -> Course {
        Course {
            id: Uuid::new_v4(),
            author_id,
            title: self.title,
            description: self.description,
        }
    }
}

/// Input for replacing a course; unlike creation, the description is required
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseForUpdateDto {
    pub title: String,
    pub description: String,
}

impl CourseForUpdateDto {
    /// Replacement for the course `course_id` of `author_id`
    pub fn into_course(self, author_id: Uuid, course_id: Uuid) -> Course {
        Course {
            id: course_id,
            author_id,
            title: self.title,
            description: self.description,
        }
    }
}
