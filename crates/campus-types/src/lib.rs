//! Shared record types and constants for the campus platform.
//!
//! This crate provides the foundational types used across all campus crates:
//! the three entity records (teachers, courses, students) and the field
//! limits the record store enforces.
//!
//! No crate in the workspace depends on anything *except* `campus-types` for
//! cross-cutting type definitions. This keeps the dependency graph clean and
//! prevents circular dependencies.

use serde::{Deserialize, Serialize};

/// Maximum length of a person's name or surname.
pub const MAX_PERSON_NAME_LEN: usize = 50;

/// Maximum length of a course title.
pub const MAX_COURSE_TITLE_LEN: usize = 255;

/// Maximum length of the free-text fields (`Teacher::about`, `Course::info`).
pub const MAX_TEXT_LEN: usize = 1024;

/// A teacher record.
///
/// Teachers are created through administrative tooling and never deleted by
/// the core services; they are referenced from courses through a
/// many-to-many association maintained by the record store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Teacher {
    /// Store-assigned id.
    pub id: i64,
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Age in years.
    pub age: i64,
    /// Free-text biography shown on the teacher detail page.
    pub about: String,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
}

/// A course record.
///
/// The teacher set is not embedded here; it is resolved through the
/// association table when a detail view needs it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    /// Store-assigned id.
    pub id: i64,
    /// Course title, the field the search service filters on.
    pub title: String,
    /// Free-text course description.
    pub info: String,
    /// Course length in months.
    pub duration_months: i64,
    /// Course price.
    pub price: f64,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
}

/// A student record.
///
/// `course_ids` holds the duplicate-free set of courses the student is
/// enrolled in, in ascending id order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Student {
    /// Store-assigned id.
    pub id: i64,
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Age in years.
    pub age: i64,
    /// Ids of the courses this student is enrolled in.
    pub course_ids: Vec<i64>,
    /// Enrollment timestamp (ISO 8601).
    pub created_at: String,
}

impl Teacher {
    /// Display name in "name surname" form, as rendered by the boundary.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

impl Student {
    /// Display name in "name surname" form, as rendered by the boundary.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}
