//! Student records and the enrollment service.
//!
//! An enrollment submission carries the student's attributes and the set of
//! courses to enroll in. Validation happens up front: required fields,
//! length bounds, a non-negative age, and course ids that must reference
//! existing courses. The student row and its `student_courses` rows are then
//! written in a single transaction; a failed enrollment persists nothing.

use campus_types::{Course, Student, MAX_PERSON_NAME_LEN};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// A rejected enrollment submission. Each variant names the field that
/// failed so the boundary can surface it next to the form input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("field '{field}' is required")]
    MissingField { field: &'static str },
    #[error("field '{field}' exceeds the maximum length of {max}")]
    FieldTooLong { field: &'static str, max: usize },
    #[error("field 'age' must be non-negative")]
    NegativeAge,
    #[error("unknown course id: {0}")]
    UnknownCourse(i64),
}

impl ValidationError {
    /// The name of the form field this error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } | Self::FieldTooLong { field, .. } => field,
            Self::NegativeAge => "age",
            Self::UnknownCourse(_) => "course_ids",
        }
    }
}

/// Errors that can occur during enrollment operations.
#[derive(Debug, Error)]
pub enum EnrollmentError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("student not found: {0}")]
    StudentNotFound(i64),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// An enrollment submission as received from the form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollStudentParams {
    pub name: String,
    pub surname: String,
    pub age: i64,
    /// Courses to enroll in. May be empty; duplicates collapse to a single
    /// association.
    #[serde(default)]
    pub course_ids: Vec<i64>,
}

fn validate_person_field(
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    if value.len() > MAX_PERSON_NAME_LEN {
        return Err(ValidationError::FieldTooLong {
            field,
            max: MAX_PERSON_NAME_LEN,
        });
    }
    Ok(())
}

/// Validates the attribute fields of a submission. Course references are
/// checked against the store inside [`enroll_student`]'s transaction.
fn validate_attributes(params: &EnrollStudentParams) -> Result<(), ValidationError> {
    validate_person_field("name", &params.name)?;
    validate_person_field("surname", &params.surname)?;
    if params.age < 0 {
        return Err(ValidationError::NegativeAge);
    }
    Ok(())
}

/// Enrolls a new student.
///
/// On success the student row and one association row per distinct course id
/// are committed together and the stored record is returned. On any failure
/// (attribute validation or an unknown course id) nothing is written.
pub fn enroll_student(
    conn: &Connection,
    params: &EnrollStudentParams,
) -> Result<Student, EnrollmentError> {
    validate_attributes(params)?;

    let course_ids: BTreeSet<i64> = params.course_ids.iter().copied().collect();

    let tx = conn.unchecked_transaction()?;

    for &course_id in &course_ids {
        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM courses WHERE id = ?1)",
            [course_id],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(ValidationError::UnknownCourse(course_id).into());
        }
    }

    let (student_id, created_at): (i64, String) = tx.query_row(
        "INSERT INTO students (name, surname, age) VALUES (?1, ?2, ?3)
         RETURNING id, created_at",
        params![params.name, params.surname, params.age],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    for &course_id in &course_ids {
        tx.execute(
            "INSERT INTO student_courses (student_id, course_id) VALUES (?1, ?2)",
            params![student_id, course_id],
        )?;
    }

    tx.commit()?;

    tracing::info!(
        student_id,
        courses = course_ids.len(),
        "enrolled student"
    );

    Ok(Student {
        id: student_id,
        name: params.name.clone(),
        surname: params.surname.clone(),
        age: params.age,
        course_ids: course_ids.into_iter().collect(),
        created_at,
    })
}

/// Retrieves a student by id, with the enrolled course ids loaded.
pub fn get_student(conn: &Connection, student_id: i64) -> Result<Student, EnrollmentError> {
    let mut student = conn
        .query_row(
            "SELECT id, name, surname, age, created_at FROM students WHERE id = ?1",
            [student_id],
            map_row_to_student_base,
        )
        .optional()?
        .ok_or(EnrollmentError::StudentNotFound(student_id))?;

    student.course_ids = course_ids_for_student(conn, student.id)?;
    Ok(student)
}

/// Lists the students enrolled in a course, in id order.
///
/// Used by the course detail page. The course itself is not checked here;
/// callers resolve the course first and treat an unknown id as not found.
pub fn students_for_course(
    conn: &Connection,
    course_id: i64,
) -> Result<Vec<Student>, EnrollmentError> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.name, s.surname, s.age, s.created_at
         FROM students s
         JOIN student_courses sc ON sc.student_id = s.id
         WHERE sc.course_id = ?1
         ORDER BY s.id ASC",
    )?;

    let rows = stmt.query_map([course_id], map_row_to_student_base)?;
    let mut students = Vec::new();
    for row in rows {
        let mut student = row?;
        student.course_ids = course_ids_for_student(conn, student.id)?;
        students.push(student);
    }
    Ok(students)
}

/// Lists the courses a student is enrolled in, in id order.
pub fn courses_for_student(
    conn: &Connection,
    student_id: i64,
) -> Result<Vec<Course>, EnrollmentError> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.title, c.info, c.duration_months, c.price, c.created_at
         FROM courses c
         JOIN student_courses sc ON sc.course_id = c.id
         WHERE sc.student_id = ?1
         ORDER BY c.id ASC",
    )?;

    let rows = stmt.query_map([student_id], |row| {
        Ok(Course {
            id: row.get(0)?,
            title: row.get(1)?,
            info: row.get(2)?,
            duration_months: row.get(3)?,
            price: row.get(4)?,
            created_at: row.get(5)?,
        })
    })?;
    let mut courses = Vec::new();
    for row in rows {
        courses.push(row?);
    }
    Ok(courses)
}

fn course_ids_for_student(conn: &Connection, student_id: i64) -> Result<Vec<i64>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT course_id FROM student_courses WHERE student_id = ?1 ORDER BY course_id ASC",
    )?;
    let rows = stmt.query_map([student_id], |row| row.get(0))?;
    let mut ids = Vec::new();
    for row in rows {
        ids.push(row?);
    }
    Ok(ids)
}

/// Maps a student row without its associations; callers fill `course_ids`.
fn map_row_to_student_base(row: &Row) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        surname: row.get(2)?,
        age: row.get(3)?,
        course_ids: Vec::new(),
        created_at: row.get(4)?,
    })
}
