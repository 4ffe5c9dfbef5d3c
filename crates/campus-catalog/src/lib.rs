//! Teacher and course records for the campus platform.
//!
//! Implements catalog writes (teacher and course creation, the latter with
//! an atomic teacher-association write) and the course query service used by
//! the listing page: an optional search term filtered against course titles
//! as a case-sensitive substring.

use campus_types::{Course, Teacher};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("teacher not found: {0}")]
    TeacherNotFound(i64),
    #[error("course not found: {0}")]
    CourseNotFound(i64),
}

/// Parameters for creating a new teacher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeacherParams {
    pub name: String,
    pub surname: String,
    pub age: i64,
    #[serde(default)]
    pub about: String,
}

/// Parameters for creating a new course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourseParams {
    pub title: String,
    #[serde(default)]
    pub info: String,
    pub duration_months: i64,
    pub price: f64,
    /// Teachers assigned to the course. May be empty; duplicates collapse
    /// to a single association.
    #[serde(default)]
    pub teacher_ids: Vec<i64>,
}

/// Creates a new teacher and returns the stored record.
pub fn create_teacher(
    conn: &Connection,
    params: &CreateTeacherParams,
) -> Result<Teacher, CatalogError> {
    let teacher = conn.query_row(
        "INSERT INTO teachers (name, surname, age, about) VALUES (?1, ?2, ?3, ?4)
         RETURNING id, name, surname, age, about, created_at",
        params![params.name, params.surname, params.age, params.about],
        map_row_to_teacher,
    )?;

    tracing::info!(teacher_id = teacher.id, "created teacher");
    Ok(teacher)
}

/// Retrieves a teacher by id.
pub fn get_teacher(conn: &Connection, teacher_id: i64) -> Result<Teacher, CatalogError> {
    conn.query_row(
        "SELECT id, name, surname, age, about, created_at FROM teachers WHERE id = ?1",
        [teacher_id],
        map_row_to_teacher,
    )
    .optional()?
    .ok_or(CatalogError::TeacherNotFound(teacher_id))
}

/// Lists all teachers in id order.
pub fn list_teachers(conn: &Connection) -> Result<Vec<Teacher>, CatalogError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, surname, age, about, created_at FROM teachers ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], map_row_to_teacher)?;
    let mut teachers = Vec::new();
    for row in rows {
        teachers.push(row?);
    }
    Ok(teachers)
}

/// Creates a new course together with its teacher associations.
///
/// The course row and every `course_teachers` row are written in a single
/// transaction: if any referenced teacher does not exist, nothing is
/// persisted and `TeacherNotFound` names the offending id.
pub fn create_course(
    conn: &Connection,
    params: &CreateCourseParams,
) -> Result<Course, CatalogError> {
    let teacher_ids: BTreeSet<i64> = params.teacher_ids.iter().copied().collect();

    let tx = conn.unchecked_transaction()?;

    for &teacher_id in &teacher_ids {
        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM teachers WHERE id = ?1)",
            [teacher_id],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(CatalogError::TeacherNotFound(teacher_id));
        }
    }

    let course = tx.query_row(
        "INSERT INTO courses (title, info, duration_months, price) VALUES (?1, ?2, ?3, ?4)
         RETURNING id, title, info, duration_months, price, created_at",
        params![
            params.title,
            params.info,
            params.duration_months,
            params.price
        ],
        map_row_to_course,
    )?;

    for &teacher_id in &teacher_ids {
        tx.execute(
            "INSERT INTO course_teachers (course_id, teacher_id) VALUES (?1, ?2)",
            params![course.id, teacher_id],
        )?;
    }

    tx.commit()?;

    tracing::info!(
        course_id = course.id,
        teachers = teacher_ids.len(),
        "created course"
    );
    Ok(course)
}

/// Retrieves a course by id.
pub fn get_course(conn: &Connection, course_id: i64) -> Result<Course, CatalogError> {
    conn.query_row(
        "SELECT id, title, info, duration_months, price, created_at FROM courses WHERE id = ?1",
        [course_id],
        map_row_to_course,
    )
    .optional()?
    .ok_or(CatalogError::CourseNotFound(course_id))
}

/// Lists courses, optionally filtered by a title search term.
///
/// With no term (or an empty one) every course is returned. A present term
/// matches as a case-sensitive substring of the title, so `instr` is used
/// rather than `LIKE` (case-insensitive for ASCII in SQLite). The `?1 = ''`
/// guard keeps the empty term matching every title, since the empty string
/// is a substring of every string.
pub fn list_courses(conn: &Connection, search: Option<&str>) -> Result<Vec<Course>, CatalogError> {
    let mut courses = Vec::new();

    match search {
        None => {
            let mut stmt = conn.prepare(
                "SELECT id, title, info, duration_months, price, created_at
                 FROM courses ORDER BY id ASC",
            )?;
            let rows = stmt.query_map([], map_row_to_course)?;
            for row in rows {
                courses.push(row?);
            }
        }
        Some(term) => {
            let mut stmt = conn.prepare(
                "SELECT id, title, info, duration_months, price, created_at
                 FROM courses
                 WHERE ?1 = '' OR instr(title, ?1) > 0
                 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map([term], map_row_to_course)?;
            for row in rows {
                courses.push(row?);
            }
        }
    }

    Ok(courses)
}

/// Lists the teachers assigned to a course, in id order.
///
/// Returns `CourseNotFound` for an unknown course so callers can distinguish
/// "no teachers assigned" from "no such course".
pub fn teachers_for_course(conn: &Connection, course_id: i64) -> Result<Vec<Teacher>, CatalogError> {
    let _ = get_course(conn, course_id)?;

    let mut stmt = conn.prepare(
        "SELECT t.id, t.name, t.surname, t.age, t.about, t.created_at
         FROM teachers t
         JOIN course_teachers ct ON ct.teacher_id = t.id
         WHERE ct.course_id = ?1
         ORDER BY t.id ASC",
    )?;

    let rows = stmt.query_map([course_id], map_row_to_teacher)?;
    let mut teachers = Vec::new();
    for row in rows {
        teachers.push(row?);
    }
    Ok(teachers)
}

/// Lists the courses a teacher is assigned to, in id order.
pub fn courses_for_teacher(conn: &Connection, teacher_id: i64) -> Result<Vec<Course>, CatalogError> {
    let _ = get_teacher(conn, teacher_id)?;

    let mut stmt = conn.prepare(
        "SELECT c.id, c.title, c.info, c.duration_months, c.price, c.created_at
         FROM courses c
         JOIN course_teachers ct ON ct.course_id = c.id
         WHERE ct.teacher_id = ?1
         ORDER BY c.id ASC",
    )?;

    let rows = stmt.query_map([teacher_id], map_row_to_course)?;
    let mut courses = Vec::new();
    for row in rows {
        courses.push(row?);
    }
    Ok(courses)
}

fn map_row_to_teacher(row: &Row) -> rusqlite::Result<Teacher> {
    Ok(Teacher {
        id: row.get(0)?,
        name: row.get(1)?,
        surname: row.get(2)?,
        age: row.get(3)?,
        about: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn map_row_to_course(row: &Row) -> rusqlite::Result<Course> {
    Ok(Course {
        id: row.get(0)?,
        title: row.get(1)?,
        info: row.get(2)?,
        duration_months: row.get(3)?,
        price: row.get(4)?,
        created_at: row.get(5)?,
    })
}
