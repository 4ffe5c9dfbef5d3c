//! Course and teacher handlers: the listing/search page, detail pages, and
//! the administrative create endpoints.

use crate::api::{with_conn, ApiError};
use crate::AppState;
use axum::{
    extract::{Extension, Path, Query},
    response::Json,
};
use campus_catalog::{
    create_course, create_teacher, courses_for_teacher, get_course, get_teacher, list_courses,
    list_teachers, teachers_for_course, CatalogError, CreateCourseParams, CreateTeacherParams,
};
use campus_enrollment::students_for_course;
use campus_types::{Course, Teacher, MAX_COURSE_TITLE_LEN, MAX_PERSON_NAME_LEN, MAX_TEXT_LEN};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Maps a [`CatalogError`] from a read path, logging non-404 errors.
fn catalog_err_to_api(e: CatalogError) -> ApiError {
    match e {
        CatalogError::TeacherNotFound(id) => ApiError::NotFound(format!("teacher {id}")),
        CatalogError::CourseNotFound(id) => ApiError::NotFound(format!("course {id}")),
        CatalogError::Database(err) => {
            tracing::error!(error = %err, "catalog operation failed");
            ApiError::InternalServerError("catalog operation failed".to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search term from the listing form; absent when the form is blank.
    pub q: Option<String>,
}

/// Response for `GET /api/courses`: the triple the listing page renders
/// (result set, submitted term, result count).
#[derive(Debug, Serialize)]
pub struct CourseListResponse {
    pub courses: Vec<Course>,
    pub query: Option<String>,
    pub quantity: usize,
}

/// GET /api/courses?q=term
pub async fn list_courses_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<CourseListResponse>, ApiError> {
    let query = params.q;
    let term = query.clone();

    let courses = with_conn(&state, move |conn| {
        list_courses(conn, term.as_deref()).map_err(catalog_err_to_api)
    })
    .await?;

    let quantity = courses.len();
    Ok(Json(CourseListResponse {
        courses,
        query,
        quantity,
    }))
}

/// Response for `GET /api/courses/{id}`: the course with its teacher set
/// and enrolled students.
#[derive(Debug, Serialize)]
pub struct CourseDetailResponse {
    pub course: Course,
    pub teachers: Vec<Teacher>,
    pub students: Vec<campus_types::Student>,
}

/// GET /api/courses/{id}
pub async fn get_course_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(course_id): Path<i64>,
) -> Result<Json<CourseDetailResponse>, ApiError> {
    let detail = with_conn(&state, move |conn| {
        let course = get_course(conn, course_id).map_err(catalog_err_to_api)?;
        let teachers = teachers_for_course(conn, course_id).map_err(catalog_err_to_api)?;
        let students = students_for_course(conn, course_id).map_err(|e| {
            tracing::error!(error = %e, course_id, "failed to load course roster");
            ApiError::InternalServerError("failed to load course roster".to_string())
        })?;
        Ok(CourseDetailResponse {
            course,
            teachers,
            students,
        })
    })
    .await?;

    Ok(Json(detail))
}

/// POST /api/courses
pub async fn create_course_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CreateCourseParams>,
) -> Result<Json<Course>, ApiError> {
    if payload.title.is_empty() || payload.title.len() > MAX_COURSE_TITLE_LEN {
        return Err(ApiError::BadRequest(format!(
            "title must be 1..={MAX_COURSE_TITLE_LEN} bytes"
        )));
    }
    if payload.info.len() > MAX_TEXT_LEN {
        return Err(ApiError::BadRequest(format!(
            "info must be at most {MAX_TEXT_LEN} bytes"
        )));
    }
    if payload.duration_months < 0 {
        return Err(ApiError::BadRequest(
            "duration_months must be non-negative".to_string(),
        ));
    }
    if !payload.price.is_finite() || payload.price < 0.0 {
        return Err(ApiError::BadRequest(
            "price must be a non-negative number".to_string(),
        ));
    }

    let course = with_conn(&state, move |conn| {
        create_course(conn, &payload).map_err(|e| match e {
            // An unknown teacher in a create payload is a caller mistake,
            // not a missing resource.
            CatalogError::TeacherNotFound(id) => {
                ApiError::BadRequest(format!("unknown teacher id: {id}"))
            }
            other => catalog_err_to_api(other),
        })
    })
    .await?;

    Ok(Json(course))
}

/// GET /api/teachers
pub async fn list_teachers_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Teacher>>, ApiError> {
    let teachers = with_conn(&state, move |conn| {
        list_teachers(conn).map_err(catalog_err_to_api)
    })
    .await?;

    Ok(Json(teachers))
}

/// Response for `GET /api/teachers/{id}`: the teacher with the courses they
/// are assigned to.
#[derive(Debug, Serialize)]
pub struct TeacherDetailResponse {
    pub teacher: Teacher,
    pub courses: Vec<Course>,
}

/// GET /api/teachers/{id}
pub async fn get_teacher_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(teacher_id): Path<i64>,
) -> Result<Json<TeacherDetailResponse>, ApiError> {
    let detail = with_conn(&state, move |conn| {
        let teacher = get_teacher(conn, teacher_id).map_err(catalog_err_to_api)?;
        let courses = courses_for_teacher(conn, teacher_id).map_err(catalog_err_to_api)?;
        Ok(TeacherDetailResponse { teacher, courses })
    })
    .await?;

    Ok(Json(detail))
}

/// POST /api/teachers
pub async fn create_teacher_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CreateTeacherParams>,
) -> Result<Json<Teacher>, ApiError> {
    for (field, value) in [("name", &payload.name), ("surname", &payload.surname)] {
        if value.is_empty() || value.len() > MAX_PERSON_NAME_LEN {
            return Err(ApiError::BadRequest(format!(
                "{field} must be 1..={MAX_PERSON_NAME_LEN} bytes"
            )));
        }
    }
    if payload.about.len() > MAX_TEXT_LEN {
        return Err(ApiError::BadRequest(format!(
            "about must be at most {MAX_TEXT_LEN} bytes"
        )));
    }
    if payload.age < 0 {
        return Err(ApiError::BadRequest("age must be non-negative".to_string()));
    }

    let teacher = with_conn(&state, move |conn| {
        create_teacher(conn, &payload).map_err(catalog_err_to_api)
    })
    .await?;

    Ok(Json(teacher))
}
