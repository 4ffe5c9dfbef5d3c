//! Student enrollment handlers.

use crate::api::{with_conn, ApiError};
use crate::AppState;
use axum::{
    extract::{Extension, Path},
    response::Json,
};
use campus_enrollment::{
    courses_for_student, enroll_student, get_student, EnrollStudentParams, EnrollmentError,
};
use campus_types::{Course, Student};
use serde::Serialize;
use std::sync::Arc;

fn enrollment_err_to_api(e: EnrollmentError) -> ApiError {
    match e {
        EnrollmentError::Validation(v) => ApiError::Validation(v),
        EnrollmentError::StudentNotFound(id) => ApiError::NotFound(format!("student {id}")),
        EnrollmentError::Database(err) => {
            tracing::error!(error = %err, "enrollment operation failed");
            ApiError::InternalServerError("enrollment operation failed".to_string())
        }
    }
}

/// POST /api/students
///
/// The enrollment form submission. Validation failures come back as 400
/// with the failing field named in the body; on success the stored student
/// is returned with its assigned id.
pub async fn enroll_student_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<EnrollStudentParams>,
) -> Result<Json<Student>, ApiError> {
    let student = with_conn(&state, move |conn| {
        enroll_student(conn, &payload).map_err(enrollment_err_to_api)
    })
    .await?;

    tracing::info!(
        student_id = student.id,
        student = %student.full_name(),
        courses = student.course_ids.len(),
        "student enrolled"
    );

    Ok(Json(student))
}

/// Response for `GET /api/students/{id}`: the student with the full course
/// records they are enrolled in.
#[derive(Debug, Serialize)]
pub struct StudentDetailResponse {
    pub student: Student,
    pub courses: Vec<Course>,
}

/// GET /api/students/{id}
pub async fn get_student_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(student_id): Path<i64>,
) -> Result<Json<StudentDetailResponse>, ApiError> {
    let detail = with_conn(&state, move |conn| {
        let student = get_student(conn, student_id).map_err(enrollment_err_to_api)?;
        let courses = courses_for_student(conn, student_id).map_err(enrollment_err_to_api)?;
        Ok(StudentDetailResponse { student, courses })
    })
    .await?;

    Ok(Json(detail))
}
