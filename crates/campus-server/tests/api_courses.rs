use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use campus_catalog::{create_course, create_teacher, CreateCourseParams, CreateTeacherParams};
use campus_db::{create_pool, run_migrations, DbPool, DbRuntimeSettings};
use campus_server::{app, AppState};
use serde_json::Value;
use tower::ServiceExt;

// Keep the TempDir alive for the duration of each test; the database file
// lives inside it.
fn setup_app() -> (axum::Router, DbPool, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let db_path = dir.path().join("campus.db");
    let pool = create_pool(
        db_path.to_str().expect("path should be utf-8"),
        DbRuntimeSettings::default(),
    )
    .expect("failed to create pool");
    {
        let conn = pool.get().expect("failed to get connection");
        run_migrations(&conn).expect("failed to run migrations");
    }

    let state = AppState { pool: pool.clone() };
    (app(state), pool, dir)
}

fn seed_course(pool: &DbPool, title: &str, teacher_ids: Vec<i64>) -> i64 {
    let conn = pool.get().expect("failed to get connection");
    create_course(
        &conn,
        &CreateCourseParams {
            title: title.to_string(),
            info: String::new(),
            duration_months: 6,
            price: 100.0,
            teacher_ids,
        },
    )
    .expect("failed to seed course")
    .id
}

fn seed_teacher(pool: &DbPool, name: &str, surname: &str) -> i64 {
    let conn = pool.get().expect("failed to get connection");
    create_teacher(
        &conn,
        &CreateTeacherParams {
            name: name.to_string(),
            surname: surname.to_string(),
            age: 45,
            about: "Veteran lecturer".to_string(),
        },
    )
    .expect("failed to seed teacher")
    .id
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_check_returns_ok() {
    let (app, _pool, _dir) = setup_app();

    let (status, json) = get_json(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn list_courses_on_empty_store() {
    let (app, _pool, _dir) = setup_app();

    let (status, json) = get_json(app, "/api/courses").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["quantity"], 0);
    assert_eq!(json["courses"], serde_json::json!([]));
    assert_eq!(json["query"], Value::Null);
}

#[tokio::test]
async fn search_filters_by_title_substring() {
    let (app, pool, _dir) = setup_app();
    seed_course(&pool, "Algebra I", vec![]);
    seed_course(&pool, "Advanced Algebra", vec![]);
    seed_course(&pool, "Biology", vec![]);

    let (status, json) = get_json(app.clone(), "/api/courses?q=Algebra").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["quantity"], 2);
    assert_eq!(json["query"], "Algebra");
    let titles: Vec<&str> = json["courses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Algebra I", "Advanced Algebra"]);

    // Absent term returns everything
    let (_, json) = get_json(app.clone(), "/api/courses").await;
    assert_eq!(json["quantity"], 3);

    // Empty term behaves the same as an absent one
    let (_, json) = get_json(app.clone(), "/api/courses?q=").await;
    assert_eq!(json["quantity"], 3);
    assert_eq!(json["query"], "");

    // Match is case-sensitive; no result is still a 200
    let (status, json) = get_json(app, "/api/courses?q=algebra").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["quantity"], 0);
}

#[tokio::test]
async fn course_detail_includes_teachers_and_roster() {
    let (app, pool, _dir) = setup_app();
    let teacher_id = seed_teacher(&pool, "Grace", "Hopper");
    let course_id = seed_course(&pool, "Compilers", vec![teacher_id]);

    let (status, json) = get_json(app, &format!("/api/courses/{course_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["course"]["title"], "Compilers");
    assert_eq!(json["teachers"][0]["surname"], "Hopper");
    assert_eq!(json["students"], serde_json::json!([]));
}

#[tokio::test]
async fn course_detail_not_found() {
    let (app, _pool, _dir) = setup_app();

    let (status, json) = get_json(app, "/api/courses/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("999"));
}

#[tokio::test]
async fn create_course_over_api() {
    let (app, pool, _dir) = setup_app();
    let teacher_id = seed_teacher(&pool, "Grace", "Hopper");

    let body = serde_json::json!({
        "title": "Compilers",
        "info": "Parsing to codegen",
        "duration_months": 9,
        "price": 250.0,
        "teacher_ids": [teacher_id]
    });
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/courses")
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["title"], "Compilers");
    assert!(json["id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn create_course_with_unknown_teacher_is_rejected() {
    let (app, pool, _dir) = setup_app();

    let body = serde_json::json!({
        "title": "Ghost Course",
        "duration_months": 1,
        "price": 10.0,
        "teacher_ids": [777]
    });
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/courses")
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let conn = pool.get().unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM courses", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0, "rejected create should leave no course behind");
}

#[tokio::test]
async fn create_course_with_overlong_title_is_rejected() {
    let (app, _pool, _dir) = setup_app();

    let body = serde_json::json!({
        "title": "x".repeat(256),
        "duration_months": 1,
        "price": 10.0
    });
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/courses")
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn teacher_listing_and_detail() {
    let (app, pool, _dir) = setup_app();
    let teacher_id = seed_teacher(&pool, "Grace", "Hopper");
    let course_id = seed_course(&pool, "Compilers", vec![teacher_id]);

    let (status, json) = get_json(app.clone(), "/api/teachers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);

    let (status, json) = get_json(app.clone(), &format!("/api/teachers/{teacher_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["teacher"]["name"], "Grace");
    assert_eq!(json["courses"][0]["id"], course_id);

    let (status, _) = get_json(app, "/api/teachers/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_teacher_over_api() {
    let (app, _pool, _dir) = setup_app();

    let body = serde_json::json!({
        "name": "Alan",
        "surname": "Turing",
        "age": 41,
        "about": "Computability"
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/teachers")
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Missing name is rejected before the store is touched
    let body = serde_json::json!({
        "name": "",
        "surname": "Turing",
        "age": 41
    });
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/teachers")
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
