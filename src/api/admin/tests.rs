use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::repositories;
use crate::test_support::{self, TEST_PASSWORD};

const ADMIN_EMAIL: &str = "registrar@example.com";

async fn send(
    app: &axum::Router,
    method: Method,
    uri: &str,
    cookie: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(test_support::json_request(method, uri, Some(cookie), body))
        .await
        .expect("response");
    let status = response.status();
    (status, test_support::read_json(response).await)
}

async fn count(pool: &sqlx::PgPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count rows")
}

#[tokio::test]
#[ignore = "requires postgres at DATABASE_URL"]
async fn duplicate_email_leaves_no_partial_student() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let room = test_support::classroom(db).await;
    test_support::insert_admin(db, ADMIN_EMAIL, TEST_PASSWORD).await;
    let admin = test_support::login(&ctx.app, ADMIN_EMAIL, TEST_PASSWORD).await;
    let users_before = count(db, "users").await;

    let (code, body) = send(
        &ctx.app,
        Method::POST,
        "/admin/students",
        &admin,
        Some(json!({
            "name": "Copycat",
            "email": "st-001@students.example.com",
            "password": "long-enough",
            "matric_number": "ST-777",
            "department_id": room.department.id,
            "level_id": room.level.id,
        })),
    )
    .await;

    assert_eq!(code, StatusCode::CONFLICT, "response: {body}");
    assert_eq!(body["detail"], "Student with this email already exists");
    assert_eq!(count(db, "users").await, users_before);
    let orphan: Option<String> =
        sqlx::query_scalar("SELECT user_id FROM students WHERE student_number = 'ST-777'")
            .fetch_optional(db)
            .await
            .expect("lookup student");
    assert_eq!(orphan, None);
}

#[tokio::test]
#[ignore = "requires postgres at DATABASE_URL"]
async fn created_student_can_sign_in_and_is_enrolled() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let room = test_support::classroom(db).await;
    test_support::insert_admin(db, ADMIN_EMAIL, TEST_PASSWORD).await;
    let admin = test_support::login(&ctx.app, ADMIN_EMAIL, TEST_PASSWORD).await;

    let (code, body) = send(
        &ctx.app,
        Method::POST,
        "/admin/students",
        &admin,
        Some(json!({
            "name": "New Student",
            "email": "New.Student@Example.com",
            "password": "long-enough",
            "student_number": "ST-100",
            "department_id": room.department.id,
            "level_id": room.level.id,
            "course_id": room.course.id,
        })),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["email"], "new.student@example.com");
    assert_eq!(body["faculty_id"], room.faculty.id);

    let enrolled = repositories::enrollments::list_course_students(db, &room.course.id)
        .await
        .expect("course students");
    assert!(enrolled.iter().any(|student| student.student_number == "ST-100"));

    test_support::login(&ctx.app, "ST-100", "long-enough").await;
}

#[tokio::test]
#[ignore = "requires postgres at DATABASE_URL"]
async fn deleting_department_removes_its_people() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let room = test_support::classroom(db).await;
    let other = test_support::insert_department(db, "Mathematics", &room.faculty.id).await;
    test_support::insert_student(db, "ST-500", &other.id, &room.level.id, TEST_PASSWORD).await;
    test_support::insert_admin(db, ADMIN_EMAIL, TEST_PASSWORD).await;
    let admin = test_support::login(&ctx.app, ADMIN_EMAIL, TEST_PASSWORD).await;

    let uri = format!("/admin/departments/{}", room.department.id);
    let (code, body) = send(&ctx.app, Method::DELETE, &uri, &admin, None).await;
    assert_eq!(code, StatusCode::OK, "response: {body}");
    assert_eq!(body["deleted"], true);
    assert_eq!(body["students_removed"], 2);
    assert_eq!(body["lecturers_removed"], 1);

    assert_eq!(count(db, "students").await, 1);
    assert_eq!(count(db, "lecturers").await, 0);
    assert_eq!(count(db, "courses").await, 0);
    // Remaining users: the admin and the student of the other department.
    assert_eq!(count(db, "users").await, 2);

    let (code, _) = send(&ctx.app, Method::DELETE, &uri, &admin, None).await;
    assert_eq!(code, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires postgres at DATABASE_URL"]
async fn setup_catalog_round() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    test_support::insert_admin(db, ADMIN_EMAIL, TEST_PASSWORD).await;
    let admin = test_support::login(&ctx.app, ADMIN_EMAIL, TEST_PASSWORD).await;

    let (code, faculty) =
        send(&ctx.app, Method::POST, "/admin/faculties", &admin, Some(json!({ "name": "Science" })))
            .await;
    assert_eq!(code, StatusCode::CREATED);

    let (code, body) =
        send(&ctx.app, Method::POST, "/admin/faculties", &admin, Some(json!({ "name": "Science" })))
            .await;
    assert_eq!(code, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "Faculty with this name already exists");

    let (code, body) = send(
        &ctx.app,
        Method::POST,
        "/admin/departments",
        &admin,
        Some(json!({ "name": "Physics", "faculty_id": "missing" })),
    )
    .await;
    assert_eq!(code, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid selection");

    let (code, department) = send(
        &ctx.app,
        Method::POST,
        "/admin/departments",
        &admin,
        Some(json!({ "name": "Physics", "faculty_id": faculty["id"] })),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED);

    let (_, semester) =
        send(&ctx.app, Method::POST, "/admin/semesters", &admin, Some(json!({ "name": "First" })))
            .await;
    let (code, course) = send(
        &ctx.app,
        Method::POST,
        "/admin/courses",
        &admin,
        Some(json!({
            "name": "Mechanics",
            "department_id": department["id"],
            "semester_id": semester["id"],
            "lecturer_id": "",
        })),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED, "response: {course}");
    assert_eq!(course["lecturer_id"], serde_json::Value::Null);

    let (code, body) = send(&ctx.app, Method::GET, "/admin/overview", &admin, None).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body["faculties"], 1);
    assert_eq!(body["departments"], 1);
    assert_eq!(body["courses"], 1);
    assert_eq!(body["semesters"], 1);
    assert_eq!(body["levels"], 0);
    assert_eq!(body["students"], 0);
    assert_eq!(body["lecturers"], 0);
    assert_eq!(body["user"]["admin_level"], "standard");
}

#[tokio::test]
#[ignore = "requires postgres at DATABASE_URL"]
async fn overlong_values_are_validation_errors() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let room = test_support::classroom(db).await;
    test_support::insert_admin(db, ADMIN_EMAIL, TEST_PASSWORD).await;
    let admin = test_support::login(&ctx.app, ADMIN_EMAIL, TEST_PASSWORD).await;

    let (code, body) = send(
        &ctx.app,
        Method::POST,
        "/admin/levels",
        &admin,
        Some(json!({ "name": "L".repeat(30) })),
    )
    .await;
    assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY, "response: {body}");
    assert!(body["fields"]["name"].is_array());

    let (code, body) = send(
        &ctx.app,
        Method::POST,
        "/admin/semesters",
        &admin,
        Some(json!({ "name": "S".repeat(60) })),
    )
    .await;
    assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY, "response: {body}");
    assert!(body["fields"]["name"].is_array());

    let long_email = format!("{}@{}.example.com", "a".repeat(60), "b".repeat(60));
    let (code, body) = send(
        &ctx.app,
        Method::POST,
        "/admin/students",
        &admin,
        Some(json!({
            "name": "Long Mail",
            "email": long_email,
            "password": "long-enough",
            "student_number": "ST-500",
            "department_id": room.department.id,
            "level_id": room.level.id,
        })),
    )
    .await;
    assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY, "response: {body}");
    assert!(body["fields"]["email"].is_array());

    assert_eq!(count(db, "levels").await, 1);
    assert_eq!(count(db, "semesters").await, 1);
    assert_eq!(count(db, "students").await, 2);
}

#[tokio::test]
#[ignore = "requires postgres at DATABASE_URL"]
async fn column_overflow_maps_to_value_too_long() {
    let ctx = test_support::setup_test_context().await;

    let err = repositories::levels::create(
        ctx.state.db(),
        "level-overflow",
        &"L".repeat(30),
        crate::core::time::primitive_now_utc(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, crate::db::errors::StoreError::ValueTooLong), "{err:?}");
}

#[tokio::test]
#[ignore = "requires postgres at DATABASE_URL"]
async fn blank_names_are_rejected() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    test_support::insert_admin(db, ADMIN_EMAIL, TEST_PASSWORD).await;
    let admin = test_support::login(&ctx.app, ADMIN_EMAIL, TEST_PASSWORD).await;

    let (code, body) =
        send(&ctx.app, Method::POST, "/admin/faculties", &admin, Some(json!({ "name": "   " })))
            .await;
    assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY, "response: {body}");
    assert!(body["fields"]["name"].is_array());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::form_request(
            Method::POST,
            "/admin/levels",
            Some(&admin),
            "name=%20%20%20",
        ))
        .await
        .expect("form response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let (code, faculty) = send(
        &ctx.app,
        Method::POST,
        "/admin/faculties",
        &admin,
        Some(json!({ "name": "  Arts  " })),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED);
    assert_eq!(faculty["name"], "Arts");
    assert_eq!(count(db, "faculties").await, 1);
    assert_eq!(count(db, "levels").await, 0);
}

#[tokio::test]
#[ignore = "requires postgres at DATABASE_URL"]
async fn admin_pages_reject_other_roles() {
    let ctx = test_support::setup_test_context().await;
    test_support::classroom(ctx.state.db()).await;
    let lecturer = test_support::login(&ctx.app, "SN-001", TEST_PASSWORD).await;

    let (code, _) = send(&ctx.app, Method::GET, "/admin/overview", &lecturer, None).await;
    assert_eq!(code, StatusCode::FORBIDDEN);
}
