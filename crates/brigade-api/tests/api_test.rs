//! HTTP-level tests: the full router over an in-memory store, exercised with
//! `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use brigade_api::{
  AppState,
  auth::{Argon2Encoder, AuthKeys},
};
use brigade_core::{
  mapper::PasswordEncoder,
  store::SchoolStore,
  user::{Role, UserDraft},
};
use brigade_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt;

const ADMIN_PASSWORD: &str = "Admin!234";

async fn test_router() -> Router {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let encoder: Arc<dyn PasswordEncoder> = Arc::new(Argon2Encoder);
  store
    .insert_user(UserDraft {
      is_active:     true,
      username:      "admin".to_string(),
      password_hash: encoder.encode(ADMIN_PASSWORD).unwrap(),
      role:          Role::Admin,
      vat:           "000000000".to_string(),
    })
    .await
    .unwrap();
  brigade_api::router(AppState::new(
    store,
    encoder,
    AuthKeys::new("test-secret", 3600),
  ))
}

async fn send(
  router: &Router,
  method: &str,
  uri: &str,
  token: Option<&str>,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(token) = token {
    builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
  }
  let request = match body {
    Some(body) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  let response = router.clone().oneshot(request).await.unwrap();
  let status = response.status();
  let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
  };
  (status, value)
}

async fn login(router: &Router, username: &str, password: &str) -> String {
  let (status, body) = send(
    router,
    "POST",
    "/api/auth/authenticate",
    None,
    Some(json!({ "username": username, "password": password })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "login failed: {body}");
  body["token"].as_str().unwrap().to_string()
}

fn course_body(name: &str) -> Value {
  json!({
    "isActive": true,
    "name": name,
    "description": format!("All about {name}"),
    "instructorId": null,
  })
}

#[tokio::test]
async fn requests_without_a_token_are_unauthorized() {
  let router = test_router().await;
  let (status, body) = send(&router, "GET", "/api/courses", None, None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["code"], "Unauthorized");
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
  let router = test_router().await;
  let (status, _) = send(
    &router,
    "POST",
    "/api/auth/authenticate",
    None,
    Some(json!({ "username": "admin", "password": "wrong" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_returns_the_account_profile() {
  let router = test_router().await;
  let (status, body) = send(
    &router,
    "POST",
    "/api/auth/authenticate",
    None,
    Some(json!({ "username": "admin", "password": ADMIN_PASSWORD })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["role"], "ADMIN");
  assert_eq!(body["vat"], "000000000");
  // Not an instructor account, so no name fields.
  assert!(body.get("firstname").is_none());
}

#[tokio::test]
async fn an_admin_can_create_and_fetch_a_course() {
  let router = test_router().await;
  let token = login(&router, "admin", ADMIN_PASSWORD).await;

  let (status, created) = send(
    &router,
    "POST",
    "/api/courses",
    Some(&token),
    Some(course_body("Fresh Pasta")),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let id = created["id"].as_i64().unwrap();

  let (status, fetched) =
    send(&router, "GET", &format!("/api/courses/{id}"), Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched["name"], "Fresh Pasta");
}

#[tokio::test]
async fn a_duplicate_course_name_is_a_409_with_the_field_as_code() {
  let router = test_router().await;
  let token = login(&router, "admin", ADMIN_PASSWORD).await;
  send(&router, "POST", "/api/courses", Some(&token), Some(course_body("Wine"))).await;

  let (status, body) =
    send(&router, "POST", "/api/courses", Some(&token), Some(course_body("Wine"))).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["code"], "Course name");
  assert_eq!(body["message"], "Course with name Wine already exists");
}

#[tokio::test]
async fn an_instructor_token_cannot_write() {
  let router = test_router().await;
  let admin = login(&router, "admin", ADMIN_PASSWORD).await;

  let instructor = json!({
    "isActive": true,
    "firstname": "Maria",
    "lastname": "Papadaki",
    "identityNumber": "AX111222",
    "gender": "FEMALE",
    "user": {
      "isActive": true,
      "username": "mpapadaki",
      "password": "Str0ng!pass",
      "role": "INSTRUCTOR",
      "vat": "112233445",
    },
    "contactDetails": {
      "city": "Athens",
      "street": null,
      "streetNumber": null,
      "postalCode": "10431",
      "email": "mpapadaki@school.test",
      "phoneNumber": "2101234567",
    },
  });
  let (status, _) =
    send(&router, "POST", "/api/instructors", Some(&admin), Some(instructor)).await;
  assert_eq!(status, StatusCode::CREATED);

  let token = login(&router, "mpapadaki", "Str0ng!pass").await;
  let (status, body) =
    send(&router, "POST", "/api/courses", Some(&token), Some(course_body("Wine"))).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  assert_eq!(body["code"], "NotAuthorized");

  // Reads stay open to instructors.
  let (status, _) = send(&router, "GET", "/api/courses", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn a_path_and_body_key_mismatch_is_forbidden() {
  let router = test_router().await;
  let token = login(&router, "admin", ADMIN_PASSWORD).await;
  let (_, created) = send(
    &router,
    "POST",
    "/api/courses",
    Some(&token),
    Some(course_body("Fresh Pasta")),
  )
  .await;
  let id = created["id"].as_i64().unwrap();

  let update = json!({
    "id": id,
    "isActive": true,
    "name": "Fresh Pasta",
    "description": "Updated",
    "instructorId": null,
  });
  let (status, body) = send(
    &router,
    "PUT",
    &format!("/api/courses/{}", id + 1),
    Some(&token),
    Some(update),
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  assert_eq!(body["code"], "NotAuthorized");
}

#[tokio::test]
async fn a_missing_course_is_a_404_with_the_entity_as_code() {
  let router = test_router().await;
  let token = login(&router, "admin", ADMIN_PASSWORD).await;
  let (status, body) = send(&router, "GET", "/api/courses/42", Some(&token), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["code"], "Course");
  assert_eq!(body["message"], "Course with id 42 not found");
}

#[tokio::test]
async fn search_without_a_body_returns_the_default_page() {
  let router = test_router().await;
  let token = login(&router, "admin", ADMIN_PASSWORD).await;
  send(&router, "POST", "/api/courses", Some(&token), Some(course_body("Wine"))).await;

  let (status, body) =
    send(&router, "POST", "/api/courses/search", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["currentPage"], 0);
  assert_eq!(body["pageSize"], 10);
  assert_eq!(body["totalElements"], 1);
  assert_eq!(body["totalPages"], 1);
  assert_eq!(body["numberOfElements"], 1);
  assert_eq!(body["data"][0]["name"], "Wine");
}

#[tokio::test]
async fn validation_failures_render_the_field_map() {
  let router = test_router().await;
  let token = login(&router, "admin", ADMIN_PASSWORD).await;

  let (status, body) = send(
    &router,
    "POST",
    "/api/courses",
    Some(&token),
    Some(json!({
      "isActive": true,
      "name": "  ",
      "description": "",
      "instructorId": null,
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["name"], "name is required");
  assert_eq!(body["description"], "description is required");
}

#[tokio::test]
async fn a_student_without_enrollments_serialises_without_course_ids() {
  let router = test_router().await;
  let token = login(&router, "admin", ADMIN_PASSWORD).await;

  let student = json!({
    "isActive": true,
    "firstname": "Nikos",
    "lastname": "Karras",
    "dateOfBirth": "2001-05-17",
    "vat": "123456789",
    "identityNumber": "ID123456789",
    "gender": "MALE",
    "contactDetails": {
      "city": "Athens",
      "street": null,
      "streetNumber": null,
      "postalCode": null,
      "email": "nkarras@school.test",
      "phoneNumber": "2101234567",
    },
    "courseIds": null,
  });
  let (status, created) =
    send(&router, "POST", "/api/students", Some(&token), Some(student)).await;
  assert_eq!(status, StatusCode::CREATED);
  assert!(created.get("courseIds").is_none());
  assert!(created["uuid"].as_str().is_some_and(|u| !u.is_empty()));
}
