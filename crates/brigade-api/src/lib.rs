//! JSON REST API for the Brigade cooking-school backend.
//!
//! Exposes an axum [`Router`] backed by any [`brigade_core::store::SchoolStore`].
//! Every route except `/api/auth/authenticate` requires a bearer token; write
//! routes additionally require the `ADMIN` role.

pub mod auth;
pub mod courses;
pub mod error;
pub mod instructors;
pub mod students;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post, put},
};
use brigade_core::{
  mapper::PasswordEncoder,
  service::{CourseService, InstructorService, StudentService},
  store::SchoolStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthKeys;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  pub store_path:      PathBuf,
  /// HS256 signing secret for access tokens.
  pub jwt_secret:      String,
  #[serde(default = "default_token_ttl_secs")]
  pub token_ttl_secs:  u64,
  /// Seeded on startup when no account with that username exists yet.
  pub bootstrap_admin: Option<BootstrapAdmin>,
}

fn default_token_ttl_secs() -> u64 { 3 * 60 * 60 }

#[derive(Deserialize, Clone)]
pub struct BootstrapAdmin {
  pub username: String,
  pub password: String,
  pub vat:      String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S: SchoolStore> {
  pub store:       Arc<S>,
  pub courses:     CourseService<S>,
  pub instructors: InstructorService<S>,
  pub students:    StudentService<S>,
  pub encoder:     Arc<dyn PasswordEncoder>,
  pub auth:        Arc<AuthKeys>,
}

impl<S: SchoolStore> Clone for AppState<S> {
  fn clone(&self) -> Self {
    AppState {
      store:       Arc::clone(&self.store),
      courses:     self.courses.clone(),
      instructors: self.instructors.clone(),
      students:    self.students.clone(),
      encoder:     Arc::clone(&self.encoder),
      auth:        Arc::clone(&self.auth),
    }
  }
}

impl<S: SchoolStore> AppState<S> {
  pub fn new(store: Arc<S>, encoder: Arc<dyn PasswordEncoder>, auth: AuthKeys) -> Self {
    AppState {
      courses:     CourseService::new(Arc::clone(&store)),
      instructors: InstructorService::new(Arc::clone(&store), Arc::clone(&encoder)),
      students:    StudentService::new(Arc::clone(&store)),
      store,
      encoder,
      auth:        Arc::new(auth),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full API router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: SchoolStore + 'static,
{
  Router::new()
    .route("/api/auth/authenticate", post(auth::authenticate::<S>))
    // Courses (keyed by numeric id)
    .route(
      "/api/courses",
      post(courses::create::<S>).get(courses::list::<S>),
    )
    .route("/api/courses/search", post(courses::search::<S>))
    .route(
      "/api/courses/{id}",
      put(courses::update::<S>).get(courses::get_one::<S>),
    )
    // Instructors (keyed by external uuid)
    .route(
      "/api/instructors",
      post(instructors::create::<S>).get(instructors::list::<S>),
    )
    .route("/api/instructors/search", post(instructors::search::<S>))
    .route(
      "/api/instructors/{uuid}",
      put(instructors::update::<S>).get(instructors::get_one::<S>),
    )
    // Students (keyed by external uuid)
    .route(
      "/api/students",
      post(students::create::<S>).get(students::list::<S>),
    )
    .route("/api/students/search", post(students::search::<S>))
    .route(
      "/api/students/{uuid}",
      put(students::update::<S>).get(students::get_one::<S>),
    )
    .route("/api/health", get(|| async { "ok" }))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
