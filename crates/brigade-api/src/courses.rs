//! Handlers for `/api/courses` endpoints.
//!
//! | Method | Path | Role |
//! |--------|------|------|
//! | `POST` | `/api/courses` | admin |
//! | `PUT`  | `/api/courses/{id}` | admin; path id must equal body id |
//! | `GET`  | `/api/courses` | admin, instructor |
//! | `GET`  | `/api/courses/{id}` | admin, instructor |
//! | `POST` | `/api/courses/search` | admin, instructor; body optional |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use brigade_core::{
  dto::{CourseInsertDto, CourseReadOnlyDto, CourseUpdateDto},
  filters::{CourseFilters, Paginated},
  store::SchoolStore,
};

use crate::{AppState, auth::AuthUser, error::ApiError};

/// `POST /api/courses`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  Json(dto): Json<CourseInsertDto>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SchoolStore + 'static,
{
  user.require_admin()?;
  let saved = state.courses.save(dto).await?;
  Ok((StatusCode::CREATED, Json(saved)))
}

/// `PUT /api/courses/{id}` — the path id and the body id must agree.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  Path(id): Path<i64>,
  Json(dto): Json<CourseUpdateDto>,
) -> Result<Json<CourseReadOnlyDto>, ApiError>
where
  S: SchoolStore + 'static,
{
  user.require_admin()?;
  if id != dto.id {
    return Err(ApiError::Forbidden(
      "path id does not match body id".to_string(),
    ));
  }
  Ok(Json(state.courses.update(dto).await?))
}

/// `GET /api/courses/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  Path(id): Path<i64>,
) -> Result<Json<CourseReadOnlyDto>, ApiError>
where
  S: SchoolStore + 'static,
{
  user.require_staff()?;
  Ok(Json(state.courses.get_one(id).await?))
}

/// `GET /api/courses`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
) -> Result<Json<Vec<CourseReadOnlyDto>>, ApiError>
where
  S: SchoolStore + 'static,
{
  user.require_staff()?;
  Ok(Json(state.courses.list_all().await?))
}

/// `POST /api/courses/search` — an absent body means no filtering, first
/// page, default size.
pub async fn search<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  body: Option<Json<CourseFilters>>,
) -> Result<Json<Paginated<CourseReadOnlyDto>>, ApiError>
where
  S: SchoolStore + 'static,
{
  user.require_staff()?;
  let filters = body.map(|Json(f)| f).unwrap_or_default();
  Ok(Json(state.courses.search(filters).await?))
}
