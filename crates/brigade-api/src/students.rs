//! Handlers for `/api/students` endpoints. Students are addressed by their
//! external uuid, never by row id.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use brigade_core::{
  dto::{StudentInsertDto, StudentReadOnlyDto, StudentUpdateDto},
  filters::{Paginated, StudentFilters},
  store::SchoolStore,
};

use crate::{AppState, auth::AuthUser, error::ApiError};

/// `POST /api/students`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  Json(dto): Json<StudentInsertDto>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SchoolStore + 'static,
{
  user.require_admin()?;
  let saved = state.students.save(dto).await?;
  Ok((StatusCode::CREATED, Json(saved)))
}

/// `PUT /api/students/{uuid}` — the path uuid and the body uuid must agree.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  Path(uuid): Path<String>,
  Json(dto): Json<StudentUpdateDto>,
) -> Result<Json<StudentReadOnlyDto>, ApiError>
where
  S: SchoolStore + 'static,
{
  user.require_admin()?;
  if uuid != dto.uuid {
    return Err(ApiError::Forbidden(
      "path uuid does not match body uuid".to_string(),
    ));
  }
  Ok(Json(state.students.update(dto).await?))
}

/// `GET /api/students/{uuid}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  Path(uuid): Path<String>,
) -> Result<Json<StudentReadOnlyDto>, ApiError>
where
  S: SchoolStore + 'static,
{
  user.require_staff()?;
  Ok(Json(state.students.get_one(&uuid).await?))
}

/// `GET /api/students`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
) -> Result<Json<Vec<StudentReadOnlyDto>>, ApiError>
where
  S: SchoolStore + 'static,
{
  user.require_staff()?;
  Ok(Json(state.students.list_all().await?))
}

/// `POST /api/students/search`
pub async fn search<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  body: Option<Json<StudentFilters>>,
) -> Result<Json<Paginated<StudentReadOnlyDto>>, ApiError>
where
  S: SchoolStore + 'static,
{
  user.require_staff()?;
  let filters = body.map(|Json(f)| f).unwrap_or_default();
  Ok(Json(state.students.search(filters).await?))
}
