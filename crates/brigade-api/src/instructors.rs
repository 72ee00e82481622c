//! Handlers for `/api/instructors` endpoints. Instructors are addressed by
//! their external uuid, never by row id.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use brigade_core::{
  dto::{InstructorInsertDto, InstructorReadOnlyDto, InstructorUpdateDto},
  filters::{InstructorFilters, Paginated},
  store::SchoolStore,
};

use crate::{AppState, auth::AuthUser, error::ApiError};

/// `POST /api/instructors`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  Json(dto): Json<InstructorInsertDto>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SchoolStore + 'static,
{
  user.require_admin()?;
  let saved = state.instructors.save(dto).await?;
  Ok((StatusCode::CREATED, Json(saved)))
}

/// `PUT /api/instructors/{uuid}` — the path uuid and the body uuid must
/// agree.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  Path(uuid): Path<String>,
  Json(dto): Json<InstructorUpdateDto>,
) -> Result<Json<InstructorReadOnlyDto>, ApiError>
where
  S: SchoolStore + 'static,
{
  user.require_admin()?;
  if uuid != dto.uuid {
    return Err(ApiError::Forbidden(
      "path uuid does not match body uuid".to_string(),
    ));
  }
  Ok(Json(state.instructors.update(dto).await?))
}

/// `GET /api/instructors/{uuid}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  Path(uuid): Path<String>,
) -> Result<Json<InstructorReadOnlyDto>, ApiError>
where
  S: SchoolStore + 'static,
{
  user.require_staff()?;
  Ok(Json(state.instructors.get_one(&uuid).await?))
}

/// `GET /api/instructors`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
) -> Result<Json<Vec<InstructorReadOnlyDto>>, ApiError>
where
  S: SchoolStore + 'static,
{
  user.require_staff()?;
  Ok(Json(state.instructors.list_all().await?))
}

/// `POST /api/instructors/search`
pub async fn search<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  body: Option<Json<InstructorFilters>>,
) -> Result<Json<Paginated<InstructorReadOnlyDto>>, ApiError>
where
  S: SchoolStore + 'static,
{
  user.require_staff()?;
  let filters = body.map(|Json(f)| f).unwrap_or_default();
  Ok(Json(state.instructors.search(filters).await?))
}
