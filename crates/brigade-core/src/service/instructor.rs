//! Instructor operations.
//!
//! An instructor write touches two unique fields: its own identity number
//! and its owned user's username. The guard checks them in that order and
//! fails fast on the first collision.

use std::sync::Arc;

use crate::{
  dto::{InstructorInsertDto, InstructorReadOnlyDto, InstructorUpdateDto},
  error::{Error, Result},
  filters::{InstructorFilters, Paginated},
  mapper::{self, PasswordEncoder},
  store::SchoolStore,
  validate,
};

pub struct InstructorService<S> {
  store:   Arc<S>,
  encoder: Arc<dyn PasswordEncoder>,
}

impl<S> Clone for InstructorService<S> {
  fn clone(&self) -> Self {
    InstructorService {
      store:   Arc::clone(&self.store),
      encoder: Arc::clone(&self.encoder),
    }
  }
}

impl<S: SchoolStore> InstructorService<S> {
  pub fn new(store: Arc<S>, encoder: Arc<dyn PasswordEncoder>) -> Self {
    InstructorService { store, encoder }
  }

  pub async fn save(&self, dto: InstructorInsertDto) -> Result<InstructorReadOnlyDto> {
    validate::instructor_insert(&dto)?;

    if self
      .store
      .find_instructor_id_by_identity_number(&dto.identity_number)
      .await
      .map_err(Error::storage)?
      .is_some()
    {
      return Err(Error::already_exists(
        "IdentityNumber",
        format!(
          "Instructor with identity number {} already exists",
          dto.identity_number
        ),
      ));
    }

    if self
      .store
      .find_user_by_username(&dto.user.username)
      .await
      .map_err(Error::storage)?
      .is_some()
    {
      return Err(Error::already_exists(
        "Username",
        format!("User with username {} already exists", dto.user.username),
      ));
    }

    let draft = mapper::to_instructor_draft(&dto, self.encoder.as_ref())?;
    let saved = self
      .store
      .insert_instructor(draft)
      .await
      .map_err(Error::storage)?;

    tracing::info!(identity_number = %saved.identity_number, "instructor saved");
    Ok(mapper::instructor_read(&saved))
  }

  /// Update an existing instructor. Unique-field checks are skipped for
  /// unchanged values; a blank password input preserves the stored hash.
  pub async fn update(&self, dto: InstructorUpdateDto) -> Result<InstructorReadOnlyDto> {
    validate::instructor_update(&dto)?;

    let existing = self
      .store
      .get_instructor(dto.id)
      .await
      .map_err(Error::storage)?
      .ok_or_else(|| {
        Error::not_found(
          "Instructor",
          format!("Instructor with id {} not found", dto.id),
        )
      })?;

    if existing.identity_number != dto.identity_number
      && self
        .store
        .find_instructor_id_by_identity_number(&dto.identity_number)
        .await
        .map_err(Error::storage)?
        .is_some()
    {
      return Err(Error::already_exists(
        "IdentityNumber",
        format!(
          "Instructor with identity number {} already exists",
          dto.identity_number
        ),
      ));
    }

    if existing.user.username != dto.user.username
      && self
        .store
        .find_user_by_username(&dto.user.username)
        .await
        .map_err(Error::storage)?
        .is_some()
    {
      return Err(Error::already_exists(
        "Username",
        format!("User with username {} already exists", dto.user.username),
      ));
    }

    let entity = mapper::to_instructor_entity(
      &dto,
      &existing.user.password_hash,
      self.encoder.as_ref(),
    )?;
    let updated = self
      .store
      .update_instructor(entity)
      .await
      .map_err(Error::storage)?;

    tracing::info!(id = updated.id, "instructor updated");
    Ok(mapper::instructor_read(&updated))
  }

  pub async fn get_one(&self, uuid: &str) -> Result<InstructorReadOnlyDto> {
    self
      .store
      .get_instructor_by_uuid(uuid)
      .await
      .map_err(Error::storage)?
      .map(|instructor| mapper::instructor_read(&instructor))
      .ok_or_else(|| {
        Error::not_found(
          "Instructor",
          format!("Instructor with uuid {uuid} not found"),
        )
      })
  }

  pub async fn list_all(&self) -> Result<Vec<InstructorReadOnlyDto>> {
    let instructors = self.store.list_instructors().await.map_err(Error::storage)?;
    Ok(instructors.iter().map(mapper::instructor_read).collect())
  }

  pub async fn search(
    &self,
    filters: InstructorFilters,
  ) -> Result<Paginated<InstructorReadOnlyDto>> {
    validate::page_size(filters.page_size)?;
    let page = self
      .store
      .search_instructors(&filters)
      .await
      .map_err(Error::storage)?;
    tracing::debug!(
      page = filters.page,
      page_size = filters.page_size,
      "filtered instructors returned"
    );
    Ok(page.map(|instructor| mapper::instructor_read(&instructor)))
  }
}
