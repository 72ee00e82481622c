//! Student operations.
//!
//! A student write carries the full target enrollment set. Every referenced
//! course id must resolve before anything is persisted — partial enrollment
//! is never a valid end state, and the store applies the whole write in one
//! transaction.

use std::sync::Arc;

use crate::{
  dto::{StudentInsertDto, StudentReadOnlyDto, StudentUpdateDto},
  error::{Error, Result},
  filters::{Paginated, StudentFilters},
  mapper,
  store::SchoolStore,
  validate,
};

pub struct StudentService<S> {
  store: Arc<S>,
}

impl<S> Clone for StudentService<S> {
  fn clone(&self) -> Self { StudentService { store: Arc::clone(&self.store) } }
}

impl<S: SchoolStore> StudentService<S> {
  pub fn new(store: Arc<S>) -> Self { StudentService { store } }

  pub async fn save(&self, dto: StudentInsertDto) -> Result<StudentReadOnlyDto> {
    validate::student_insert(&dto)?;

    if self
      .store
      .find_student_id_by_vat(&dto.vat)
      .await
      .map_err(Error::storage)?
      .is_some()
    {
      return Err(Error::already_exists(
        "VAT",
        format!("Student with VAT number {} already exists", dto.vat),
      ));
    }

    if self
      .store
      .find_student_id_by_identity_number(&dto.identity_number)
      .await
      .map_err(Error::storage)?
      .is_some()
    {
      return Err(Error::already_exists(
        "IdentityNumber",
        format!(
          "Student with identity number {} already exists",
          dto.identity_number
        ),
      ));
    }

    self.require_courses(dto.course_ids.as_deref()).await?;

    let saved = self
      .store
      .insert_student(mapper::to_student_draft(&dto))
      .await
      .map_err(Error::storage)?;

    tracing::info!(vat = %saved.vat, "student saved");
    Ok(mapper::student_read(&saved))
  }

  /// Update an existing student, replacing the enrollment set wholesale.
  pub async fn update(&self, dto: StudentUpdateDto) -> Result<StudentReadOnlyDto> {
    validate::student_update(&dto)?;

    let existing = self
      .store
      .get_student(dto.id)
      .await
      .map_err(Error::storage)?
      .ok_or_else(|| {
        Error::not_found("Student", format!("Student with id {} not found", dto.id))
      })?;

    if existing.vat != dto.vat
      && self
        .store
        .find_student_id_by_vat(&dto.vat)
        .await
        .map_err(Error::storage)?
        .is_some()
    {
      return Err(Error::already_exists(
        "VAT",
        format!("Student with VAT number {} already exists", dto.vat),
      ));
    }

    if existing.identity_number != dto.identity_number
      && self
        .store
        .find_student_id_by_identity_number(&dto.identity_number)
        .await
        .map_err(Error::storage)?
        .is_some()
    {
      return Err(Error::already_exists(
        "IdentityNumber",
        format!(
          "Student with identity number {} already exists",
          dto.identity_number
        ),
      ));
    }

    self.require_courses(dto.course_ids.as_deref()).await?;

    let updated = self
      .store
      .update_student(mapper::to_student_entity(&dto))
      .await
      .map_err(Error::storage)?;

    tracing::info!(id = updated.id, "student updated");
    Ok(mapper::student_read(&updated))
  }

  pub async fn get_one(&self, uuid: &str) -> Result<StudentReadOnlyDto> {
    self
      .store
      .get_student_by_uuid(uuid)
      .await
      .map_err(Error::storage)?
      .map(|student| mapper::student_read(&student))
      .ok_or_else(|| {
        Error::not_found("Student", format!("Student with uuid {uuid} not found"))
      })
  }

  pub async fn list_all(&self) -> Result<Vec<StudentReadOnlyDto>> {
    let students = self.store.list_students().await.map_err(Error::storage)?;
    Ok(students.iter().map(mapper::student_read).collect())
  }

  pub async fn search(
    &self,
    filters: StudentFilters,
  ) -> Result<Paginated<StudentReadOnlyDto>> {
    validate::page_size(filters.page_size)?;
    let page = self
      .store
      .search_students(&filters)
      .await
      .map_err(Error::storage)?;
    tracing::debug!(
      page = filters.page,
      page_size = filters.page_size,
      "filtered students returned"
    );
    Ok(page.map(|student| mapper::student_read(&student)))
  }

  /// Referential check: every target course id must resolve to an existing
  /// course, otherwise nothing is enrolled.
  async fn require_courses(&self, course_ids: Option<&[i64]>) -> Result<()> {
    let Some(course_ids) = course_ids else { return Ok(()) };
    for &course_id in course_ids {
      self
        .store
        .get_course(course_id)
        .await
        .map_err(Error::storage)?
        .ok_or_else(|| {
          Error::not_found(
            "Course",
            format!("Course with id {course_id} not found"),
          )
        })?;
    }
    Ok(())
  }
}
