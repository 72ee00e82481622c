//! Course operations.

use std::sync::Arc;

use crate::{
  dto::{CourseInsertDto, CourseReadOnlyDto, CourseUpdateDto},
  error::{Error, Result},
  filters::{CourseFilters, Paginated},
  mapper,
  store::SchoolStore,
  validate,
};

pub struct CourseService<S> {
  store: Arc<S>,
}

impl<S> Clone for CourseService<S> {
  fn clone(&self) -> Self { CourseService { store: Arc::clone(&self.store) } }
}

impl<S: SchoolStore> CourseService<S> {
  pub fn new(store: Arc<S>) -> Self { CourseService { store } }

  /// Save a new course. The name must be free; a declared instructor must
  /// exist.
  pub async fn save(&self, dto: CourseInsertDto) -> Result<CourseReadOnlyDto> {
    validate::course_insert(&dto)?;

    if self
      .store
      .find_course_id_by_name(&dto.name)
      .await
      .map_err(Error::storage)?
      .is_some()
    {
      return Err(Error::already_exists(
        "Course name",
        format!("Course with name {} already exists", dto.name),
      ));
    }

    if let Some(instructor_id) = dto.instructor_id {
      self.require_instructor(instructor_id).await?;
    }

    let saved = self
      .store
      .insert_course(mapper::to_course_draft(&dto))
      .await
      .map_err(Error::storage)?;

    tracing::info!(name = %saved.name, "course saved");
    Ok(mapper::course_read(&saved))
  }

  /// Update an existing course. The name check is skipped when the name is
  /// unchanged; a missing instructor id detaches the course.
  pub async fn update(&self, dto: CourseUpdateDto) -> Result<CourseReadOnlyDto> {
    validate::course_update(&dto)?;

    let existing = self
      .store
      .get_course(dto.id)
      .await
      .map_err(Error::storage)?
      .ok_or_else(|| {
        Error::not_found("Course", format!("Course with id {} not found", dto.id))
      })?;

    if existing.name != dto.name
      && self
        .store
        .find_course_id_by_name(&dto.name)
        .await
        .map_err(Error::storage)?
        .is_some()
    {
      return Err(Error::already_exists(
        "Course name",
        format!("Course with name {} already exists", dto.name),
      ));
    }

    if let Some(instructor_id) = dto.instructor_id {
      self.require_instructor(instructor_id).await?;
    }

    let updated = self
      .store
      .update_course(mapper::to_course_entity(&dto))
      .await
      .map_err(Error::storage)?;

    tracing::info!(id = updated.id, "course updated");
    Ok(mapper::course_read(&updated))
  }

  pub async fn get_one(&self, id: i64) -> Result<CourseReadOnlyDto> {
    self
      .store
      .get_course(id)
      .await
      .map_err(Error::storage)?
      .map(|course| mapper::course_read(&course))
      .ok_or_else(|| {
        Error::not_found("Course", format!("Course with id {id} not found"))
      })
  }

  pub async fn list_all(&self) -> Result<Vec<CourseReadOnlyDto>> {
    let courses = self.store.list_courses().await.map_err(Error::storage)?;
    Ok(courses.iter().map(mapper::course_read).collect())
  }

  pub async fn search(
    &self,
    filters: CourseFilters,
  ) -> Result<Paginated<CourseReadOnlyDto>> {
    validate::page_size(filters.page_size)?;
    let page = self
      .store
      .search_courses(&filters)
      .await
      .map_err(Error::storage)?;
    tracing::debug!(
      page = filters.page,
      page_size = filters.page_size,
      "filtered courses returned"
    );
    Ok(page.map(|course| mapper::course_read(&course)))
  }

  async fn require_instructor(&self, instructor_id: i64) -> Result<()> {
    self
      .store
      .get_instructor(instructor_id)
      .await
      .map_err(Error::storage)?
      .ok_or_else(|| {
        Error::not_found(
          "Instructor",
          format!("Instructor with id {instructor_id} not found"),
        )
      })?;
    Ok(())
  }
}
