//! Filter objects and the pagination envelope.
//!
//! Every filter field is optional; an unset field translates to the neutral
//! (always-true) predicate in the store. Pagination is zero-based with a
//! default page size of 10 and a fixed `id` ascending sort.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

// ─── Filters ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseFilters {
  pub page:          u32,
  pub page_size:     u32,
  /// Case-sensitive substring match on the course name.
  pub name:          Option<String>,
  pub instructor_id: Option<i64>,
}

impl Default for CourseFilters {
  fn default() -> Self {
    CourseFilters {
      page:          0,
      page_size:     DEFAULT_PAGE_SIZE,
      name:          None,
      instructor_id: None,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstructorFilters {
  pub page:      u32,
  pub page_size: u32,
  pub uuid:      Option<String>,
  /// Case-sensitive substring match on the lastname.
  pub lastname:  Option<String>,
}

impl Default for InstructorFilters {
  fn default() -> Self {
    InstructorFilters {
      page:      0,
      page_size: DEFAULT_PAGE_SIZE,
      uuid:      None,
      lastname:  None,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentFilters {
  pub page:            u32,
  pub page_size:       u32,
  /// Case-sensitive substring match on the lastname.
  pub lastname:        Option<String>,
  pub date_of_birth:   Option<NaiveDate>,
  /// Students enrolled in this course (join through the enrollment table).
  pub course_id:       Option<i64>,
  /// Students enrolled in any course taught by this instructor.
  pub instructor_uuid: Option<String>,
}

impl Default for StudentFilters {
  fn default() -> Self {
    StudentFilters {
      page:            0,
      page_size:       DEFAULT_PAGE_SIZE,
      lastname:        None,
      date_of_birth:   None,
      course_id:       None,
      instructor_uuid: None,
    }
  }
}

// ─── Pagination envelope ─────────────────────────────────────────────────────

/// One page of results plus its metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
  pub data:               Vec<T>,
  pub current_page:       u32,
  pub page_size:          u32,
  pub total_pages:        u32,
  pub number_of_elements: usize,
  pub total_elements:     u64,
}

impl<T> Paginated<T> {
  /// Assemble an envelope for `data` being page `page` of a result set with
  /// `total_elements` matches overall. A page beyond the end is an empty
  /// `data` with the same totals, never an error.
  pub fn new(data: Vec<T>, page: u32, page_size: u32, total_elements: u64) -> Self {
    let total_pages = if page_size == 0 {
      0
    } else {
      total_elements.div_ceil(u64::from(page_size)) as u32
    };
    Paginated {
      number_of_elements: data.len(),
      data,
      current_page: page,
      page_size,
      total_pages,
      total_elements,
    }
  }

  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
    Paginated {
      data:               self.data.into_iter().map(f).collect(),
      current_page:       self.current_page,
      page_size:          self.page_size,
      total_pages:        self.total_pages,
      number_of_elements: self.number_of_elements,
      total_elements:     self.total_elements,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn total_pages_rounds_up() {
    let page = Paginated::new(vec![1, 2, 3], 0, 3, 7);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.number_of_elements, 3);
    assert_eq!(page.total_elements, 7);
  }

  #[test]
  fn empty_result_set_has_zero_pages() {
    let page = Paginated::new(Vec::<i64>::new(), 0, 10, 0);
    assert_eq!(page.total_pages, 0);
    assert_eq!(page.number_of_elements, 0);
  }

  #[test]
  fn map_preserves_metadata() {
    let page = Paginated::new(vec![1, 2], 1, 2, 5).map(|n| n * 10);
    assert_eq!(page.data, vec![10, 20]);
    assert_eq!(page.current_page, 1);
    assert_eq!(page.total_pages, 3);
  }
}
