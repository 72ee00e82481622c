//! [`SqliteStore`] — the [`SchoolStore`] implementation backed by SQLite.
//!
//! Every call hops onto the `tokio_rusqlite` connection thread via
//! `conn.call`; closures own their inputs, so filter values are converted to
//! owned [`SqlParam`]s up front. Writes that touch more than one table run in
//! an explicit transaction. Fallible column decoding happens after the
//! closure returns, on the raw row types from [`crate::encode`].

use std::{collections::BTreeSet, path::Path};

use brigade_core::{
  contact::{ContactDetails, ContactDetailsDraft},
  course::{Course, CourseDraft},
  filters::{CourseFilters, InstructorFilters, Paginated, StudentFilters},
  instructor::{Instructor, InstructorDraft},
  store::SchoolStore,
  student::{Student, StudentDraft},
  user::{User, UserDraft},
};
use rusqlite::{OptionalExtension, params, params_from_iter};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    RawContact, RawInstructor, RawStudent, RawUser, encode_bool, encode_date,
    encode_gender, encode_role,
  },
  error::classify,
  predicate::{self, SqlParam},
  schema,
};

/// Async handle to a single SQLite database.
///
/// Cloning is cheap; all clones share one underlying connection thread, which
/// serializes writes without further locking.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) the database at `path` and apply the schema.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_owned();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = SqliteStore { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a private in-memory database. Used by tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = SqliteStore { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(schema::SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row mapping ─────────────────────────────────────────────────────────────

const COURSE_COLUMNS: &str = "c.id, c.is_active, c.name, c.description, c.instructor_id";
const COURSE_FROM: &str = "FROM courses c";

const INSTRUCTOR_COLUMNS: &str = "i.id, i.uuid, i.is_active, i.firstname, \
   i.lastname, i.identity_number, i.gender, \
   u.id, u.is_active, u.username, u.password_hash, u.role, u.vat, \
   cd.id, cd.city, cd.street, cd.street_number, cd.postal_code, cd.email, \
   cd.phone_number";
const INSTRUCTOR_FROM: &str = "FROM instructors i \
   JOIN users u ON u.id = i.user_id \
   JOIN contact_details cd ON cd.id = i.contact_details_id";

const STUDENT_COLUMNS: &str = "st.id, st.uuid, st.is_active, st.firstname, \
   st.lastname, st.date_of_birth, st.vat, st.identity_number, st.gender, \
   cd.id, cd.city, cd.street, cd.street_number, cd.postal_code, cd.email, \
   cd.phone_number";
const STUDENT_FROM: &str = "FROM students st \
   JOIN contact_details cd ON cd.id = st.contact_details_id";

fn course_from_row(row: &rusqlite::Row) -> rusqlite::Result<Course> {
  Ok(Course {
    id:            row.get(0)?,
    is_active:     row.get::<_, i64>(1)? != 0,
    name:          row.get(2)?,
    description:   row.get(3)?,
    instructor_id: row.get(4)?,
  })
}

fn raw_contact_from_row(row: &rusqlite::Row, base: usize) -> rusqlite::Result<RawContact> {
  Ok(RawContact {
    id:            row.get(base)?,
    city:          row.get(base + 1)?,
    street:        row.get(base + 2)?,
    street_number: row.get(base + 3)?,
    postal_code:   row.get(base + 4)?,
    email:         row.get(base + 5)?,
    phone_number:  row.get(base + 6)?,
  })
}

fn raw_instructor_from_row(row: &rusqlite::Row) -> rusqlite::Result<RawInstructor> {
  Ok(RawInstructor {
    id:              row.get(0)?,
    uuid:            row.get(1)?,
    is_active:       row.get(2)?,
    firstname:       row.get(3)?,
    lastname:        row.get(4)?,
    identity_number: row.get(5)?,
    gender:          row.get(6)?,
    user:            RawUser {
      id:            row.get(7)?,
      is_active:     row.get(8)?,
      username:      row.get(9)?,
      password_hash: row.get(10)?,
      role:          row.get(11)?,
      vat:           row.get(12)?,
    },
    contact:         raw_contact_from_row(row, 13)?,
  })
}

fn raw_student_from_row(row: &rusqlite::Row) -> rusqlite::Result<RawStudent> {
  Ok(RawStudent {
    id:              row.get(0)?,
    uuid:            row.get(1)?,
    is_active:       row.get(2)?,
    firstname:       row.get(3)?,
    lastname:        row.get(4)?,
    date_of_birth:   row.get(5)?,
    vat:             row.get(6)?,
    identity_number: row.get(7)?,
    gender:          row.get(8)?,
    contact:         raw_contact_from_row(row, 9)?,
    course_ids:      Vec::new(),
  })
}

/// Enrollment ids for one student, sorted ascending.
fn course_ids_for(conn: &rusqlite::Connection, student_id: i64) -> rusqlite::Result<Vec<i64>> {
  let mut stmt = conn.prepare(
    "SELECT course_id FROM students_courses WHERE student_id = ?1 ORDER BY course_id ASC",
  )?;
  let ids = stmt
    .query_map(params![student_id], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<i64>>>()?;
  Ok(ids)
}

// ─── Owned sub-entity writes ─────────────────────────────────────────────────

fn insert_contact(
  conn: &rusqlite::Connection,
  draft: ContactDetailsDraft,
) -> rusqlite::Result<ContactDetails> {
  conn.execute(
    "INSERT INTO contact_details (city, street, street_number, postal_code, email, phone_number)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    params![
      draft.city,
      draft.street,
      draft.street_number,
      draft.postal_code,
      draft.email,
      draft.phone_number
    ],
  )?;
  let id = conn.last_insert_rowid();
  Ok(ContactDetails {
    id,
    city: draft.city,
    street: draft.street,
    street_number: draft.street_number,
    postal_code: draft.postal_code,
    email: draft.email,
    phone_number: draft.phone_number,
  })
}

fn update_contact(
  conn: &rusqlite::Connection,
  contact: &ContactDetails,
) -> rusqlite::Result<()> {
  conn.execute(
    "UPDATE contact_details
     SET city = ?1, street = ?2, street_number = ?3, postal_code = ?4,
         email = ?5, phone_number = ?6
     WHERE id = ?7",
    params![
      contact.city,
      contact.street,
      contact.street_number,
      contact.postal_code,
      contact.email,
      contact.phone_number,
      contact.id
    ],
  )?;
  Ok(())
}

// ─── SchoolStore impl ────────────────────────────────────────────────────────

impl SchoolStore for SqliteStore {
  type Error = Error;

  // ── Courses ───────────────────────────────────────────────────────────

  async fn insert_course(&self, draft: CourseDraft) -> Result<Course> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO courses (is_active, name, description, instructor_id)
           VALUES (?1, ?2, ?3, ?4)",
          params![
            encode_bool(draft.is_active),
            draft.name,
            draft.description,
            draft.instructor_id
          ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(Course {
          id,
          is_active: draft.is_active,
          name: draft.name,
          description: draft.description,
          instructor_id: draft.instructor_id,
        })
      })
      .await
      .map_err(classify)
  }

  async fn update_course(&self, course: Course) -> Result<Course> {
    let id = course.id;
    self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE courses
           SET is_active = ?1, name = ?2, description = ?3, instructor_id = ?4
           WHERE id = ?5",
          params![
            encode_bool(course.is_active),
            course.name,
            course.description,
            course.instructor_id,
            course.id
          ],
        )?;
        if n == 0 {
          return Ok(None);
        }
        Ok(Some(course))
      })
      .await
      .map_err(classify)?
      .ok_or(Error::RowMissing { entity: "course", id })
  }

  async fn get_course(&self, id: i64) -> Result<Option<Course>> {
    self
      .conn
      .call(move |conn| {
        let course = conn
          .query_row(
            &format!("SELECT {COURSE_COLUMNS} {COURSE_FROM} WHERE c.id = ?1"),
            params![id],
            course_from_row,
          )
          .optional()?;
        Ok(course)
      })
      .await
      .map_err(classify)
  }

  async fn find_course_id_by_name(&self, name: &str) -> Result<Option<i64>> {
    let name = name.to_string();
    self
      .conn
      .call(move |conn| {
        let id = conn
          .query_row("SELECT id FROM courses WHERE name = ?1", params![name], |row| {
            row.get(0)
          })
          .optional()?;
        Ok(id)
      })
      .await
      .map_err(classify)
  }

  async fn list_courses(&self) -> Result<Vec<Course>> {
    self
      .conn
      .call(move |conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {COURSE_COLUMNS} {COURSE_FROM} ORDER BY c.id ASC"))?;
        let courses = stmt
          .query_map([], course_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(courses)
      })
      .await
      .map_err(classify)
  }

  async fn search_courses(&self, filters: &CourseFilters) -> Result<Paginated<Course>> {
    let pred = predicate::like("c.name", filters.name.as_deref())
      .and(predicate::eq_i64("c.instructor_id", filters.instructor_id));
    let where_sql = pred.where_sql();
    let filter_params = pred.into_params();
    let (page, size) = (filters.page, filters.page_size);

    let (total, data) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          &format!("SELECT COUNT(*) {COURSE_FROM} {where_sql}"),
          params_from_iter(filter_params.iter()),
          |row| row.get(0),
        )?;
        let mut page_params = filter_params;
        page_params.push(SqlParam::Int(i64::from(size)));
        page_params.push(SqlParam::Int(i64::from(page) * i64::from(size)));
        let mut stmt = conn.prepare(&format!(
          "SELECT {COURSE_COLUMNS} {COURSE_FROM} {where_sql} \
           ORDER BY c.id ASC LIMIT ? OFFSET ?"
        ))?;
        let data = stmt
          .query_map(params_from_iter(page_params.iter()), course_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((total, data))
      })
      .await
      .map_err(classify)?;

    Ok(Paginated::new(data, page, size, total as u64))
  }

  // ── Instructors ───────────────────────────────────────────────────────

  async fn insert_instructor(&self, draft: InstructorDraft) -> Result<Instructor> {
    let uuid = Uuid::new_v4().to_string();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let contact = insert_contact(&tx, draft.contact_details)?;
        tx.execute(
          "INSERT INTO users (is_active, username, password_hash, role, vat)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          params![
            encode_bool(draft.user.is_active),
            draft.user.username,
            draft.user.password_hash,
            encode_role(draft.user.role),
            draft.user.vat
          ],
        )?;
        let user_id = tx.last_insert_rowid();
        tx.execute(
          "INSERT INTO instructors
             (uuid, is_active, firstname, lastname, identity_number, gender,
              user_id, contact_details_id)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          params![
            uuid,
            encode_bool(draft.is_active),
            draft.firstname,
            draft.lastname,
            draft.identity_number,
            encode_gender(draft.gender),
            user_id,
            contact.id
          ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Instructor {
          id,
          uuid,
          is_active: draft.is_active,
          firstname: draft.firstname,
          lastname: draft.lastname,
          identity_number: draft.identity_number,
          gender: draft.gender,
          user: User {
            id:            user_id,
            is_active:     draft.user.is_active,
            username:      draft.user.username,
            password_hash: draft.user.password_hash,
            role:          draft.user.role,
            vat:           draft.user.vat,
          },
          contact_details: contact,
        })
      })
      .await
      .map_err(classify)
  }

  async fn update_instructor(&self, instructor: Instructor) -> Result<Instructor> {
    let id = instructor.id;
    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let n = tx.execute(
          "UPDATE instructors
           SET is_active = ?1, firstname = ?2, lastname = ?3,
               identity_number = ?4, gender = ?5
           WHERE id = ?6",
          params![
            encode_bool(instructor.is_active),
            instructor.firstname,
            instructor.lastname,
            instructor.identity_number,
            encode_gender(instructor.gender),
            instructor.id
          ],
        )?;
        if n == 0 {
          return Ok(None);
        }
        tx.execute(
          "UPDATE users
           SET is_active = ?1, username = ?2, password_hash = ?3, role = ?4, vat = ?5
           WHERE id = ?6",
          params![
            encode_bool(instructor.user.is_active),
            instructor.user.username,
            instructor.user.password_hash,
            encode_role(instructor.user.role),
            instructor.user.vat,
            instructor.user.id
          ],
        )?;
        update_contact(&tx, &instructor.contact_details)?;
        let raw = tx.query_row(
          &format!("SELECT {INSTRUCTOR_COLUMNS} {INSTRUCTOR_FROM} WHERE i.id = ?1"),
          params![instructor.id],
          raw_instructor_from_row,
        )?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await
      .map_err(classify)?
      .ok_or(Error::RowMissing { entity: "instructor", id })?;
    raw.into_instructor()
  }

  async fn get_instructor(&self, id: i64) -> Result<Option<Instructor>> {
    let raw = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!("SELECT {INSTRUCTOR_COLUMNS} {INSTRUCTOR_FROM} WHERE i.id = ?1"),
            params![id],
            raw_instructor_from_row,
          )
          .optional()?;
        Ok(raw)
      })
      .await
      .map_err(classify)?;
    raw.map(RawInstructor::into_instructor).transpose()
  }

  async fn get_instructor_by_uuid(&self, uuid: &str) -> Result<Option<Instructor>> {
    let uuid = uuid.to_string();
    let raw = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!("SELECT {INSTRUCTOR_COLUMNS} {INSTRUCTOR_FROM} WHERE i.uuid = ?1"),
            params![uuid],
            raw_instructor_from_row,
          )
          .optional()?;
        Ok(raw)
      })
      .await
      .map_err(classify)?;
    raw.map(RawInstructor::into_instructor).transpose()
  }

  async fn get_instructor_by_user_id(&self, user_id: i64) -> Result<Option<Instructor>> {
    let raw = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!("SELECT {INSTRUCTOR_COLUMNS} {INSTRUCTOR_FROM} WHERE i.user_id = ?1"),
            params![user_id],
            raw_instructor_from_row,
          )
          .optional()?;
        Ok(raw)
      })
      .await
      .map_err(classify)?;
    raw.map(RawInstructor::into_instructor).transpose()
  }

  async fn find_instructor_id_by_identity_number(
    &self,
    identity_number: &str,
  ) -> Result<Option<i64>> {
    let identity_number = identity_number.to_string();
    self
      .conn
      .call(move |conn| {
        let id = conn
          .query_row(
            "SELECT id FROM instructors WHERE identity_number = ?1",
            params![identity_number],
            |row| row.get(0),
          )
          .optional()?;
        Ok(id)
      })
      .await
      .map_err(classify)
  }

  async fn list_instructors(&self) -> Result<Vec<Instructor>> {
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {INSTRUCTOR_COLUMNS} {INSTRUCTOR_FROM} ORDER BY i.id ASC"
        ))?;
        let raws = stmt
          .query_map([], raw_instructor_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(raws)
      })
      .await
      .map_err(classify)?;
    raws.into_iter().map(RawInstructor::into_instructor).collect()
  }

  async fn search_instructors(
    &self,
    filters: &InstructorFilters,
  ) -> Result<Paginated<Instructor>> {
    let pred = predicate::eq_text("i.uuid", filters.uuid.as_deref())
      .and(predicate::like("i.lastname", filters.lastname.as_deref()));
    let where_sql = pred.where_sql();
    let filter_params = pred.into_params();
    let (page, size) = (filters.page, filters.page_size);

    let (total, raws) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          &format!("SELECT COUNT(*) {INSTRUCTOR_FROM} {where_sql}"),
          params_from_iter(filter_params.iter()),
          |row| row.get(0),
        )?;
        let mut page_params = filter_params;
        page_params.push(SqlParam::Int(i64::from(size)));
        page_params.push(SqlParam::Int(i64::from(page) * i64::from(size)));
        let mut stmt = conn.prepare(&format!(
          "SELECT {INSTRUCTOR_COLUMNS} {INSTRUCTOR_FROM} {where_sql} \
           ORDER BY i.id ASC LIMIT ? OFFSET ?"
        ))?;
        let raws = stmt
          .query_map(params_from_iter(page_params.iter()), raw_instructor_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((total, raws))
      })
      .await
      .map_err(classify)?;

    let data = raws
      .into_iter()
      .map(RawInstructor::into_instructor)
      .collect::<Result<Vec<_>>>()?;
    Ok(Paginated::new(data, page, size, total as u64))
  }

  // ── Students ──────────────────────────────────────────────────────────

  async fn insert_student(&self, draft: StudentDraft) -> Result<Student> {
    let uuid = Uuid::new_v4().to_string();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let contact = insert_contact(&tx, draft.contact_details)?;
        tx.execute(
          "INSERT INTO students
             (uuid, is_active, firstname, lastname, date_of_birth, vat,
              identity_number, gender, contact_details_id)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          params![
            uuid,
            encode_bool(draft.is_active),
            draft.firstname,
            draft.lastname,
            encode_date(draft.date_of_birth),
            draft.vat,
            draft.identity_number,
            encode_gender(draft.gender),
            contact.id
          ],
        )?;
        let id = tx.last_insert_rowid();
        let course_ids: BTreeSet<i64> = draft.course_ids.iter().copied().collect();
        for course_id in &course_ids {
          tx.execute(
            "INSERT INTO students_courses (student_id, course_id) VALUES (?1, ?2)",
            params![id, course_id],
          )?;
        }
        tx.commit()?;
        Ok(Student {
          id,
          uuid,
          is_active: draft.is_active,
          firstname: draft.firstname,
          lastname: draft.lastname,
          date_of_birth: draft.date_of_birth,
          vat: draft.vat,
          identity_number: draft.identity_number,
          gender: draft.gender,
          contact_details: contact,
          course_ids: course_ids.into_iter().collect(),
        })
      })
      .await
      .map_err(classify)
  }

  async fn update_student(&self, student: Student) -> Result<Student> {
    let id = student.id;
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let n = tx.execute(
          "UPDATE students
           SET is_active = ?1, firstname = ?2, lastname = ?3, date_of_birth = ?4,
               vat = ?5, identity_number = ?6, gender = ?7
           WHERE id = ?8",
          params![
            encode_bool(student.is_active),
            student.firstname,
            student.lastname,
            encode_date(student.date_of_birth),
            student.vat,
            student.identity_number,
            encode_gender(student.gender),
            student.id
          ],
        )?;
        if n == 0 {
          return Ok(None);
        }
        update_contact(&tx, &student.contact_details)?;
        tx.execute(
          "DELETE FROM students_courses WHERE student_id = ?1",
          params![student.id],
        )?;
        let course_ids: BTreeSet<i64> = student.course_ids.iter().copied().collect();
        for course_id in &course_ids {
          tx.execute(
            "INSERT INTO students_courses (student_id, course_id) VALUES (?1, ?2)",
            params![student.id, course_id],
          )?;
        }
        // The external uuid is immutable; read back the stored one rather
        // than trusting the caller's copy.
        let uuid: String = tx.query_row(
          "SELECT uuid FROM students WHERE id = ?1",
          params![student.id],
          |row| row.get(0),
        )?;
        tx.commit()?;
        Ok(Some(Student {
          uuid,
          course_ids: course_ids.into_iter().collect(),
          ..student
        }))
      })
      .await
      .map_err(classify)?
      .ok_or(Error::RowMissing { entity: "student", id })
  }

  async fn get_student(&self, id: i64) -> Result<Option<Student>> {
    let raw = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!("SELECT {STUDENT_COLUMNS} {STUDENT_FROM} WHERE st.id = ?1"),
            params![id],
            raw_student_from_row,
          )
          .optional()?;
        match raw {
          Some(mut raw) => {
            raw.course_ids = course_ids_for(conn, raw.id)?;
            Ok(Some(raw))
          }
          None => Ok(None),
        }
      })
      .await
      .map_err(classify)?;
    raw.map(RawStudent::into_student).transpose()
  }

  async fn get_student_by_uuid(&self, uuid: &str) -> Result<Option<Student>> {
    let uuid = uuid.to_string();
    let raw = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!("SELECT {STUDENT_COLUMNS} {STUDENT_FROM} WHERE st.uuid = ?1"),
            params![uuid],
            raw_student_from_row,
          )
          .optional()?;
        match raw {
          Some(mut raw) => {
            raw.course_ids = course_ids_for(conn, raw.id)?;
            Ok(Some(raw))
          }
          None => Ok(None),
        }
      })
      .await
      .map_err(classify)?;
    raw.map(RawStudent::into_student).transpose()
  }

  async fn find_student_id_by_vat(&self, vat: &str) -> Result<Option<i64>> {
    let vat = vat.to_string();
    self
      .conn
      .call(move |conn| {
        let id = conn
          .query_row("SELECT id FROM students WHERE vat = ?1", params![vat], |row| {
            row.get(0)
          })
          .optional()?;
        Ok(id)
      })
      .await
      .map_err(classify)
  }

  async fn find_student_id_by_identity_number(
    &self,
    identity_number: &str,
  ) -> Result<Option<i64>> {
    let identity_number = identity_number.to_string();
    self
      .conn
      .call(move |conn| {
        let id = conn
          .query_row(
            "SELECT id FROM students WHERE identity_number = ?1",
            params![identity_number],
            |row| row.get(0),
          )
          .optional()?;
        Ok(id)
      })
      .await
      .map_err(classify)
  }

  async fn list_students(&self) -> Result<Vec<Student>> {
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {STUDENT_COLUMNS} {STUDENT_FROM} ORDER BY st.id ASC"))?;
        let mut raws = stmt
          .query_map([], raw_student_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        drop(stmt);
        for raw in &mut raws {
          raw.course_ids = course_ids_for(conn, raw.id)?;
        }
        Ok(raws)
      })
      .await
      .map_err(classify)?;
    raws.into_iter().map(RawStudent::into_student).collect()
  }

  async fn search_students(&self, filters: &StudentFilters) -> Result<Paginated<Student>> {
    let pred = predicate::like("st.lastname", filters.lastname.as_deref())
      .and(predicate::eq_date("st.date_of_birth", filters.date_of_birth))
      .and(predicate::eq_i64("sc.course_id", filters.course_id))
      .and(predicate::eq_text("i.uuid", filters.instructor_uuid.as_deref()));
    let where_sql = pred.where_sql();
    let filter_params = pred.into_params();
    let (page, size) = (filters.page, filters.page_size);

    // The enrollment joins can match one student several times; DISTINCT on
    // both the count and the page keeps each student a single row.
    let from = format!(
      "{STUDENT_FROM} \
       LEFT JOIN students_courses sc ON sc.student_id = st.id \
       LEFT JOIN courses c ON c.id = sc.course_id \
       LEFT JOIN instructors i ON i.id = c.instructor_id"
    );

    let (total, raws) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          &format!("SELECT COUNT(DISTINCT st.id) {from} {where_sql}"),
          params_from_iter(filter_params.iter()),
          |row| row.get(0),
        )?;
        let mut page_params = filter_params;
        page_params.push(SqlParam::Int(i64::from(size)));
        page_params.push(SqlParam::Int(i64::from(page) * i64::from(size)));
        let mut stmt = conn.prepare(&format!(
          "SELECT DISTINCT {STUDENT_COLUMNS} {from} {where_sql} \
           ORDER BY st.id ASC LIMIT ? OFFSET ?"
        ))?;
        let mut raws = stmt
          .query_map(params_from_iter(page_params.iter()), raw_student_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        drop(stmt);
        for raw in &mut raws {
          raw.course_ids = course_ids_for(conn, raw.id)?;
        }
        Ok((total, raws))
      })
      .await
      .map_err(classify)?;

    let data = raws
      .into_iter()
      .map(RawStudent::into_student)
      .collect::<Result<Vec<_>>>()?;
    Ok(Paginated::new(data, page, size, total as u64))
  }

  // ── Users ─────────────────────────────────────────────────────────────

  async fn insert_user(&self, draft: UserDraft) -> Result<User> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (is_active, username, password_hash, role, vat)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          params![
            encode_bool(draft.is_active),
            draft.username,
            draft.password_hash,
            encode_role(draft.role),
            draft.vat
          ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(User {
          id,
          is_active: draft.is_active,
          username: draft.username,
          password_hash: draft.password_hash,
          role: draft.role,
          vat: draft.vat,
        })
      })
      .await
      .map_err(classify)
  }

  async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
    let username = username.to_string();
    let raw = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            "SELECT id, is_active, username, password_hash, role, vat
             FROM users WHERE username = ?1",
            params![username],
            |row| {
              Ok(RawUser {
                id:            row.get(0)?,
                is_active:     row.get(1)?,
                username:      row.get(2)?,
                password_hash: row.get(3)?,
                role:          row.get(4)?,
                vat:           row.get(5)?,
              })
            },
          )
          .optional()?;
        Ok(raw)
      })
      .await
      .map_err(classify)?;
    raw.map(RawUser::into_user).transpose()
  }
}
