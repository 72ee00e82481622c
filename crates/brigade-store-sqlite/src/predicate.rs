//! Predicate combinators for dynamic filtering.
//!
//! A [`Predicate`] is a conjunction of SQL conditions plus their bound
//! parameters. Each combinator maps an optional filter value to a condition;
//! an unset (or blank, for strings) value yields the neutral element — a
//! predicate with no condition at all, matching every row. Composition is
//! logical AND. Building a predicate cannot fail.
//!
//! Conditions use unnumbered `?` placeholders, so parameter order follows
//! clause order; callers append LIMIT/OFFSET parameters after the filter
//! parameters.

use chrono::NaiveDate;
use rusqlite::{ToSql, types::ToSqlOutput};

use crate::encode::encode_date;

/// An owned, `Send` SQL parameter value.
#[derive(Debug, Clone)]
pub enum SqlParam {
  Text(String),
  Int(i64),
}

impl ToSql for SqlParam {
  fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
    match self {
      SqlParam::Text(s) => Ok(ToSqlOutput::from(s.as_str())),
      SqlParam::Int(n) => Ok(ToSqlOutput::from(*n)),
    }
  }
}

/// A composable boolean condition over entity columns.
#[derive(Debug, Default)]
pub struct Predicate {
  clauses: Vec<String>,
  params:  Vec<SqlParam>,
}

impl Predicate {
  /// The neutral predicate: matches every row.
  pub fn always() -> Self { Predicate::default() }

  /// Logical AND of two predicates.
  pub fn and(mut self, other: Predicate) -> Self {
    self.clauses.extend(other.clauses);
    self.params.extend(other.params);
    self
  }

  /// `""` when neutral, otherwise `"WHERE a AND b AND ..."`.
  pub fn where_sql(&self) -> String {
    if self.clauses.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", self.clauses.join(" AND "))
    }
  }

  pub fn into_params(self) -> Vec<SqlParam> { self.params }

  fn condition(clause: String, param: SqlParam) -> Self {
    Predicate { clauses: vec![clause], params: vec![param] }
  }
}

/// Case-sensitive substring containment (`LIKE %value%`). Neutral for
/// `None` or blank input.
pub fn like(column: &str, value: Option<&str>) -> Predicate {
  match value {
    Some(v) if !v.trim().is_empty() => Predicate::condition(
      format!("{column} LIKE ?"),
      SqlParam::Text(format!("%{v}%")),
    ),
    _ => Predicate::always(),
  }
}

/// Exact string equality. Neutral for `None` or blank input.
pub fn eq_text(column: &str, value: Option<&str>) -> Predicate {
  match value {
    Some(v) if !v.trim().is_empty() => {
      Predicate::condition(format!("{column} = ?"), SqlParam::Text(v.to_string()))
    }
    _ => Predicate::always(),
  }
}

/// Exact integer equality. Neutral for `None`.
pub fn eq_i64(column: &str, value: Option<i64>) -> Predicate {
  match value {
    Some(v) => Predicate::condition(format!("{column} = ?"), SqlParam::Int(v)),
    None => Predicate::always(),
  }
}

/// Exact date equality. Neutral for `None`.
pub fn eq_date(column: &str, value: Option<NaiveDate>) -> Predicate {
  match value {
    Some(v) => {
      Predicate::condition(format!("{column} = ?"), SqlParam::Text(encode_date(v)))
    }
    None => Predicate::always(),
  }
}
