use rusqlite::{params, params_from_iter, Connection, ErrorCode, Row};
use r2d2_sqlite::SqliteConnectionManager;
use derive_more::Display;
use log::{debug, warn};
pub mod entities;
mod mappers;
mod queries;
mod schema;
mod posts;
mod messages;
mod settings;
mod analytics;
pub use queries::{Filter, Order, OrderBy, Query};
pub use schema::provision_schema;
pub use posts::*;
pub use messages::*;
pub use settings::*;
pub use analytics::*;

// Type alias to make function signatures much clearer:
pub type Pool = r2d2::Pool<SqliteConnectionManager>;

pub type Result<T> = std::result::Result<T, Error>;

// Data access errors. The "schema absent" case is its
// own variant so read operations can tell it apart
// from real failures without looking at messages.
#[derive(Debug, Display, PartialEq)]
pub enum Error {
  #[display(fmt = "Table {} does not exist", _0)]
  SchemaNotFound(String),
  #[display(fmt = "No matching row in {}", _0)]
  NotFound(String),
  #[display(fmt = "Validation failed: {}", _0)]
  Validation(String),
  #[display(fmt = "Backend error: {}", _0)]
  Backend(String)
}

impl std::error::Error for Error {}

impl Error {
  pub fn is_schema_absent(&self) -> bool {
    matches!(self, Error::SchemaNotFound(_))
  }
}

impl From<r2d2::Error> for Error {
  fn from(error: r2d2::Error) -> Self {
    Error::Backend(format!("Connection pool error - {}", error))
  }
}

impl From<tokio::task::JoinError> for Error {
  fn from(error: tokio::task::JoinError) -> Self {
    Error::Backend(format!("Database task failed - {}", error))
  }
}

// Handle on the database, cheap to clone (the pool
// is reference counted).
#[derive(Clone)]
pub struct Store {
  pool: Pool
}

impl Store {

  pub fn new(pool: Pool) -> Self {
    Self { pool }
  }

  pub fn open(db_path: &str) -> Result<Self> {
    let manager = SqliteConnectionManager::file(db_path);
    Ok(Self::new(Pool::new(manager)?))
  }

  // Every connection to ":memory:" is a brand new
  // database, so the pool can only ever hold one.
  pub fn in_memory() -> Result<Self> {
    let manager = SqliteConnectionManager::memory();
    let pool = r2d2::Pool::builder()
      .max_size(1)
      .build(manager)?;
    Ok(Self::new(pool))
  }

  // Runs blocking rusqlite work on one pooled connection
  // without holding up the async runtime. The table name
  // is what the work is about, it's used to classify
  // failures.
  pub async fn call<T, F>(&self, table: &'static str, work: F) -> Result<T>
    where
      T: Send + 'static,
      F: FnOnce(&mut Connection) -> rusqlite::Result<T> + Send + 'static
  {
    let pool = self.pool.clone();
    tokio::task::spawn_blocking(move || {
      let mut conn = pool.get()?;
      work(&mut *conn).map_err(|e| classify(&*conn, table, e))
    }).await?
  }

  pub async fn select<T>(
    &self,
    query: Query,
    mapper: fn(&Row<'_>) -> rusqlite::Result<T>
  ) -> Result<Vec<T>>
    where T: Send + 'static
  {
    self.call(query.table(), move |conn| {
      let sql = query.to_string();
      debug!("Running query: {}", sql);
      let mut stmt = conn.prepare(&sql)?;
      let rows = stmt.query_map(params_from_iter(query.params()), mapper)?;
      let result: rusqlite::Result<Vec<T>> = rows.collect();
      result
    }).await
  }

}

fn classify(conn: &Connection, table: &str, error: rusqlite::Error) -> Error {
  match error {
    rusqlite::Error::QueryReturnedNoRows => Error::NotFound(table.to_string()),
    // Generic SQL errors, which is also what a missing
    // table gives you. Ask the catalogue to be sure.
    rusqlite::Error::SqliteFailure(ref failure, _)
      if failure.code == ErrorCode::Unknown => {
        match table_exists(conn, table) {
          Ok(false) => Error::SchemaNotFound(table.to_string()),
          _ => Error::Backend(error.to_string())
        }
      },
    _ => Error::Backend(error.to_string())
  }
}

fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
  conn.query_row(
    "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
    params![table],
    |row| row.get::<_, i64>(0)
  ).map(|count| count > 0)
}

// Read operations render an empty page instead of
// failing when the site runs before the tables exist.
fn empty_if_schema_absent<T>(result: Result<Vec<T>>) -> Result<Vec<T>> {
  match result {
    Err(e) if e.is_schema_absent() => {
      warn!("{}, returning an empty result", e);
      Ok(Vec::new())
    },
    other => other
  }
}

#[cfg(test)]
pub mod test_helpers {
  use super::*;
  use super::entities::{NewPost, PostStatus};
  use chrono::{DateTime, Duration, TimeZone, Utc};

  pub fn empty_store() -> Store {
    Store::in_memory().unwrap()
  }

  pub async fn provisioned_store() -> Store {
    let store = empty_store();
    provision_schema(&store).await.unwrap();
    store
  }

  // Each call with a higher `age_rank` gives an older post.
  pub fn created(age_rank: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap() - Duration::hours(age_rank)
  }

  pub fn sample_post(slug: &str, age_rank: i64) -> NewPost {
    NewPost {
      slug: slug.to_string(),
      title_en: format!("Title {}", slug),
      title_ar: format!("عنوان {}", slug),
      content_en: format!("Content of {}", slug),
      content_ar: format!("محتوى {}", slug),
      excerpt_en: None,
      excerpt_ar: None,
      category: String::from("news"),
      tags: Default::default(),
      cover_image: None,
      views: 0,
      status: PostStatus::Published,
      featured: false,
      author_id: None,
      created_at: Some(created(age_rank))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use super::test_helpers::*;

  #[tokio::test]
  async fn missing_table_is_reported_as_schema_absent() {
    let store = empty_store();
    let query = Query::select("posts", &["id"]);
    let result = store.select(query, |row| row.get::<_, String>(0)).await;
    assert_eq!(Err(Error::SchemaNotFound(String::from("posts"))), result);
  }

  #[tokio::test]
  async fn other_sql_errors_are_backend_errors() {
    let store = provisioned_store().await;
    // Table exists, column doesn't:
    let query = Query::select("posts", &["no_such_column"]);
    let result = store.select(query, |row| row.get::<_, String>(0)).await;
    match result {
      Err(Error::Backend(_)) => (),
      other => panic!("Expected a backend error, got {:?}", other)
    }
  }

  #[test]
  fn only_schema_absent_is_swallowed() {
    let absent: Result<Vec<i32>> = Err(Error::SchemaNotFound(String::from("posts")));
    assert_eq!(Ok(Vec::new()), empty_if_schema_absent(absent));
    let failed: Result<Vec<i32>> = Err(Error::Backend(String::from("disk I/O error")));
    assert_eq!(
      Err(Error::Backend(String::from("disk I/O error"))),
      empty_if_schema_absent(failed)
    );
  }
}
