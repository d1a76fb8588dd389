use std::collections::BTreeSet;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Row, Error};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};
use crate::locale::Localized;
use crate::utils::time_utils::DB_DATE_FORMAT;
use super::entities::*;

pub const POST_FIELDS: [&str; 17] = [
  "id", "slug", "title_en", "title_ar", "content_en", "content_ar",
  "excerpt_en", "excerpt_ar", "category", "tags", "cover_image", "views",
  "status", "featured", "author_id", "created_at", "updated_at"
];

pub const MESSAGE_FIELDS: [&str; 5] = ["id", "name", "email", "message", "created_at"];

pub const SITE_STAT_FIELDS: [&str; 4] = ["id", "post_id", "view_count", "date"];

// Wrappers so the text columns get parsed by rusqlite
// itself, which then reports the right column index
// when something is off.
struct DbTimestamp(DateTime<Utc>);
struct DbDate(NaiveDate);
struct DbTags(BTreeSet<String>);
struct DbStatus(PostStatus);

impl FromSql for DbTimestamp {
  fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
    DateTime::parse_from_rfc3339(value.as_str()?)
      .map(|dt| DbTimestamp(dt.with_timezone(&Utc)))
      .map_err(|e| FromSqlError::Other(Box::new(e)))
  }
}

impl FromSql for DbDate {
  fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
    NaiveDate::parse_from_str(value.as_str()?, DB_DATE_FORMAT)
      .map(DbDate)
      .map_err(|e| FromSqlError::Other(Box::new(e)))
  }
}

// Tags are a JSON array in a text column.
impl FromSql for DbTags {
  fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
    serde_json::from_str(value.as_str()?)
      .map(DbTags)
      .map_err(|e| FromSqlError::Other(Box::new(e)))
  }
}

impl FromSql for DbStatus {
  fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
    PostStatus::from_code(value.as_str()?)
      .map(DbStatus)
      .ok_or(FromSqlError::InvalidType)
  }
}

fn count(row: &Row, column: &str) -> Result<u64, Error> {
  // CHECK constraints keep these >= 0 but SQLite only
  // has signed integers.
  let value: i64 = row.get(column)?;
  Ok(value.max(0) as u64)
}

pub fn map_post(row: &Row) -> Result<Post, Error> {
  Ok(Post {
    id: row.get("id")?,
    slug: row.get("slug")?,
    title: Localized::new(row.get("title_en")?, row.get("title_ar")?),
    content: Localized::new(row.get("content_en")?, row.get("content_ar")?),
    excerpt: Localized::new(row.get("excerpt_en")?, row.get("excerpt_ar")?),
    category: row.get("category")?,
    tags: row.get::<_, DbTags>("tags")?.0,
    cover_image: row.get("cover_image")?,
    views: count(row, "views")?,
    status: row.get::<_, DbStatus>("status")?.0,
    featured: row.get("featured")?,
    author_id: row.get("author_id")?,
    created_at: row.get::<_, DbTimestamp>("created_at")?.0,
    updated_at: row.get::<_, DbTimestamp>("updated_at")?.0
  })
}

pub fn map_message(row: &Row) -> Result<Message, Error> {
  Ok(Message {
    id: row.get("id")?,
    name: row.get("name")?,
    email: row.get("email")?,
    message: row.get("message")?,
    created_at: row.get::<_, DbTimestamp>("created_at")?.0
  })
}

pub fn map_site_stat(row: &Row) -> Result<SiteStat, Error> {
  Ok(SiteStat {
    id: row.get("id")?,
    post_id: row.get("post_id")?,
    view_count: count(row, "view_count")?,
    date: row.get::<_, DbDate>("date")?.0
  })
}

pub fn map_views(row: &Row) -> Result<u64, Error> {
  count(row, "views")
}
