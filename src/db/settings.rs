use rusqlite::params;
use uuid::Uuid;
use crate::utils::time_utils;
use super::queries::{Filter, Query};
use super::{Result, Store};

const SETTINGS_TABLE: &str = "settings";

// A missing key is an error here, not an Option.
pub async fn get_setting(
  store: &Store,
  key: &str
) -> Result<String> {
  let query = Query::select(SETTINGS_TABLE, &["value"])
    .filter(Filter::eq("key", key.to_string()))
    .limit(1);
  store.call(SETTINGS_TABLE, move |conn| {
    conn.query_row(
      &query.to_string(),
      rusqlite::params_from_iter(query.params()),
      |row| row.get(0)
    )
  }).await
}

pub async fn set_setting(
  store: &Store,
  key: &str,
  value: &str
) -> Result<()> {
  let key = key.to_string();
  let value = value.to_string();
  let updated_at = time_utils::db_timestamp(&time_utils::now());
  store.call(SETTINGS_TABLE, move |conn| {
    conn.execute(
      "INSERT INTO settings (id, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
      ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
      params![Uuid::new_v4().to_string(), key, value, updated_at]
    )?;
    Ok(())
  }).await
}
