use rusqlite::params;
use uuid::Uuid;
use crate::utils::time_utils;
use super::entities::{Message, NewMessage};
use super::mappers::{map_message, MESSAGE_FIELDS};
use super::queries::{Order, OrderBy, Query};
use super::{Result, Store};

const MESSAGES_TABLE: &str = "messages";

// Validation happens before the database is touched
// at all.
pub async fn create_message(
  store: &Store,
  name: &str,
  email: &str,
  message: &str
) -> Result<Message> {
  let new_message = NewMessage::new(name, email, message)?;
  let id = Uuid::new_v4().to_string();
  let created_at = time_utils::db_timestamp(&time_utils::now());
  store.call(MESSAGES_TABLE, move |conn| {
    conn.query_row(
      &format!(
        "INSERT INTO messages ({}) VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {}",
        MESSAGE_FIELDS.join(","),
        MESSAGE_FIELDS.join(",")
      ),
      params![
        id,
        new_message.name(),
        new_message.email(),
        new_message.message(),
        created_at
      ],
      map_message
    )
  }).await
}

pub async fn list_messages(
  store: &Store,
  limit: u32
) -> Result<Vec<Message>> {
  let query = Query::select(MESSAGES_TABLE, &MESSAGE_FIELDS)
    .order(OrderBy::new(Order::Desc, "created_at"))
    .limit(limit);
  store.select(query, map_message).await
}
