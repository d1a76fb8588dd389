// Small SELECT builder, just enough for the filters,
// ordering and pagination the site needs. Field and
// table names are always static strings from this
// crate, user input only ever goes in the parameters.

use std::fmt;
use rusqlite::types::Value;
use crate::utils::text_utils::escape_like;

pub enum Order {
  Asc,
  Desc
}

pub struct OrderBy {
  pub order: Order,
  pub field: &'static str
}

impl OrderBy {
  pub fn new(order: Order, field: &'static str) -> Self {
    OrderBy {
      order,
      field
    }
  }
}

pub enum Filter {
  Eq(&'static str, Value),
  Gte(&'static str, Value),
  // Case-insensitive substring match.
  Contains(&'static str, String),
  // At least one of the inner filters has to match.
  Or(Vec<Filter>)
}

impl Filter {

  pub fn eq<T: Into<Value>>(field: &'static str, value: T) -> Self {
    Filter::Eq(field, value.into())
  }

  pub fn gte<T: Into<Value>>(field: &'static str, value: T) -> Self {
    Filter::Gte(field, value.into())
  }

  pub fn contains(field: &'static str, needle: &str) -> Self {
    Filter::Contains(field, needle.to_string())
  }

  // Same needle on several fields, any of them matching.
  pub fn any_contains(fields: &[&'static str], needle: &str) -> Self {
    Filter::Or(
      fields.iter().map(|f| Filter::contains(f, needle)).collect()
    )
  }

  fn sql(&self) -> String {
    match self {
      Filter::Eq(field, _) => format!("{} = ?", field),
      Filter::Gte(field, _) => format!("{} >= ?", field),
      // SQLite's LIKE (and lower()) only fold ASCII letters,
      // "É" won't match "é". Arabic has no case.
      Filter::Contains(field, _) => format!("{} LIKE ? ESCAPE '\\'", field),
      Filter::Or(filters) => format!(
        "({})",
        filters.iter().map(Filter::sql).collect::<Vec<String>>().join(" OR ")
      )
    }
  }

  fn push_params(&self, params: &mut Vec<Value>) {
    match self {
      Filter::Eq(_, value) | Filter::Gte(_, value) => params.push(value.clone()),
      Filter::Contains(_, needle) =>
        params.push(Value::Text(format!("%{}%", escape_like(needle)))),
      Filter::Or(filters) => filters.iter().for_each(|f| f.push_params(params))
    }
  }

}

// Builder pattern. The "q_" prefix is there because
// "where" is a reserved keyword.
pub struct Query {
  q_fields: Vec<&'static str>,
  table: &'static str,
  q_where: Vec<Filter>,
  q_order: Option<OrderBy>,
  limit: Option<u32>,
  offset: Option<u32>
}

impl Query {

  pub fn select(table: &'static str, fields: &[&'static str]) -> Self {
    Query {
      q_fields: fields.to_vec(),
      table,
      q_where: Vec::new(),
      q_order: None,
      limit: None,
      offset: None
    }
  }

  // Filters are glued together with AND.
  pub fn filter(mut self, filter: Filter) -> Self {
    self.q_where.push(filter);
    self
  }

  pub fn order(mut self, order: OrderBy) -> Self {
    self.q_order = Some(order);
    self
  }

  pub fn limit(mut self, limit: u32) -> Self {
    self.limit = Some(limit);
    self
  }

  pub fn offset(mut self, offset: u32) -> Self {
    self.offset = Some(offset);
    self
  }

  pub fn range(self, offset: u32, limit: u32) -> Self {
    self.offset(offset).limit(limit)
  }

  pub fn table(&self) -> &'static str {
    self.table
  }

  // Positional parameters, in the order the
  // placeholders appear in the SQL.
  pub fn params(&self) -> Vec<Value> {
    let mut params = Vec::new();
    self.q_where.iter().for_each(|f| f.push_params(&mut params));
    params
  }

}

impl fmt::Display for Query {

  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "SELECT {} FROM {} ", self.q_fields.join(","), self.table)?;
    if !self.q_where.is_empty() {
      write!(
        f,
        "WHERE {} ",
        self.q_where.iter().map(Filter::sql).collect::<Vec<String>>().join(" AND ")
      )?;
    }
    if let Some(order) = &self.q_order {
      write!(
        f,
        "ORDER BY {} {} ",
        order.field,
        match order.order {
          Order::Asc => "ASC",
          Order::Desc => "DESC"
        }
      )?;
    }
    match (self.limit, self.offset) {
      (Some(lim), Some(off)) => write!(f, "LIMIT {} OFFSET {} ", lim, off),
      (Some(lim), None) => write!(f, "LIMIT {} ", lim),
      // SQLite wants a LIMIT before any OFFSET.
      (None, Some(off)) => write!(f, "LIMIT -1 OFFSET {} ", off),
      (None, None) => Ok(())
    }
  }

}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn generate_simple_select() {
    let query = Query::select("my_table", &["name", "value"]);
    // There's supposed to be an extra space at the end and no space between commas:
    let expected = String::from("SELECT name,value FROM my_table ");
    assert_eq!(query.to_string(), expected);
    assert!(query.params().is_empty());
  }

  #[test]
  fn generate_full_select() {
    let query = Query::select("posts", &["id", "slug"])
      .filter(Filter::eq("status", "published".to_string()))
      .filter(Filter::eq("featured", true))
      .order(OrderBy::new(Order::Desc, "created_at"))
      .range(20, 10);
    let expected = String::from(
      "SELECT id,slug FROM posts WHERE status = ? AND featured = ? \
      ORDER BY created_at DESC LIMIT 10 OFFSET 20 "
    );
    assert_eq!(query.to_string(), expected);
    assert_eq!(
      query.params(),
      vec![Value::Text("published".to_string()), Value::Integer(1)]
    );
  }

  #[test]
  fn or_group_of_contains() {
    let query = Query::select("posts", &["id"])
      .filter(Filter::any_contains(&["title_en", "title_ar"], "50%"))
      .filter(Filter::gte("views", 3i64));
    let expected = String::from(
      "SELECT id FROM posts WHERE (title_en LIKE ? ESCAPE '\\' OR title_ar LIKE ? ESCAPE '\\') \
      AND views >= ? "
    );
    assert_eq!(query.to_string(), expected);
    assert_eq!(
      query.params(),
      vec![
        Value::Text("%50\\%%".to_string()),
        Value::Text("%50\\%%".to_string()),
        Value::Integer(3)
      ]
    );
  }

  #[test]
  fn offset_without_limit() {
    let query = Query::select("messages", &["id"]).offset(5);
    assert_eq!(query.to_string(), "SELECT id FROM messages LIMIT -1 OFFSET 5 ");
  }
}
