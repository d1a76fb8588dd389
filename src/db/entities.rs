use std::collections::BTreeSet;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use crate::locale::Localized;
use crate::utils::{serde_utils, text_utils};
use super::{Error, Result};

// Limits for what the contact form stores.
const MAX_NAME_LENGTH: usize = 100;
const MAX_EMAIL_LENGTH: usize = 254;
const MAX_MESSAGE_LENGTH: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
  Published,
  Draft
}

impl Default for PostStatus {
  fn default() -> Self {
    PostStatus::Published
  }
}

impl PostStatus {

  pub fn code(&self) -> &'static str {
    match self {
      PostStatus::Published => "published",
      PostStatus::Draft => "draft"
    }
  }

  pub fn from_code(code: &str) -> Option<PostStatus> {
    match code {
      "published" => Some(PostStatus::Published),
      "draft" => Some(PostStatus::Draft),
      _ => None
    }
  }

}

// The per-language columns (title_en, title_ar...) are
// grouped back together in Localized values by the
// mapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
  pub id: String,
  pub slug: String,
  pub title: Localized<String>,
  pub content: Localized<String>,
  pub excerpt: Localized<Option<String>>,
  pub category: String,
  pub tags: BTreeSet<String>,
  pub cover_image: Option<String>,
  pub views: u64,
  pub status: PostStatus,
  pub featured: bool,
  pub author_id: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>
}

// Input format for seeding, uses the column names
// editors are used to.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
  pub slug: String,
  pub title_en: String,
  pub title_ar: String,
  pub content_en: String,
  pub content_ar: String,
  #[serde(default, deserialize_with = "serde_utils::empty_string_is_none")]
  pub excerpt_en: Option<String>,
  #[serde(default, deserialize_with = "serde_utils::empty_string_is_none")]
  pub excerpt_ar: Option<String>,
  pub category: String,
  #[serde(default)]
  pub tags: BTreeSet<String>,
  #[serde(default, deserialize_with = "serde_utils::empty_string_is_none")]
  pub cover_image: Option<String>,
  #[serde(default)]
  pub views: u64,
  #[serde(default)]
  pub status: PostStatus,
  #[serde(default)]
  pub featured: bool,
  #[serde(default, deserialize_with = "serde_utils::empty_string_is_none")]
  pub author_id: Option<String>,
  // Defaults to the insert time.
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
  pub id: String,
  pub name: String,
  pub email: String,
  pub message: String,
  pub created_at: DateTime<Utc>
}

// A contact form submission that passed validation.
// The only way to build one is NewMessage::new.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
  name: String,
  email: String,
  message: String
}

impl NewMessage {

  pub fn new(name: &str, email: &str, message: &str) -> Result<Self> {
    let name = required("name", name)?;
    let email = required("email", email)?;
    let message = required("message", message)?;
    if email.chars().count() > MAX_EMAIL_LENGTH || !text_utils::looks_like_email(&email) {
      return Err(Error::Validation(String::from("email is not valid")));
    }
    let name = within("name", name, MAX_NAME_LENGTH)?;
    let message = within("message", message, MAX_MESSAGE_LENGTH)?;
    Ok(Self { name, email, message })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn email(&self) -> &str {
    &self.email
  }

  pub fn message(&self) -> &str {
    &self.message
  }

}

fn required(field: &str, value: &str) -> Result<String> {
  let value = value.trim();
  if value.is_empty() {
    Err(Error::Validation(format!("{} is required", field)))
  } else {
    Ok(value.to_string())
  }
}

fn within(field: &str, value: String, max_chars: usize) -> Result<String> {
  if value.chars().count() > max_chars {
    Err(Error::Validation(format!("{} is too long", field)))
  } else {
    Ok(value)
  }
}

// One row per post and per day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteStat {
  pub id: String,
  pub post_id: String,
  pub view_count: u64,
  pub date: NaiveDate
}
