use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use derive_more::Display;
use crate::config::SiteInfo;
use crate::db::entities::*;
use crate::locale::{i18n, Language, Locale, TextDirection};
use crate::theme::Theme;
use crate::utils::{text_utils, time_utils};

// Stats rows go out as they are.
pub use crate::db::entities::SiteStat as SiteStatDto;

// A post rendered for one language: the per-language
// fields are resolved here so the frontend never has
// to pick between title_en and title_ar itself.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
  pub id: String,
  pub slug: String,
  pub language: Language,
  pub direction: TextDirection,
  pub title: String,
  pub excerpt: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub content: Option<String>,
  pub category: String,
  pub tags: Vec<String>,
  pub cover_image: Option<String>,
  pub views: u64,
  pub featured: bool,
  pub date: String,
  pub created_at: DateTime<Utc>,
  pub reading_time: usize,
  pub reading_time_label: String
}

impl PostDto {

  pub fn localized(post: Post, language: Language) -> Self {
    let content = post.content.get(language).clone();
    let reading_time = text_utils::reading_time(&content);
    let minutes = reading_time.to_string();
    Self {
      id: post.id,
      slug: post.slug,
      language,
      direction: language.direction(),
      title: post.title.get(language).clone(),
      excerpt: post.excerpt.get(language).clone(),
      content: Some(content),
      category: post.category,
      tags: post.tags.into_iter().collect(),
      cover_image: post.cover_image,
      views: post.views,
      featured: post.featured,
      date: time_utils::format_date(&post.created_at, language),
      created_at: post.created_at,
      reading_time,
      reading_time_label: i18n::translate_with(
        language,
        "reading-time",
        &[("time", minutes.as_str())]
      )
    }
  }

  // Lists don't need the full body, saves a lot of bytes
  // on the home page.
  pub fn remove_content(mut self) -> Self {
    self.content = None;
    self
  }

}

pub fn post_cards(posts: Vec<Post>, language: Language) -> Vec<PostDto> {
  posts.into_iter()
    .map(|p| PostDto::localized(p, language).remove_content())
    .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
  pub id: String,
  pub name: String,
  pub email: String,
  pub message: String,
  pub created_at: DateTime<Utc>
}

impl From<Message> for MessageDto {
  fn from(message: Message) -> Self {
    Self {
      id: message.id,
      name: message.name,
      email: message.email,
      message: message.message,
      created_at: message.created_at
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesDto {
  pub language: Language,
  pub direction: TextDirection,
  #[serde(rename = "isRTL")]
  pub is_rtl: bool,
  pub theme: Theme
}

impl PreferencesDto {
  pub fn new(locale: Locale, theme: Theme) -> Self {
    Self {
      language: locale.language,
      direction: locale.direction,
      is_rtl: locale.is_rtl(),
      theme
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeDto<'a> {
  pub site: &'a SiteInfo,
  pub preferences: PreferencesDto,
  pub featured: Vec<PostDto>,
  pub latest: Vec<PostDto>
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingDto {
  pub key: String,
  pub value: String
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalViewsDto {
  pub total_views: u64
}

/* --- Request bodies --- */
#[derive(Debug, Deserialize)]
pub struct MessageForm {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub message: String
}

#[derive(Debug, Deserialize)]
pub struct SettingBody {
  pub value: String
}

#[derive(Debug, Deserialize)]
pub struct LanguageBody {
  pub language: String
}

#[derive(Debug, Deserialize)]
pub struct ThemeBody {
  pub theme: String
}
/* --- End request bodies --- */

// Used for responses that don't return an entity.
#[derive(Debug, Deserialize, Serialize)]
pub struct JsonStatus {
  pub status: String,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>
}

#[derive(Debug, Display)]
pub enum JsonStatusType {
  #[display(fmt = "success")]
  Success
}

impl JsonStatus {
  pub fn new_with_id(
    status: JsonStatusType,
    message: &str,
    id: &str
  ) -> Self {
    Self {
      status: status.to_string(),
      message: String::from(message),
      id: Some(String::from(id))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::locale::Localized;
  use chrono::TimeZone;
  use std::collections::BTreeSet;

  fn sample_post() -> Post {
    Post {
      id: String::from("p1"),
      slug: String::from("hello"),
      title: Localized::new(String::from("Hello"), String::from("مرحبا")),
      content: Localized::new(vec!["word"; 450].join(" "), String::from("نص قصير")),
      excerpt: Localized::new(Some(String::from("Short")), None),
      category: String::from("news"),
      tags: vec!["a".to_string(), "b".to_string()].into_iter().collect::<BTreeSet<_>>(),
      cover_image: None,
      views: 12,
      status: PostStatus::Published,
      featured: true,
      author_id: None,
      created_at: Utc.with_ymd_and_hms(2024, 3, 7, 10, 0, 0).unwrap(),
      updated_at: Utc.with_ymd_and_hms(2024, 3, 7, 10, 0, 0).unwrap()
    }
  }

  #[test]
  fn english_post_dto() {
    let dto = PostDto::localized(sample_post(), Language::En);
    assert_eq!("Hello", dto.title);
    assert_eq!(Some(String::from("Short")), dto.excerpt);
    assert_eq!(TextDirection::Ltr, dto.direction);
    assert_eq!(3, dto.reading_time);
    assert_eq!("3 min read", dto.reading_time_label);
    assert_eq!("March 7, 2024", dto.date);
  }

  #[test]
  fn arabic_post_dto() {
    let dto = PostDto::localized(sample_post(), Language::Ar);
    assert_eq!("مرحبا", dto.title);
    assert_eq!(None, dto.excerpt);
    assert_eq!(TextDirection::Rtl, dto.direction);
    assert_eq!(1, dto.reading_time);
    assert_eq!("7 مارس 2024", dto.date);
  }

  #[test]
  fn cards_have_no_content() {
    let cards = post_cards(vec![sample_post()], Language::En);
    let json = serde_json::to_value(&cards[0]).unwrap();
    assert!(json.get("content").is_none());
    assert_eq!("rtl", serde_json::to_value(Language::Ar.direction()).unwrap());
    assert_eq!(serde_json::json!(["a", "b"]), json["tags"]);
  }

  #[test]
  fn json_status_carries_the_id() {
    let sut = JsonStatus::new_with_id(JsonStatusType::Success, "Sent", "m1");
    assert_eq!(serde_json::json!({
      "status": "success",
      "message": "Sent",
      "id": "m1"
    }), serde_json::to_value(&sut).unwrap());
  }

  #[test]
  fn preferences_serialize_with_is_rtl() {
    let dto = PreferencesDto::new(Locale::from(Language::Ar), Theme::Dark);
    let json = serde_json::to_value(&dto).unwrap();
    assert_eq!(serde_json::json!({
      "language": "ar",
      "direction": "rtl",
      "isRTL": true,
      "theme": "dark"
    }), json);
  }
}
