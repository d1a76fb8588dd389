use actix_web::{
  web,
  HttpResponse,
  HttpRequest,
  Result
};
use serde::Deserialize;
use log::{error, info};
use crate::db;
use crate::db::entities::PostStatus;
use crate::locale::{i18n, Language};
use crate::theme::Theme;
use crate::utils::text_utils;
use super::dtos::*;
use super::error::{Error, map_db_error};
use super::AppState;
use super::helpers::{self, bounded, request_language};

// Module with all the API handler functions.

// Few constants that don't really qualify for the
// config file. Home page numbers are the ones the
// frontend was designed around.
const HOME_FEATURED: u32 = 3;
const HOME_LATEST: u32 = 8;
const DEFAULT_POSTS: u32 = 10;
const DEFAULT_FEATURED: u32 = 5;
const MAX_POSTS: u32 = 50;
const DEFAULT_MESSAGES: u32 = 50;
const MAX_MESSAGES: u32 = 200;
const DEFAULT_ANALYTICS_DAYS: u32 = 30;
const MAX_ANALYTICS_DAYS: u32 = 366;
const MAX_SEARCH_LENGTH: usize = 100;

/* --- Query string objects --- */
#[derive(Deserialize)]
pub struct LangQuery {
  pub lang: Option<String>
}

#[derive(Deserialize)]
pub struct PostsQuery {
  pub max: Option<u32>,
  pub start: Option<u32>,
  pub status: Option<String>,
  pub lang: Option<String>
}

#[derive(Deserialize)]
pub struct LimitQuery {
  pub max: Option<u32>,
  pub lang: Option<String>
}

#[derive(Deserialize)]
pub struct SearchQuery {
  pub q: Option<String>,
  pub max: Option<u32>,
  pub lang: Option<String>
}

#[derive(Deserialize)]
pub struct AnalyticsQuery {
  pub days: Option<u32>
}
/* --- End query string objects --- */

pub async fn index() -> HttpResponse {
  HttpResponse::Ok().body("Nothing here")
}

// Default response when no route matched the request:
pub async fn not_found(
  app_state: web::Data<AppState>
) -> Result<HttpResponse, Error> {
  Err(Error::NotFound(
    i18n::translate(app_state.locale.language(), "page-not-found")
  ))
}

// Featured and latest posts are fetched together, if
// either fails the whole page fails and the frontend
// offers to reload.
pub async fn home(
  app_state: web::Data<AppState>,
  query: web::Query<LangQuery>
) -> Result<HttpResponse, Error> {
  let language = request_language(&query.lang, &app_state.locale);
  let (featured, latest) = futures::try_join!(
    db::list_featured_posts(&app_state.store, HOME_FEATURED),
    db::list_posts(&app_state.store, HOME_LATEST, 0, PostStatus::Published)
  ).map_err(|e| map_db_error(e, language))?;

  Ok(HttpResponse::Ok().json(HomeDto {
    site: &app_state.site_info,
    preferences: PreferencesDto::new(
      app_state.locale.current(),
      app_state.theme.theme()
    ),
    featured: post_cards(featured, language),
    latest: post_cards(latest, language)
  }))
}

pub async fn posts(
  app_state: web::Data<AppState>,
  query: web::Query<PostsQuery>,
  req: HttpRequest
) -> Result<HttpResponse, Error> {
  let language = request_language(&query.lang, &app_state.locale);
  let status = match &query.status {
    Some(code) => PostStatus::from_code(code)
      .ok_or_else(|| Error::BadRequest(format!("Unknown post status {}", code)))?,
    None => PostStatus::Published
  };
  // Drafts are for the admin dashboard only.
  if status == PostStatus::Draft &&
    !helpers::is_allowed_ip(req.peer_addr().map(|a| a.ip()), &app_state.admin_ips) {
    return Err(Error::Forbidden(String::from("Drafts are not public")));
  }
  let posts = db::list_posts(
    &app_state.store,
    bounded(query.max, DEFAULT_POSTS, MAX_POSTS),
    query.start.unwrap_or_default(),
    status
  ).await.map_err(|e| map_db_error(e, language))?;
  Ok(HttpResponse::Ok().json(post_cards(posts, language)))
}

pub async fn featured_posts(
  app_state: web::Data<AppState>,
  query: web::Query<LimitQuery>
) -> Result<HttpResponse, Error> {
  let language = request_language(&query.lang, &app_state.locale);
  let posts = db::list_featured_posts(
    &app_state.store,
    bounded(query.max, DEFAULT_FEATURED, MAX_POSTS)
  ).await.map_err(|e| map_db_error(e, language))?;
  Ok(HttpResponse::Ok().json(post_cards(posts, language)))
}

// Path variables have to be in a tuple.
pub async fn posts_by_category(
  app_state: web::Data<AppState>,
  path: web::Path<(String,)>,
  query: web::Query<LimitQuery>
) -> Result<HttpResponse, Error> {
  let category = path.into_inner().0;
  let language = request_language(&query.lang, &app_state.locale);
  let posts = db::list_posts_by_category(
    &app_state.store,
    &category,
    bounded(query.max, DEFAULT_POSTS, MAX_POSTS)
  ).await.map_err(|e| map_db_error(e, language))?;
  Ok(HttpResponse::Ok().json(post_cards(posts, language)))
}

// Shares the rate limiter with the contact form.
pub async fn search_posts(
  app_state: web::Data<AppState>,
  query: web::Query<SearchQuery>
) -> Result<HttpResponse, Error> {
  let language = request_language(&query.lang, &app_state.locale);
  if app_state.check_rate_limit() {
    return Err(Error::too_many_requests(language));
  }
  let search = query.q.as_deref()
    .and_then(|q| text_utils::normalize_search_query(q, MAX_SEARCH_LENGTH));
  match search {
    // Not actually an error, just return nothing:
    None => Ok(HttpResponse::Ok().json(Vec::<PostDto>::new())),
    Some(search) => {
      let posts = db::search_posts(
        &app_state.store,
        &search,
        bounded(query.max, DEFAULT_POSTS, MAX_POSTS)
      ).await.map_err(|e| map_db_error(e, language))?;
      Ok(HttpResponse::Ok().json(post_cards(posts, language)))
    }
  }
}

pub async fn post(
  app_state: web::Data<AppState>,
  path: web::Path<(String,)>,
  query: web::Query<LangQuery>
) -> Result<HttpResponse, Error> {
  let slug = path.into_inner().0;
  let language = request_language(&query.lang, &app_state.locale);
  let post = db::get_post_by_slug(&app_state.store, &slug)
    .await
    .map_err(|e| map_db_error(e, language))?;
  match post {
    Some(post) => {
      // A failed view count shouldn't prevent anyone
      // from reading the post.
      if let Err(e) = db::increment_post_views(&app_state.store, &post.id).await {
        error!("Could not count a view for post {} - {}", post.slug, e);
      }
      Ok(HttpResponse::Ok().json(PostDto::localized(post, language)))
    },
    None => Err(Error::NotFound(i18n::translate(language, "page-not-found")))
  }
}

pub async fn post_message(
  app_state: web::Data<AppState>,
  form: web::Json<MessageForm>,
  query: web::Query<LangQuery>
) -> Result<HttpResponse, Error> {
  let language = request_language(&query.lang, &app_state.locale);
  let form = form.into_inner();
  // Empty fields are refused before counting against
  // the rate limit or touching the database.
  if form.name.trim().is_empty() || form.email.trim().is_empty()
    || form.message.trim().is_empty() {
    return Err(Error::BadRequest(i18n::translate(language, "required-field")));
  }
  if app_state.check_rate_limit() {
    return Err(Error::too_many_requests(language));
  }
  let message = db::create_message(
    &app_state.store,
    &form.name,
    &form.email,
    &form.message
  ).await.map_err(|e| map_db_error(e, language))?;
  info!("New contact message {} received", message.id);
  Ok(HttpResponse::Ok().json(JsonStatus::new_with_id(
    JsonStatusType::Success,
    &i18n::translate(language, "message-sent"),
    &message.id
  )))
}

pub async fn messages(
  app_state: web::Data<AppState>,
  query: web::Query<LimitQuery>
) -> Result<HttpResponse, Error> {
  let language = request_language(&query.lang, &app_state.locale);
  let messages: Vec<MessageDto> = db::list_messages(
    &app_state.store,
    bounded(query.max, DEFAULT_MESSAGES, MAX_MESSAGES)
  ).await
    .map_err(|e| map_db_error(e, language))?
    .into_iter()
    .map(MessageDto::from)
    .collect();
  Ok(HttpResponse::Ok().json(messages))
}

pub async fn get_setting(
  app_state: web::Data<AppState>,
  path: web::Path<(String,)>
) -> Result<HttpResponse, Error> {
  let key = path.into_inner().0;
  let value = db::get_setting(&app_state.store, &key)
    .await
    .map_err(|e| map_db_error(e, app_state.locale.language()))?;
  Ok(HttpResponse::Ok().json(SettingDto { key, value }))
}

pub async fn put_setting(
  app_state: web::Data<AppState>,
  path: web::Path<(String,)>,
  body: web::Json<SettingBody>
) -> Result<HttpResponse, Error> {
  let key = path.into_inner().0;
  if key.trim().is_empty() {
    return Err(Error::BadRequest(String::from("Setting key cannot be empty")));
  }
  db::set_setting(&app_state.store, &key, &body.value)
    .await
    .map_err(|e| map_db_error(e, app_state.locale.language()))?;
  Ok(HttpResponse::Ok().json(SettingDto { key, value: body.into_inner().value }))
}

pub async fn analytics(
  app_state: web::Data<AppState>,
  query: web::Query<AnalyticsQuery>
) -> Result<HttpResponse, Error> {
  let stats: Vec<SiteStatDto> = db::get_post_analytics(
    &app_state.store,
    bounded(query.days, DEFAULT_ANALYTICS_DAYS, MAX_ANALYTICS_DAYS)
  ).await.map_err(|e| map_db_error(e, app_state.locale.language()))?;
  Ok(HttpResponse::Ok().json(stats))
}

pub async fn total_views(
  app_state: web::Data<AppState>
) -> Result<HttpResponse, Error> {
  let total_views = db::get_total_views(&app_state.store)
    .await
    .map_err(|e| map_db_error(e, app_state.locale.language()))?;
  Ok(HttpResponse::Ok().json(TotalViewsDto { total_views }))
}

pub async fn preferences(
  app_state: web::Data<AppState>
) -> HttpResponse {
  HttpResponse::Ok().json(app_state.preferences())
}

pub async fn set_language(
  app_state: web::Data<AppState>,
  body: web::Json<LanguageBody>
) -> Result<HttpResponse, Error> {
  match app_state.locale.set_language_code(&body.language) {
    Some(_) => Ok(HttpResponse::Ok().json(app_state.preferences())),
    None => Err(Error::BadRequest(format!("Unsupported language {}", body.language)))
  }
}

pub async fn toggle_language(
  app_state: web::Data<AppState>
) -> HttpResponse {
  app_state.locale.toggle_language();
  HttpResponse::Ok().json(app_state.preferences())
}

pub async fn set_theme(
  app_state: web::Data<AppState>,
  body: web::Json<ThemeBody>
) -> Result<HttpResponse, Error> {
  match Theme::from_code(&body.theme) {
    Some(theme) => {
      app_state.theme.set_theme(theme);
      Ok(HttpResponse::Ok().json(app_state.preferences()))
    },
    None => Err(Error::BadRequest(format!("Unsupported theme {}", body.theme)))
  }
}

pub async fn toggle_theme(
  app_state: web::Data<AppState>
) -> HttpResponse {
  app_state.theme.toggle_theme();
  HttpResponse::Ok().json(app_state.preferences())
}

pub async fn translations(
  path: web::Path<(String,)>
) -> Result<HttpResponse, Error> {
  let code = path.into_inner().0;
  match Language::from_code(&code) {
    Some(language) => Ok(HttpResponse::Ok().json(i18n::catalogue(language))),
    None => Err(Error::NotFound(format!("No translations for {}", code)))
  }
}
