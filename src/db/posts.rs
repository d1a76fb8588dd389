use rusqlite::params;
use uuid::Uuid;
use crate::utils::time_utils;
use super::entities::{NewPost, Post, PostStatus};
use super::mappers::{map_post, POST_FIELDS};
use super::queries::{Filter, Order, OrderBy, Query};
use super::{empty_if_schema_absent, Result, Store};

const POSTS_TABLE: &str = "posts";

// Columns the free text search looks into.
const SEARCH_FIELDS: [&str; 4] = ["title_en", "title_ar", "content_en", "content_ar"];

fn newest_posts() -> Query {
  Query::select(POSTS_TABLE, &POST_FIELDS)
    .order(OrderBy::new(Order::Desc, "created_at"))
}

fn published() -> Filter {
  Filter::eq("status", PostStatus::Published.code().to_string())
}

pub async fn list_posts(
  store: &Store,
  limit: u32,
  offset: u32,
  status: PostStatus
) -> Result<Vec<Post>> {
  let query = newest_posts()
    .filter(Filter::eq("status", status.code().to_string()))
    .range(offset, limit);
  empty_if_schema_absent(store.select(query, map_post).await)
}

pub async fn get_post_by_slug(
  store: &Store,
  slug: &str
) -> Result<Option<Post>> {
  let query = Query::select(POSTS_TABLE, &POST_FIELDS)
    .filter(Filter::eq("slug", slug.to_string()))
    .limit(1);
  empty_if_schema_absent(store.select(query, map_post).await)
    .map(|posts| posts.into_iter().next())
}

pub async fn list_posts_by_category(
  store: &Store,
  category: &str,
  limit: u32
) -> Result<Vec<Post>> {
  let query = newest_posts()
    .filter(Filter::eq("category", category.to_string()))
    .filter(published())
    .limit(limit);
  empty_if_schema_absent(store.select(query, map_post).await)
}

pub async fn search_posts(
  store: &Store,
  search: &str,
  limit: u32
) -> Result<Vec<Post>> {
  let query = newest_posts()
    .filter(Filter::any_contains(&SEARCH_FIELDS, search))
    .filter(published())
    .limit(limit);
  empty_if_schema_absent(store.select(query, map_post).await)
}

pub async fn list_featured_posts(
  store: &Store,
  limit: u32
) -> Result<Vec<Post>> {
  let query = newest_posts()
    .filter(Filter::eq("featured", true))
    .filter(published())
    .limit(limit);
  empty_if_schema_absent(store.select(query, map_post).await)
}

// Not tolerant of anything: the caller decides what to
// do when counting a view fails. Bumps the post counter
// and today's bucket in site_stats together.
pub async fn increment_post_views(
  store: &Store,
  post_id: &str
) -> Result<()> {
  let post_id = post_id.to_string();
  let today = time_utils::db_date(&time_utils::today());
  store.call(POSTS_TABLE, move |conn| {
    let tx = conn.transaction()?;
    let updated = tx.execute(
      "UPDATE posts SET views = views + 1 WHERE id = ?1",
      params![post_id]
    )?;
    if updated == 0 {
      // Dropping the transaction rolls it back.
      return Err(rusqlite::Error::QueryReturnedNoRows);
    }
    tx.execute(
      "INSERT INTO site_stats (id, post_id, view_count, date) VALUES (?1, ?2, 1, ?3)
      ON CONFLICT (post_id, date) DO UPDATE SET view_count = view_count + 1",
      params![Uuid::new_v4().to_string(), post_id, today]
    )?;
    tx.commit()
  }).await
}

pub async fn insert_post(
  store: &Store,
  new_post: NewPost
) -> Result<Post> {
  let now = time_utils::now();
  let created_at = new_post.created_at.unwrap_or(now);
  let id = Uuid::new_v4().to_string();
  let tags = serde_json::to_string(&new_post.tags)
    .map_err(|e| super::Error::Backend(format!("Could not serialize tags - {}", e)))?;
  store.call(POSTS_TABLE, move |conn| {
    conn.query_row(
      &format!(
        "INSERT INTO posts ({}) VALUES \
        (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17) \
        RETURNING {}",
        POST_FIELDS.join(","),
        POST_FIELDS.join(",")
      ),
      params![
        id,
        new_post.slug,
        new_post.title_en,
        new_post.title_ar,
        new_post.content_en,
        new_post.content_ar,
        new_post.excerpt_en,
        new_post.excerpt_ar,
        new_post.category,
        tags,
        new_post.cover_image,
        new_post.views as i64,
        new_post.status.code(),
        new_post.featured,
        new_post.author_id,
        time_utils::db_timestamp(&created_at),
        time_utils::db_timestamp(&now)
      ],
      map_post
    )
  }).await
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::Error;
  use crate::db::test_helpers::*;

  async fn fixture_store() -> Store {
    let store = provisioned_store().await;
    let mut featured = sample_post("featured-one", 3);
    featured.featured = true;
    featured.title_en = String::from("Youth Summit Opens");
    let mut draft = sample_post("draft-one", 0);
    draft.status = PostStatus::Draft;
    draft.featured = true;
    let mut sports = sample_post("sports-one", 2);
    sports.category = String::from("sports");
    sports.content_ar = String::from("مباراة كرة القدم");
    for post in vec![featured, draft, sports, sample_post("news-one", 1)] {
      insert_post(&store, post).await.unwrap();
    }
    store
  }

  fn slugs(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|p| p.slug.as_str()).collect()
  }

  #[tokio::test]
  async fn reads_are_empty_when_schema_is_absent() {
    let store = empty_store();
    assert!(list_posts(&store, 10, 0, PostStatus::Published).await.unwrap().is_empty());
    assert!(list_featured_posts(&store, 5).await.unwrap().is_empty());
    assert!(list_posts_by_category(&store, "news", 10).await.unwrap().is_empty());
    assert!(search_posts(&store, "youth", 10).await.unwrap().is_empty());
    assert_eq!(None, get_post_by_slug(&store, "nonexistent-slug").await.unwrap());
  }

  #[tokio::test]
  async fn list_posts_is_newest_first_and_paginated() {
    let store = fixture_store().await;
    let posts = list_posts(&store, 10, 0, PostStatus::Published).await.unwrap();
    assert_eq!(vec!["news-one", "sports-one", "featured-one"], slugs(&posts));
    let second_page = list_posts(&store, 2, 2, PostStatus::Published).await.unwrap();
    assert_eq!(vec!["featured-one"], slugs(&second_page));
    let drafts = list_posts(&store, 10, 0, PostStatus::Draft).await.unwrap();
    assert_eq!(vec!["draft-one"], slugs(&drafts));
  }

  #[tokio::test]
  async fn post_by_slug() {
    let store = fixture_store().await;
    let post = get_post_by_slug(&store, "sports-one").await.unwrap().unwrap();
    assert_eq!("sports", post.category);
    assert_eq!("مباراة كرة القدم", post.content.ar);
    assert_eq!(created(2), post.created_at);
    assert_eq!(None, get_post_by_slug(&store, "nonexistent-slug").await.unwrap());
  }

  #[tokio::test]
  async fn featured_only_includes_published() {
    let store = fixture_store().await;
    let posts = list_featured_posts(&store, 5).await.unwrap();
    assert_eq!(vec!["featured-one"], slugs(&posts));
  }

  #[tokio::test]
  async fn by_category() {
    let store = fixture_store().await;
    let posts = list_posts_by_category(&store, "news", 10).await.unwrap();
    assert_eq!(vec!["news-one", "featured-one"], slugs(&posts));
    let limited = list_posts_by_category(&store, "news", 1).await.unwrap();
    assert_eq!(vec!["news-one"], slugs(&limited));
  }

  #[tokio::test]
  async fn search_is_case_insensitive_across_languages() {
    let store = fixture_store().await;
    let posts = search_posts(&store, "youth SUMMIT", 10).await.unwrap();
    assert_eq!(vec!["featured-one"], slugs(&posts));
    let arabic = search_posts(&store, "كرة", 10).await.unwrap();
    assert_eq!(vec!["sports-one"], slugs(&arabic));
    // Drafts never show up:
    let drafts = search_posts(&store, "draft-one", 10).await.unwrap();
    assert!(drafts.is_empty());
    // Wildcards are taken literally:
    assert!(search_posts(&store, "%", 10).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn increment_views_counts_and_buckets() {
    let store = fixture_store().await;
    let post = get_post_by_slug(&store, "news-one").await.unwrap().unwrap();
    increment_post_views(&store, &post.id).await.unwrap();
    increment_post_views(&store, &post.id).await.unwrap();
    let post = get_post_by_slug(&store, "news-one").await.unwrap().unwrap();
    assert_eq!(2, post.views);
    let stats = crate::db::get_post_analytics(&store, 1).await.unwrap();
    assert_eq!(1, stats.len());
    assert_eq!(2, stats[0].view_count);
    assert_eq!(post.id, stats[0].post_id);
  }

  #[tokio::test]
  async fn increment_views_on_unknown_post_fails() {
    let store = fixture_store().await;
    let result = increment_post_views(&store, "no-such-id").await;
    assert_eq!(Err(Error::NotFound(String::from("posts"))), result);
    // Nothing got bucketed either:
    assert!(crate::db::get_post_analytics(&store, 1).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn increment_views_without_schema_fails() {
    let store = empty_store();
    let result = increment_post_views(&store, "whatever").await;
    assert!(result.unwrap_err().is_schema_absent());
  }

  #[tokio::test]
  async fn duplicate_slug_is_rejected() {
    let store = fixture_store().await;
    let result = insert_post(&store, sample_post("news-one", 9)).await;
    match result {
      Err(Error::Backend(_)) => (),
      other => panic!("Expected a backend error, got {:?}", other)
    }
  }
}
