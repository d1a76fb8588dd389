use crate::utils::time_utils;
use super::entities::SiteStat;
use super::mappers::{map_site_stat, map_views, SITE_STAT_FIELDS};
use super::queries::{Filter, Order, OrderBy, Query};
use super::{Result, Store};

pub async fn get_post_analytics(
  store: &Store,
  days: u32
) -> Result<Vec<SiteStat>> {
  let since = time_utils::window_start(time_utils::today(), days);
  let query = Query::select("site_stats", &SITE_STAT_FIELDS)
    .filter(Filter::gte("date", time_utils::db_date(&since)))
    .order(OrderBy::new(Order::Asc, "date"));
  store.select(query, map_site_stat).await
}

// Reads every post's counter and adds them up, there's
// no running total kept anywhere.
pub async fn get_total_views(store: &Store) -> Result<u64> {
  let query = Query::select("posts", &["views"]);
  let views = store.select(query, map_views).await?;
  Ok(views.into_iter().sum())
}
