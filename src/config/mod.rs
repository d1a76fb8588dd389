// Adding the context method to errors:
use eyre::WrapErr;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::convert::From;

#[derive(Debug, Deserialize)]
pub struct Config {
  pub db_path: String,
  pub prefs_path: String,
  pub bind_address: String,
  // Used when nothing was saved in the preferences yet.
  // Accepts things like "ar" or "ar_SA.UTF-8".
  pub default_language: String,
  // Comma separated:
  pub admin_ip_addresses: String,
  // "*" allows any origin.
  pub cors_allowed_origin: String,
  // Rate limiter settings:
  pub rl_max_requests: u32,
  pub rl_max_requests_time: u32,
  pub rl_block_duration: u32,
  // Public site info sent along with the home feed:
  pub site_title: String,
  pub site_title_ar: String,
  pub site_root: String,
  pub contact_email: String
}

// Only the public part of the config ends up in the
// app state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfo {
  pub title: String,
  pub title_ar: String,
  pub root: String,
  pub contact_email: String
}

impl From<Config> for SiteInfo {
  fn from(config: Config) -> Self {
    Self {
      title: config.site_title,
      title_ar: config.site_title_ar,
      root: config.site_root,
      contact_email: config.contact_email
    }
  }
}

impl Config {

  pub fn from_env() -> Result<Config> {
    // RUST_LOG is already set in main.rs if it
    // was absent.
    // Keys are lowercase compared to what's in the
    // .env file.
    config::Config::builder()
      .set_default("db_path", "./yna.db")?
      .set_default("prefs_path", "./preferences.json")?
      .set_default("bind_address", "127.0.0.1:8080")?
      .set_default("default_language", "en")?
      .set_default("admin_ip_addresses", "127.0.0.1,::1")?
      .set_default("cors_allowed_origin", "*")?
      .set_default("rl_max_requests", 20)?
      .set_default("rl_max_requests_time", 60)?
      .set_default("rl_block_duration", 120)?
      .set_default("site_title", "Youth News Agency")?
      .set_default("site_title_ar", "وكالة أنباء الشباب")?
      // Should never have a trailing slash.
      .set_default("site_root", "https://yna.news")?
      .set_default("contact_email", "info@yna.news")?
      .add_source(config::Environment::default())
      .build()
      .context("Loading configuration from env")?
      .try_deserialize()
      .context("Loading configuration from env")
  }

  pub fn admin_ips(&self) -> Vec<String> {
    self.admin_ip_addresses.split(',')
      .map(|ip| ip.trim())
      .filter(|ip| !ip.is_empty())
      .map(String::from)
      .collect()
  }

}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_enough() {
    let config = Config::from_env().unwrap();
    assert!(!config.bind_address.is_empty());
    assert!(config.rl_max_requests > 0);
  }

  #[test]
  fn admin_ips_are_split_and_trimmed() {
    let mut config = Config::from_env().unwrap();
    config.admin_ip_addresses = String::from(" 127.0.0.1, ::1 ,,10.0.0.2");
    assert_eq!(vec!["127.0.0.1", "::1", "10.0.0.2"], config.admin_ips());
  }

  #[test]
  fn site_info_takes_the_public_fields() {
    let config = Config::from_env().unwrap();
    let title = config.site_title.clone();
    let info: SiteInfo = config.into();
    assert_eq!(title, info.title);
  }
}
