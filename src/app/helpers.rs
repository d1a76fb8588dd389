use std::net::IpAddr;
use crate::locale::{Language, LocaleState};

// The "lang" query parameter wins over the site-wide
// display language, for links shared in a given
// language.
pub fn request_language(lang: &Option<String>, locale: &LocaleState) -> Language {
  lang.as_deref()
    .and_then(Language::detect)
    .unwrap_or_else(|| locale.language())
}

pub fn bounded(value: Option<u32>, default: u32, max: u32) -> u32 {
  value.unwrap_or(default).min(max)
}

pub fn is_allowed_ip(ip: Option<IpAddr>, allowed: &[String]) -> bool {
  match ip {
    Some(ip) => {
      let addr = ip.to_string();
      allowed.iter().any(|a| *a == addr)
    },
    None => false
  }
}
