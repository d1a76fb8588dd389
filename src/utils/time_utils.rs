use chrono::{DateTime, Datelike, Duration, NaiveDate, SecondsFormat, Utc};
use crate::locale::Language;

const MONTHS_EN: [&str; 12] = [
  "January", "February", "March", "April", "May", "June",
  "July", "August", "September", "October", "November", "December"
];

const MONTHS_AR: [&str; 12] = [
  "يناير", "فبراير", "مارس", "أبريل", "مايو", "يونيو",
  "يوليو", "أغسطس", "سبتمبر", "أكتوبر", "نوفمبر", "ديسمبر"
];

pub const DB_DATE_FORMAT: &str = "%Y-%m-%d";

// Everything is stored in UTC, the frontend can
// convert to local time if it really wants to.
pub fn now() -> DateTime<Utc> {
  Utc::now()
}

pub fn current_timestamp() -> i64 {
  Utc::now().timestamp()
}

pub fn today() -> NaiveDate {
  Utc::now().date_naive()
}

// Fixed width so the text columns sort in time order.
pub fn db_timestamp(date: &DateTime<Utc>) -> String {
  date.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn db_date(date: &NaiveDate) -> String {
  date.format(DB_DATE_FORMAT).to_string()
}

// First day included in a "last N days" window. Windows
// reaching past the calendar start at its first day.
pub fn window_start(from: NaiveDate, days: u32) -> NaiveDate {
  from.checked_sub_signed(Duration::days(i64::from(days)))
    .unwrap_or(NaiveDate::MIN)
}

// "January 5, 2024" or "5 يناير 2024".
pub fn format_date(date: &DateTime<Utc>, language: Language) -> String {
  let month = date.month0() as usize;
  match language {
    Language::En => format!("{} {}, {}", MONTHS_EN[month], date.day(), date.year()),
    Language::Ar => format!("{} {} {}", date.day(), MONTHS_AR[month], date.year())
  }
}
