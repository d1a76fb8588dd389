use regex::Regex;
use lazy_static::lazy_static;

// Average reading speed used for the "x min read" badge.
const WORDS_PER_MINUTE: usize = 200;

lazy_static! {
  static ref HTML_TAG_REGEX: Regex = Regex::new(r"<[^>]*>").unwrap();
  static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
  // Same loose check browsers do for <input type="email">.
  static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+$").unwrap();
}

// Using truncate directly can panic when the cut
// lands in the middle of a multibyte char, which is
// pretty much guaranteed with Arabic text.
pub fn truncate_utf8(s: &mut String, max_chars: usize) {
  if let Some((idx, _)) = s.char_indices().nth(max_chars) {
    s.truncate(idx);
  }
}

pub fn strip_html(html: &str) -> String {
  HTML_TAG_REGEX.replace_all(html, " ").to_string()
}

/// Estimated reading time in minutes, never less than one.
pub fn reading_time(content: &str) -> usize {
  let words = strip_html(content).split_whitespace().count();
  std::cmp::max(1, (words + WORDS_PER_MINUTE - 1) / WORDS_PER_MINUTE)
}

// Trims, collapses inner whitespace and caps the length
// of a search query. None means there's nothing left to
// search for.
pub fn normalize_search_query(query: &str, max_chars: usize) -> Option<String> {
  let mut normalized = WHITESPACE_REGEX
    .replace_all(query.trim(), " ")
    .to_string();
  truncate_utf8(&mut normalized, max_chars);
  let normalized = normalized.trim_end().to_string();
  if normalized.is_empty() { None } else { Some(normalized) }
}

// LIKE wildcards in user input have to be escaped, the
// queries use '\' as the ESCAPE character.
pub fn escape_like(value: &str) -> String {
  let mut escaped = String::with_capacity(value.len());
  for c in value.chars() {
    if c == '\\' || c == '%' || c == '_' {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped
}

pub fn looks_like_email(value: &str) -> bool {
  EMAIL_REGEX.is_match(value)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn truncate_does_not_split_arabic_chars() {
    let mut sut = String::from("مرحبا بالعالم");
    truncate_utf8(&mut sut, 5);
    assert_eq!(sut, "مرحبا");
  }

  #[test]
  fn truncate_shorter_string_is_untouched() {
    let mut sut = String::from("hello");
    truncate_utf8(&mut sut, 50);
    assert_eq!(sut, "hello");
  }

  #[test]
  fn reading_time_rounds_up_and_ignores_tags() {
    assert_eq!(reading_time(""), 1);
    let words = vec!["word"; 201].join(" ");
    assert_eq!(reading_time(&words), 2);
    let html = format!("<p>{}</p><img src=\"a.png\" alt=\"x\">", vec!["w"; 200].join(" "));
    assert_eq!(reading_time(&html), 1);
  }

  #[test]
  fn search_query_is_normalized() {
    assert_eq!(
      normalize_search_query("  youth \n  news ", 100),
      Some(String::from("youth news"))
    );
    assert_eq!(normalize_search_query(" \t ", 100), None);
    assert_eq!(normalize_search_query("abcdef", 3), Some(String::from("abc")));
  }

  #[test]
  fn like_wildcards_are_escaped() {
    assert_eq!(escape_like(r"50%_off\"), r"50\%\_off\\");
    assert_eq!(escape_like("plain"), "plain");
  }

  #[test]
  fn email_check_is_loose() {
    assert!(looks_like_email("jane@example.com"));
    assert!(looks_like_email("a@b.com"));
    assert!(!looks_like_email("jane"));
    assert!(!looks_like_email("jane @example.com"));
  }
}
