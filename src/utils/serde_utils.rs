use serde::{Deserialize, Deserializer};

// The seed files written by the editors use empty
// strings where there's no value (no excerpt, no
// cover image). These should be NULL in database.
pub fn empty_string_to_none(value: Option<String>) -> Option<String> {
  match value {
    Some(s) => if s.trim().is_empty()
      { None } else { Some(s) },
    None => None
  }
}

// To be used with:
// #[serde(default, deserialize_with = "serde_utils::empty_string_is_none")]
pub fn empty_string_is_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let s: Option<String> = Option::deserialize(deserializer)?;
  Ok(empty_string_to_none(s))
}
