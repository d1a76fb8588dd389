/*
 * Display language state: which language the site is
 * rendered in, and the text direction that goes with it.
 */

use std::fmt;
use std::sync::{Arc, Mutex};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use log::{error, info};
use crate::prefs::{PreferenceStore, LANGUAGE_KEY};
pub mod i18n;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
  En,
  Ar
}

impl Default for Language {
  fn default() -> Self {
    Language::En
  }
}

impl Language {

  pub const ALL: [Language; 2] = [Language::En, Language::Ar];

  pub fn code(&self) -> &'static str {
    match self {
      Language::En => "en",
      Language::Ar => "ar"
    }
  }

  // Strict: only the exact codes we support.
  pub fn from_code(code: &str) -> Option<Language> {
    match code {
      "en" => Some(Language::En),
      "ar" => Some(Language::Ar),
      _ => None
    }
  }

  // Lenient version for things like "ar-SA", "en_US.UTF-8"
  // or "AR" coming from the environment or browsers.
  pub fn detect(tag: &str) -> Option<Language> {
    let primary: String = tag.trim()
      .chars()
      .take_while(|c| c.is_ascii_alphabetic())
      .collect();
    Language::from_code(&primary.to_ascii_lowercase())
  }

  pub fn is_rtl(&self) -> bool {
    *self == Language::Ar
  }

  pub fn direction(&self) -> TextDirection {
    if self.is_rtl() { TextDirection::Rtl } else { TextDirection::Ltr }
  }

  pub fn toggled(&self) -> Language {
    match self {
      Language::En => Language::Ar,
      Language::Ar => Language::En
    }
  }

}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.code())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
  Ltr,
  Rtl
}

// What consumers observe. The direction is derived
// from the language when the snapshot is built so both
// always change together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Locale {
  pub language: Language,
  pub direction: TextDirection
}

impl Locale {
  pub fn is_rtl(&self) -> bool {
    self.direction == TextDirection::Rtl
  }
}

impl From<Language> for Locale {
  fn from(language: Language) -> Self {
    Self {
      language,
      direction: language.direction()
    }
  }
}

/// Value with one version per supported language,
/// e.g. the title of a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Localized<T> {
  pub en: T,
  pub ar: T
}

impl<T> Localized<T> {

  pub fn new(en: T, ar: T) -> Self {
    Self { en, ar }
  }

  pub fn get(&self, language: Language) -> &T {
    match language {
      Language::En => &self.en,
      Language::Ar => &self.ar
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = &T> {
    Language::ALL.iter().map(move |l| self.get(*l))
  }

}

pub struct LocaleState {
  prefs: Arc<dyn PreferenceStore>,
  tx: watch::Sender<Locale>,
  // Held while changing and saving, so what's saved
  // is always the last published value.
  updates: Mutex<()>
}

impl LocaleState {

  // Persisted choice first, then whatever was detected,
  // then English.
  pub fn init(
    prefs: Arc<dyn PreferenceStore>,
    detected: Option<Language>
  ) -> Self {
    let language = prefs.get(LANGUAGE_KEY)
      .and_then(|code| Language::from_code(&code))
      .or(detected)
      .unwrap_or_default();
    info!("Display language initialized to {}", language);
    let (tx, _) = watch::channel(Locale::from(language));
    Self { prefs, tx, updates: Mutex::new(()) }
  }

  pub fn current(&self) -> Locale {
    *self.tx.borrow()
  }

  pub fn language(&self) -> Language {
    self.current().language
  }

  pub fn is_rtl(&self) -> bool {
    self.current().is_rtl()
  }

  pub fn subscribe(&self) -> watch::Receiver<Locale> {
    self.tx.subscribe()
  }

  pub fn set_language(&self, language: Language) -> Locale {
    let _guard = self.updates.lock().unwrap_or_else(|e| e.into_inner());
    let locale = Locale::from(language);
    self.tx.send_replace(locale);
    self.persist(language);
    locale
  }

  // Unsupported codes leave the state untouched.
  pub fn set_language_code(&self, code: &str) -> Option<Locale> {
    Language::from_code(code).map(|l| self.set_language(l))
  }

  pub fn toggle_language(&self) -> Locale {
    let _guard = self.updates.lock().unwrap_or_else(|e| e.into_inner());
    let mut toggled = self.current();
    self.tx.send_modify(|locale| {
      *locale = Locale::from(locale.language.toggled());
      toggled = *locale;
    });
    self.persist(toggled.language);
    toggled
  }

  fn persist(&self, language: Language) {
    // The in-memory state is already updated at this
    // point, a storage failure only loses the choice
    // for the next start.
    if let Err(e) = self.prefs.set(LANGUAGE_KEY, language.code()) {
      error!("Could not persist language preference - {}", e);
    }
  }

}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::prefs::MemoryPreferences;
  use crate::prefs::FilePreferences;
  use crate::prefs::tests::temp_prefs;

  fn memory_state() -> (Arc<MemoryPreferences>, LocaleState) {
    let prefs = Arc::new(MemoryPreferences::new());
    let state = LocaleState::init(prefs.clone(), None);
    (prefs, state)
  }

  #[test]
  fn defaults_to_english() {
    let (_, sut) = memory_state();
    assert_eq!(Language::En, sut.language());
    assert!(!sut.is_rtl());
  }

  #[test]
  fn detected_language_used_without_preference() {
    let prefs = Arc::new(MemoryPreferences::new());
    let sut = LocaleState::init(prefs, Language::detect("ar_SA.UTF-8"));
    assert_eq!(Language::Ar, sut.language());
  }

  #[test]
  fn persisted_preference_beats_detection() {
    let prefs = Arc::new(MemoryPreferences::new());
    prefs.set(LANGUAGE_KEY, "en").unwrap();
    let sut = LocaleState::init(prefs, Some(Language::Ar));
    assert_eq!(Language::En, sut.language());
  }

  #[test]
  fn garbage_preference_is_ignored() {
    let prefs = Arc::new(MemoryPreferences::new());
    prefs.set(LANGUAGE_KEY, "klingon").unwrap();
    let sut = LocaleState::init(prefs, None);
    assert_eq!(Language::En, sut.language());
  }

  #[test]
  fn set_language_updates_direction_and_persists() {
    for language in Language::ALL.iter() {
      let (_dir, path) = temp_prefs();
      let sut = LocaleState::init(Arc::new(FilePreferences::open(&path)), None);
      let locale = sut.set_language(*language);
      assert_eq!(locale.is_rtl(), *language == Language::Ar);
      assert_eq!(sut.is_rtl(), *language == Language::Ar);
      // A fresh start restores the choice:
      let restarted = LocaleState::init(Arc::new(FilePreferences::open(&path)), None);
      assert_eq!(*language, restarted.language());
    }
  }

  #[test]
  fn unsupported_code_is_a_no_op() {
    let (prefs, sut) = memory_state();
    sut.set_language(Language::Ar);
    assert_eq!(None, sut.set_language_code("fr"));
    assert_eq!(Language::Ar, sut.language());
    assert_eq!(prefs.get(LANGUAGE_KEY).as_deref(), Some("ar"));
  }

  #[test]
  fn toggle_is_an_involution() {
    let (prefs, sut) = memory_state();
    for start in Language::ALL.iter() {
      sut.set_language(*start);
      let toggled = sut.toggle_language();
      assert_eq!(start.toggled(), toggled.language);
      assert_eq!(prefs.get(LANGUAGE_KEY).as_deref(), Some(toggled.language.code()));
      assert_eq!(*start, sut.toggle_language().language);
    }
  }

  #[test]
  fn concurrent_toggles_keep_state_and_storage_in_step() {
    let (prefs, sut) = memory_state();
    let sut = Arc::new(sut);
    let handles: Vec<_> = (0..8).map(|_| {
      let sut = sut.clone();
      std::thread::spawn(move || {
        for _ in 0..50 {
          sut.toggle_language();
        }
      })
    }).collect();
    for handle in handles {
      handle.join().unwrap();
    }
    // 400 toggles, back where it started:
    assert_eq!(Language::En, sut.language());
    assert_eq!(prefs.get(LANGUAGE_KEY).as_deref(), Some("en"));
  }

  #[test]
  fn subscribers_see_updates_immediately() {
    let (_, sut) = memory_state();
    let rx = sut.subscribe();
    sut.set_language(Language::Ar);
    let seen = *rx.borrow();
    assert_eq!(Language::Ar, seen.language);
    assert_eq!(TextDirection::Rtl, seen.direction);
    assert!(rx.has_changed().unwrap());
  }

  #[test]
  fn language_detection() {
    assert_eq!(Some(Language::Ar), Language::detect("ar-SA"));
    assert_eq!(Some(Language::En), Language::detect("EN_us.UTF-8"));
    assert_eq!(None, Language::detect("fr-FR"));
    assert_eq!(None, Language::detect(""));
  }

  #[test]
  fn localized_value_is_indexed_by_language() {
    let title = Localized::new("Hello".to_string(), "مرحبا".to_string());
    assert_eq!("Hello", title.get(Language::En));
    assert_eq!("مرحبا", title.get(Language::Ar));
    assert_eq!(2, title.iter().count());
  }
}
