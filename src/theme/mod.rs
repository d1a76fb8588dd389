// Light/dark display mode. Same shape as the locale
// state, minus the direction business.

use std::fmt;
use std::sync::{Arc, Mutex};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use log::{error, info};
use crate::prefs::{PreferenceStore, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
  Light,
  Dark
}

impl Default for Theme {
  fn default() -> Self {
    Theme::Light
  }
}

impl Theme {

  pub fn code(&self) -> &'static str {
    match self {
      Theme::Light => "light",
      Theme::Dark => "dark"
    }
  }

  pub fn from_code(code: &str) -> Option<Theme> {
    match code {
      "light" => Some(Theme::Light),
      "dark" => Some(Theme::Dark),
      _ => None
    }
  }

  pub fn toggled(&self) -> Theme {
    match self {
      Theme::Light => Theme::Dark,
      Theme::Dark => Theme::Light
    }
  }

}

impl fmt::Display for Theme {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.code())
  }
}

pub struct ThemeState {
  prefs: Arc<dyn PreferenceStore>,
  tx: watch::Sender<Theme>,
  updates: Mutex<()>
}

impl ThemeState {

  pub fn init(prefs: Arc<dyn PreferenceStore>) -> Self {
    let theme = prefs.get(THEME_KEY)
      .and_then(|code| Theme::from_code(&code))
      .unwrap_or_default();
    info!("Display theme initialized to {}", theme);
    let (tx, _) = watch::channel(theme);
    Self { prefs, tx, updates: Mutex::new(()) }
  }

  pub fn theme(&self) -> Theme {
    *self.tx.borrow()
  }

  pub fn subscribe(&self) -> watch::Receiver<Theme> {
    self.tx.subscribe()
  }

  pub fn set_theme(&self, theme: Theme) -> Theme {
    let _guard = self.updates.lock().unwrap_or_else(|e| e.into_inner());
    self.tx.send_replace(theme);
    self.persist(theme);
    theme
  }

  pub fn toggle_theme(&self) -> Theme {
    let _guard = self.updates.lock().unwrap_or_else(|e| e.into_inner());
    let mut toggled = self.theme();
    self.tx.send_modify(|theme| {
      *theme = theme.toggled();
      toggled = *theme;
    });
    self.persist(toggled);
    toggled
  }

  fn persist(&self, theme: Theme) {
    if let Err(e) = self.prefs.set(THEME_KEY, theme.code()) {
      error!("Could not persist theme preference - {}", e);
    }
  }

}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::prefs::{FilePreferences, MemoryPreferences};
  use crate::prefs::tests::temp_prefs;

  #[test]
  fn defaults_to_light() {
    let sut = ThemeState::init(Arc::new(MemoryPreferences::new()));
    assert_eq!(Theme::Light, sut.theme());
  }

  #[test]
  fn toggle_flips_and_persists() {
    let (_dir, path) = temp_prefs();
    let sut = ThemeState::init(Arc::new(FilePreferences::open(&path)));
    let rx = sut.subscribe();
    assert_eq!(Theme::Dark, sut.toggle_theme());
    assert_eq!(Theme::Dark, *rx.borrow());
    let restarted = ThemeState::init(Arc::new(FilePreferences::open(&path)));
    assert_eq!(Theme::Dark, restarted.theme());
    assert_eq!(Theme::Light, restarted.toggle_theme());
  }

  #[test]
  fn concurrent_toggles_keep_state_and_storage_in_step() {
    let prefs = Arc::new(MemoryPreferences::new());
    let sut = Arc::new(ThemeState::init(prefs.clone()));
    let handles: Vec<_> = (0..8).map(|i| {
      let sut = sut.clone();
      std::thread::spawn(move || {
        // Odd number of toggles in total:
        for _ in 0..(50 + (i == 0) as usize) {
          sut.toggle_theme();
        }
      })
    }).collect();
    for handle in handles {
      handle.join().unwrap();
    }
    assert_eq!(Theme::Dark, sut.theme());
    assert_eq!(prefs.get(THEME_KEY).as_deref(), Some("dark"));
  }

  #[test]
  fn unknown_persisted_theme_is_ignored() {
    let prefs = Arc::new(MemoryPreferences::new());
    prefs.set(THEME_KEY, "sepia").unwrap();
    let sut = ThemeState::init(prefs);
    assert_eq!(Theme::Light, sut.theme());
  }
}
