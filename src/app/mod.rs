use actix_web::{middleware, web, App, HttpServer};
use actix_cors::Cors;
use color_eyre::Result;
use eyre::WrapErr;
use log::{debug, error, info};
use rate_limiter::BasicRateLimiter;
use std::sync::{Arc, RwLock};
// I think we have to add crate here because
// of the other crate named "config" that we
// use as a dependency.
use crate::config::{Config, SiteInfo};
use crate::db::Store;
use crate::locale::{Language, LocaleState};
use crate::prefs::{FilePreferences, PreferenceStore};
use crate::theme::ThemeState;
use dtos::PreferencesDto;
mod handlers;
mod dtos;
mod error;
mod helpers;
mod rate_limiter;
mod guards;

// Declare app state struct:
pub struct AppState {
  pub store: Store,
  pub locale: LocaleState,
  pub theme: ThemeState,
  pub rate_limiter: RwLock<BasicRateLimiter>,
  pub admin_ips: Arc<Vec<String>>,
  pub site_info: SiteInfo
}

impl AppState {

  // Returns true when the request has to be refused.
  pub fn check_rate_limit(&self) -> bool {
    match self.rate_limiter.write() {
      Ok(mut rl) => rl.update(),
      Err(e) => {
        // Let requests through, a poisoned lock shouldn't
        // take the contact form down.
        error!("Could not get a write handle on the \
          rate limiter, SHOULD NEVER HAPPEN - {}", e);
        false
      }
    }
  }

  pub fn preferences(&self) -> PreferencesDto {
    PreferencesDto::new(self.locale.current(), self.theme.theme())
  }

}

// Function to start the server.
pub async fn run() -> Result<()> {
  let config = Config::from_env()
    .context("Configuration (environment or .env file) is invalid")?;
  debug!("Current config: {:?}", config);

  let store = Store::open(&config.db_path)
    .wrap_err("Database connection failed")?;

  // Preferences never fail to load, worst case we
  // start with the defaults.
  let prefs: Arc<dyn PreferenceStore> =
    Arc::new(FilePreferences::open(&config.prefs_path));
  let locale = LocaleState::init(
    prefs.clone(),
    Language::detect(&config.default_language)
  );
  let theme = ThemeState::init(prefs);

  // Got to save these for later because we'll be
  // destroying "config" by moving it into app_state
  // as another struct called SiteInfo.
  let bind_address = config.bind_address.clone();
  let cors_origin = config.cors_allowed_origin.clone();
  let admin_ips = Arc::new(config.admin_ips());

  let app_state = web::Data::new(
    AppState {
      store,
      locale,
      theme,
      rate_limiter: RwLock::new(
        BasicRateLimiter::new(
          config.rl_max_requests,
          config.rl_max_requests_time,
          config.rl_block_duration
        )
      ),
      admin_ips: admin_ips.clone(),
      site_info: config.into()
    }
  );

  info!("Starting server on {}", bind_address);
  HttpServer::new(move|| {
    App::new()
      .app_data(app_state.clone())
      .app_data(web::PathConfig::default().error_handler(|_, _| {
        // No idea how this works but it does:
        actix_web::error::ErrorBadRequest("Invalid path arguments")
      }))
      .app_data(web::QueryConfig::default().error_handler(|_, _| {
        actix_web::error::ErrorBadRequest("Invalid query string arguments")
      }))
      .app_data(web::JsonConfig::default().error_handler(|err, _| {
        actix_web::error::ErrorBadRequest(format!("Invalid JSON body - {}", err))
      }))
      .wrap(cors(&cors_origin))
      .wrap(middleware::Logger::default())
      .configure(|cfg| base_endpoints_config(cfg, admin_ips.clone()))
      .default_service(web::route().to(handlers::not_found))
  })
  .bind(bind_address)?
  .run()
  .await
  .context("Start Actix web server")

}

fn cors(origin: &str) -> Cors {
  let cors = Cors::default()
    .allowed_methods(vec!["GET", "POST", "PUT"])
    .allow_any_header()
    .max_age(3600);
  if origin == "*" {
    cors.allow_any_origin()
  } else {
    cors.allowed_origin(origin)
  }
}

// Route configuration:
fn base_endpoints_config(cfg: &mut web::ServiceConfig, admin_ips: Arc<Vec<String>>) {
  // Create the guard that cause protected endpoints to respond with a 404
  // when the client IP address isn't allowed.
  let ip_guard = guards::IPRestrictedGuard::new(admin_ips);

  cfg.route("/", web::get().to(handlers::index))
    .route("/home", web::get().to(handlers::home))
    .route("/posts", web::get().to(handlers::posts))
    .route("/posts/featured", web::get().to(handlers::featured_posts))
    .route("/posts/search", web::get().to(handlers::search_posts))
    .route("/posts/category/{category}", web::get().to(handlers::posts_by_category))
    .route("/post/{slug}", web::get().to(handlers::post))
    .route("/messages", web::post().to(handlers::post_message))
    .route("/messages", web::get().guard(ip_guard.clone()).to(handlers::messages))
    .route("/settings/{key}", web::get().guard(ip_guard.clone()).to(handlers::get_setting))
    .route("/settings/{key}", web::put().guard(ip_guard.clone()).to(handlers::put_setting))
    .route("/analytics", web::get().guard(ip_guard.clone()).to(handlers::analytics))
    .route("/analytics/total-views", web::get().guard(ip_guard.clone()).to(handlers::total_views))
    .route("/preferences", web::get().to(handlers::preferences))
    // Preferences are site-wide, only admins get to change them.
    .route("/preferences/language", web::put().guard(ip_guard.clone()).to(handlers::set_language))
    .route("/preferences/language/toggle", web::post().guard(ip_guard.clone()).to(handlers::toggle_language))
    .route("/preferences/theme", web::put().guard(ip_guard.clone()).to(handlers::set_theme))
    .route("/preferences/theme/toggle", web::post().guard(ip_guard).to(handlers::toggle_theme))
    .route("/i18n/{lang}", web::get().to(handlers::translations));
}
