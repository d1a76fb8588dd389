mod config;
mod db;
mod locale;
mod theme;
mod prefs;
mod app;
mod utils;
use color_eyre::Result;
use dotenv::dotenv;
use std::env;

#[actix_web::main]
async fn main() -> Result<()> {
  dotenv().ok();
  // Default log level is info, unless RUST_LOG says
  // otherwise.
  if env::var("RUST_LOG").is_err() {
    env::set_var("RUST_LOG", "info");
  }
  color_eyre::install()?;
  env_logger::init();
  app::run().await
}
