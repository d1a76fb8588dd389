#![allow(dead_code)]
mod config;
mod db;
mod locale;
mod prefs;
mod utils;

use std::env;
use std::fs;
use color_eyre::Result;
use eyre::WrapErr;
use dotenv::dotenv;
use log::{error, info};
use getopts::Options;
use crate::db::Store;
use crate::db::entities::NewPost;
use crate::config::Config;

// Copy pasted this from getopts doc.
fn print_usage(program: &str, opts: Options) {
  let brief = format!("Usage: {} [options]", program);
  print!("{}", opts.usage(&brief));
}

async fn seed(store: &Store, path: &str) -> Result<()> {
  let raw = fs::read_to_string(path)
    .wrap_err_with(|| format!("Reading seed file {}", path))?;
  let posts: Vec<NewPost> = serde_json::from_str(&raw)
    .wrap_err("Seed file should be a JSON array of posts")?;
  let total = posts.len();
  let mut inserted = 0;
  for new_post in posts {
    let slug = new_post.slug.clone();
    // One bad post (duplicate slug usually) shouldn't
    // stop the rest.
    match db::insert_post(store, new_post).await {
      Ok(post) => {
        info!("Inserted post {} ({})", post.slug, post.id);
        inserted += 1;
      },
      Err(e) => error!("Could not insert post {} - {}", slug, e)
    }
  }
  info!("Seeded {} out of {} posts", inserted, total);
  Ok(())
}

/**
 * Binary meant to create the database tables and
 * optionally load posts from a JSON file.
 */
#[tokio::main]
async fn main() -> Result<()> {
  dotenv().ok();
  color_eyre::install()?;
  env_logger::init();

  let args: Vec<String> = env::args().collect();
  let program = args[0].clone();
  let mut opts = Options::new();
  opts.optflag("p", "provision", "Create the tables if they don't exist");
  opts.optopt("s", "seed", "Insert the posts from a JSON file", "FILE");
  opts.optflag("h", "help", "Program usage");
  let opt_matches = opts.parse(&args[1..])?;
  if opt_matches.opt_present("h") ||
    !(opt_matches.opt_present("p") || opt_matches.opt_present("s")) {
    print_usage(&program, opts);
    return Ok(());
  }

  let config = Config::from_env()
    .context("Configuration (environment or .env file) is invalid")?;
  let store = Store::open(&config.db_path)
    .wrap_err("Database connection failed")?;

  if opt_matches.opt_present("p") {
    info!("Provisioning schema in {}...", config.db_path);
    db::provision_schema(&store).await
      .wrap_err("Could not provision the schema")?;
    info!("Schema is ready");
  }
  if let Some(path) = opt_matches.opt_str("s") {
    seed(&store, &path).await?;
  }
  Ok(())
}
