use actix_web::{
  error::ResponseError,
  http::StatusCode,
  HttpResponse
};
use derive_more::Display;
use log::error;
use crate::db;
use crate::locale::{i18n, Language};

// The full cause of database and internal errors only
// goes to the logs, clients get the generic localized
// message the frontend shows with its "Try Again" button.
#[derive(Debug, Display)]
pub enum Error {
  // Public (localized) message first, cause second.
  #[display(fmt = "{}", _0)]
  DatabaseError(String, String),
  #[display(fmt = "Forbidden: {}", _0)]
  Forbidden(String),
  #[display(fmt = "Not Found: {}", _0)]
  NotFound(String),
  #[display(fmt = "Bad Request: {}", _0)]
  BadRequest(String),
  #[display(fmt = "{}", _0)]
  TooManyRequests(String)
}

impl ResponseError for Error {

  fn status_code(&self) -> StatusCode {
    match self {
      Error::DatabaseError(_, _) =>
        StatusCode::INTERNAL_SERVER_ERROR,
      Error::Forbidden(_) => StatusCode::FORBIDDEN,
      Error::NotFound(_) => StatusCode::NOT_FOUND,
      Error::BadRequest(_) => StatusCode::BAD_REQUEST,
      Error::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS
    }
  }

  // Plain text bodies, same as they've always been.
  fn error_response(&self) -> HttpResponse {
    HttpResponse::build(self.status_code())
      .content_type("text/plain; charset=utf-8")
      .body(self.to_string())
  }

}

impl Error {
  pub fn too_many_requests(language: Language) -> Self {
    Error::TooManyRequests(i18n::translate(language, "too-many-requests"))
  }
}

pub fn map_db_error(e: db::Error, language: Language) -> Error {
  match e {
    db::Error::NotFound(what) => Error::NotFound(what),
    db::Error::Validation(reason) => Error::BadRequest(reason),
    other => {
      error!("Database error - {}", other);
      Error::DatabaseError(
        i18n::translate(language, "error-occurred"),
        other.to_string()
      )
    }
  }
}
