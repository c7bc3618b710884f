use actix_web::{http::StatusCode, HttpResponse};
use derive_more::{Display, From};
use serde_json::json;

use crate::crypto::KeyStoreError;

#[derive(Debug, Display)]
pub enum ServerError {
    #[display(fmt = "note id: {} was not found", _0)]
    NotFound(i32),
    #[display(fmt = "malformed request: {}", _0)]
    MalformedRequest(String),
    DieselError,
    R2D2Error,
    BlockingError,
    TinderCryptError,
}

impl From<r2d2::Error> for ServerError {
    fn from(err: r2d2::Error) -> ServerError {
        log::error!("{err}");
        ServerError::R2D2Error
    }
}

impl From<diesel::result::Error> for ServerError {
    fn from(err: diesel::result::Error) -> ServerError {
        log::error!("{err}");
        ServerError::DieselError
    }
}

impl From<tindercrypt::errors::Error> for ServerError {
    fn from(err: tindercrypt::errors::Error) -> ServerError {
        log::error!("{err:?}");
        ServerError::TinderCryptError
    }
}

impl From<actix_web::error::BlockingError> for ServerError {
    fn from(err: actix_web::error::BlockingError) -> ServerError {
        log::error!("{err}");
        ServerError::BlockingError
    }
}

impl actix_web::error::ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ServerError::NotFound(_) | ServerError::MalformedRequest(_) => self.to_string(),
            ServerError::DieselError => "Library Error: Diesel Error.".to_owned(),
            ServerError::R2D2Error => "Server Error: Pooling Error.".to_owned(),
            ServerError::BlockingError => "Server Error: Worker Pool Error.".to_owned(),
            ServerError::TinderCryptError => {
                "Library Error: Note Encryption Unsuccessful".to_owned()
            }
        };

        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// Anything that stops the process before it starts serving.
#[derive(Debug, Display, From)]
pub enum StartupError {
    #[display(fmt = "configuration error: {}", _0)]
    #[from(ignore)]
    Config(String),
    #[display(fmt = "{}", _0)]
    KeyStore(KeyStoreError),
    #[display(fmt = "database pool error: {}", _0)]
    Pool(r2d2::Error),
    #[display(fmt = "failed to run migrations: {}", _0)]
    #[from(ignore)]
    Migration(String),
    #[display(fmt = "{}", _0)]
    Io(std::io::Error),
}

impl std::error::Error for StartupError {}
