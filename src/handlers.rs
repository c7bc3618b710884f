use actix_web::web;

use crate::errors::ServerError;

pub mod health;
pub mod note;

pub async fn index() -> impl actix_web::Responder {
    actix_web::HttpResponse::Ok().finish()
}

/// Routes for the whole service. Malformed JSON bodies are rejected before a
/// handler runs, so nothing gets written.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ServerError::MalformedRequest(err.to_string()).into()),
    )
    .route("/", web::get().to(index))
    .service(
        web::scope("/api")
            .route("/health", web::get().to(health::check))
            .service(
                web::scope("/notes")
                    .route("", web::get().to(note::list))
                    .route("", web::post().to(note::create))
                    .route("/{id}", web::put().to(note::update))
                    .route("/{id}", web::delete().to(note::delete)),
            ),
    );
}
