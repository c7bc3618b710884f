use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::{errors::ServerError, repository::NoteRepository};

pub async fn check(repo: web::Data<NoteRepository>) -> Result<HttpResponse, ServerError> {
    let notes_count = web::block(move || repo.count_notes()).await??;

    Ok(HttpResponse::Ok().json(json!({
        "status": "healthy",
        "encryption": "enabled",
        "notes_count": notes_count,
    })))
}
