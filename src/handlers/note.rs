use actix_web::{web, HttpResponse};

use crate::{errors::ServerError, models::note::NoteInput, repository::NoteRepository};

pub async fn list(repo: web::Data<NoteRepository>) -> Result<HttpResponse, ServerError> {
    let notes = web::block(move || repo.list_notes()).await??;
    Ok(HttpResponse::Ok().json(notes))
}

pub async fn create(
    input: web::Json<NoteInput>,
    repo: web::Data<NoteRepository>,
) -> Result<HttpResponse, ServerError> {
    let note = web::block(move || repo.create_note(&input)).await??;
    Ok(HttpResponse::Created().json(note))
}

pub async fn update(
    note_id: web::Path<i32>,
    input: web::Json<NoteInput>,
    repo: web::Data<NoteRepository>,
) -> Result<HttpResponse, ServerError> {
    let note_id = note_id.into_inner();
    let note = web::block(move || repo.update_note(note_id, &input)).await??;
    Ok(HttpResponse::Ok().json(note))
}

pub async fn delete(
    note_id: web::Path<i32>,
    repo: web::Data<NoteRepository>,
) -> Result<HttpResponse, ServerError> {
    let note_id = note_id.into_inner();
    web::block(move || repo.delete_note(note_id)).await??;
    Ok(HttpResponse::NoContent().finish())
}
