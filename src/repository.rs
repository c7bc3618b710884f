//! Plaintext-in, plaintext-out access to notes.
//!
//! [`NoteRepository`] is the only place that turns a [`NoteInput`] into a
//! [`SealedNote`] and a [`NoteRecord`] back into a [`NoteView`]. Storage backends
//! behind [`NoteStore`] only ever see ciphertext.

use chrono::Utc;

use crate::{
    crypto::{Cipher, DECRYPTION_FAILED},
    errors::ServerError,
    models::note::{NoteInput, NoteRecord, NoteView, SealedNote},
};

#[cfg(test)]
pub mod memory;
pub mod pg;
pub mod sqlite;

pub use pg::PgNoteStore;
pub use sqlite::SqliteNoteStore;

pub trait NoteStore: Send + Sync {
    /// Every record, newest timestamp first, ties in insertion order.
    fn list_newest_first(&self) -> Result<Vec<NoteRecord>, ServerError>;
    fn insert(&self, note: &SealedNote) -> Result<NoteRecord, ServerError>;
    /// `None` when no record has `note_id`.
    fn update(&self, note_id: i32, note: &SealedNote) -> Result<Option<NoteRecord>, ServerError>;
    /// `false` when no record has `note_id`.
    fn delete(&self, note_id: i32) -> Result<bool, ServerError>;
    fn count(&self) -> Result<i64, ServerError>;
}

pub struct NoteRepository {
    store: Box<dyn NoteStore>,
    cipher: Cipher,
}

impl NoteRepository {
    pub fn new(store: impl NoteStore + 'static, cipher: Cipher) -> Self {
        NoteRepository {
            store: Box::new(store),
            cipher,
        }
    }

    pub fn list_notes(&self) -> Result<Vec<NoteView>, ServerError> {
        Ok(self
            .store
            .list_newest_first()?
            .into_iter()
            .map(|record| self.open(record))
            .collect())
    }

    pub fn create_note(&self, input: &NoteInput) -> Result<NoteView, ServerError> {
        let sealed = self.seal(input)?;
        let record = self.store.insert(&sealed)?;
        Ok(self.open(record))
    }

    /// Rewrites both fields. An omitted field is reset to its default rather
    /// than keeping the stored value.
    pub fn update_note(&self, note_id: i32, input: &NoteInput) -> Result<NoteView, ServerError> {
        let sealed = self.seal(input)?;
        match self.store.update(note_id, &sealed)? {
            Some(record) => Ok(self.open(record)),
            None => Err(ServerError::NotFound(note_id)),
        }
    }

    pub fn delete_note(&self, note_id: i32) -> Result<(), ServerError> {
        if self.store.delete(note_id)? {
            Ok(())
        } else {
            Err(ServerError::NotFound(note_id))
        }
    }

    pub fn count_notes(&self) -> Result<i64, ServerError> {
        self.store.count()
    }

    fn seal(&self, input: &NoteInput) -> Result<SealedNote, ServerError> {
        Ok(SealedNote {
            title_encrypted: self.cipher.encrypt(input.title_or_default())?,
            content_encrypted: self.cipher.encrypt(input.content_or_default())?,
            timestamp: Utc::now().naive_utc(),
        })
    }

    fn open(&self, record: NoteRecord) -> NoteView {
        let title = self.open_field(record.id, "title", &record.title_encrypted);
        let content = self.open_field(record.id, "content", &record.content_encrypted);
        NoteView::new(record.id, title, content, record.timestamp)
    }

    fn open_field(&self, note_id: i32, field: &str, ciphertext: &str) -> String {
        match self.cipher.decrypt(ciphertext) {
            Ok(plain) => plain,
            Err(err) => {
                log::warn!("note {note_id}: could not decrypt {field}: {err}");
                DECRYPTION_FAILED.to_owned()
            }
        }
    }
}
