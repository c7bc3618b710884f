use std::sync::{Arc, Mutex, MutexGuard};

use super::NoteStore;
use crate::{
    errors::ServerError,
    models::note::{NoteRecord, SealedNote},
};

#[derive(Default)]
struct Table {
    rows: Vec<NoteRecord>,
    last_id: i32,
}

/// Stand-in for the `notes` table, rows kept in insertion order.
#[derive(Default)]
pub struct MemoryNoteStore {
    table: Mutex<Table>,
}

impl MemoryNoteStore {
    fn table(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap()
    }

    pub fn get(&self, note_id: i32) -> Option<NoteRecord> {
        self.table().rows.iter().find(|r| r.id == note_id).cloned()
    }

    pub fn overwrite_content(&self, note_id: i32, ciphertext: &str) {
        let mut table = self.table();
        if let Some(row) = table.rows.iter_mut().find(|r| r.id == note_id) {
            row.content_encrypted = ciphertext.to_owned();
        }
    }
}

impl NoteStore for MemoryNoteStore {
    fn list_newest_first(&self) -> Result<Vec<NoteRecord>, ServerError> {
        let mut rows = self.table().rows.clone();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(rows)
    }

    fn insert(&self, note: &SealedNote) -> Result<NoteRecord, ServerError> {
        let mut table = self.table();
        table.last_id += 1;
        let record = NoteRecord {
            id: table.last_id,
            title_encrypted: note.title_encrypted.clone(),
            content_encrypted: note.content_encrypted.clone(),
            timestamp: note.timestamp,
        };
        table.rows.push(record.clone());
        Ok(record)
    }

    fn update(&self, note_id: i32, note: &SealedNote) -> Result<Option<NoteRecord>, ServerError> {
        let mut table = self.table();
        Ok(table
            .rows
            .iter_mut()
            .find(|r| r.id == note_id)
            .map(|row| {
                row.title_encrypted = note.title_encrypted.clone();
                row.content_encrypted = note.content_encrypted.clone();
                row.timestamp = note.timestamp;
                row.clone()
            }))
    }

    fn delete(&self, note_id: i32) -> Result<bool, ServerError> {
        let mut table = self.table();
        let before = table.rows.len();
        table.rows.retain(|r| r.id != note_id);
        Ok(table.rows.len() != before)
    }

    fn count(&self) -> Result<i64, ServerError> {
        Ok(self.table().rows.len() as i64)
    }
}

impl NoteStore for Arc<MemoryNoteStore> {
    fn list_newest_first(&self) -> Result<Vec<NoteRecord>, ServerError> {
        self.as_ref().list_newest_first()
    }

    fn insert(&self, note: &SealedNote) -> Result<NoteRecord, ServerError> {
        self.as_ref().insert(note)
    }

    fn update(&self, note_id: i32, note: &SealedNote) -> Result<Option<NoteRecord>, ServerError> {
        self.as_ref().update(note_id, note)
    }

    fn delete(&self, note_id: i32) -> Result<bool, ServerError> {
        self.as_ref().delete(note_id)
    }

    fn count(&self) -> Result<i64, ServerError> {
        self.as_ref().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sealed(title: &str, second: u32) -> SealedNote {
        SealedNote {
            title_encrypted: title.to_owned(),
            content_encrypted: String::new(),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, second)
                .unwrap(),
        }
    }

    #[test]
    fn ties_keep_insertion_order() {
        let store = MemoryNoteStore::default();
        store.insert(&sealed("first", 1)).unwrap();
        store.insert(&sealed("second", 1)).unwrap();
        store.insert(&sealed("newest", 2)).unwrap();

        let titles: Vec<String> = store
            .list_newest_first()
            .unwrap()
            .into_iter()
            .map(|r| r.title_encrypted)
            .collect();
        assert_eq!(titles, vec!["newest", "first", "second"]);
    }

    #[test]
    fn ids_are_not_reused() {
        let store = MemoryNoteStore::default();
        let first = store.insert(&sealed("a", 1)).unwrap();
        assert!(store.delete(first.id).unwrap());
        let second = store.insert(&sealed("b", 1)).unwrap();
        assert!(second.id > first.id);
        assert!(!store.delete(first.id).unwrap());
    }
}
