use diesel::{pg::PgConnection, prelude::*, r2d2::ConnectionManager};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use super::NoteStore;
use crate::{
    errors::{ServerError, StartupError},
    models::note::{NoteRecord, SealedNote},
    schema::notes::dsl::*,
};

pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/postgres");

pub struct PgNoteStore {
    pool: Pool,
}

impl PgNoteStore {
    pub fn connect(database_url: &str) -> Result<Self, StartupError> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = r2d2::Pool::builder().build(manager)?;
        Ok(PgNoteStore { pool })
    }

    /// Creates the `notes` table if it is missing. Safe to run on every start.
    pub fn setup(&self) -> Result<(), StartupError> {
        let mut connection = self.pool.get()?;
        let applied = connection
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StartupError::Migration(e.to_string()))?;
        for migration in applied {
            log::info!("applied migration {migration}");
        }
        Ok(())
    }
}

impl NoteStore for PgNoteStore {
    fn list_newest_first(&self) -> Result<Vec<NoteRecord>, ServerError> {
        let mut connection = self.pool.get()?;
        Ok(notes
            .order((timestamp.desc(), id.asc()))
            .load::<NoteRecord>(&mut connection)?)
    }

    fn insert(&self, note: &SealedNote) -> Result<NoteRecord, ServerError> {
        let mut connection = self.pool.get()?;
        Ok(diesel::insert_into(notes)
            .values(note)
            .get_result::<NoteRecord>(&mut connection)?)
    }

    fn update(&self, note_id: i32, note: &SealedNote) -> Result<Option<NoteRecord>, ServerError> {
        let mut connection = self.pool.get()?;
        Ok(diesel::update(notes.find(note_id))
            .set(note)
            .get_result::<NoteRecord>(&mut connection)
            .optional()?)
    }

    fn delete(&self, note_id: i32) -> Result<bool, ServerError> {
        let mut connection = self.pool.get()?;
        let deleted = diesel::delete(notes.find(note_id)).execute(&mut connection)?;
        Ok(deleted > 0)
    }

    fn count(&self) -> Result<i64, ServerError> {
        let mut connection = self.pool.get()?;
        Ok(notes.count().get_result(&mut connection)?)
    }
}
