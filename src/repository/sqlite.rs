use std::path::Path;

use diesel::{
    connection::SimpleConnection,
    prelude::*,
    r2d2::{ConnectionManager, CustomizeConnection},
    sqlite::SqliteConnection,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use super::NoteStore;
use crate::{
    errors::{ServerError, StartupError},
    models::note::{NoteRecord, SealedNote},
    schema::notes::dsl::*,
};

pub type Pool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/sqlite");

/// Lets a pooled connection wait on another one's write instead of failing
/// with `SQLITE_BUSY`.
#[derive(Debug)]
struct BusyTimeout;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for BusyTimeout {
    fn on_acquire(&self, connection: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        connection
            .batch_execute("PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Local database file, used when no `DATABASE_URL` is configured.
pub struct SqliteNoteStore {
    pool: Pool,
}

impl SqliteNoteStore {
    pub fn open(path: &Path) -> Result<Self, StartupError> {
        let manager = ConnectionManager::<SqliteConnection>::new(path.to_string_lossy());
        let pool = r2d2::Pool::builder()
            .connection_customizer(Box::new(BusyTimeout))
            .build(manager)?;
        Ok(SqliteNoteStore { pool })
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

impl NoteStore for SqliteNoteStore {
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
