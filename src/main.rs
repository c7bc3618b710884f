use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{middleware::Logger, web, App, HttpServer};

mod config;
mod crypto;
mod errors;
mod handlers;
mod models;
mod repository;
mod schema;

use config::{Config, Database};
use crypto::{load_or_create_key, Cipher};
use errors::StartupError;
use repository::{NoteRepository, PgNoteStore, SqliteNoteStore};

#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env()?;

    // the server must never run with a key it could not persist
    let key = load_or_create_key(&config.key_file)?;
    let cipher = Cipher::new(key);

    let repo = match &config.database {
        Database::Postgres(url) => {
            let store = PgNoteStore::connect(url)?;
            store.setup()?;
            NoteRepository::new(store, cipher)
        }
        Database::Sqlite(path) => {
            log::info!("storing notes in sqlite file {}", path.display());
            let store = SqliteNoteStore::open(path)?;
            store.setup()?;
            NoteRepository::new(store, cipher)
        }
    };
    let repo = web::Data::new(repo);

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(config.rate_limit_per_second)
        .burst_size(config.rate_limit_burst)
        .finish()
        .ok_or_else(|| StartupError::Config("rate limit values must be non-zero".to_owned()))?;

    log::info!("listening on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(repo.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Governor::new(&governor_conf))
            .wrap(Logger::default())
            .configure(handlers::config)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
