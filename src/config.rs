use std::{env, path::PathBuf, str::FromStr};

use crate::errors::StartupError;

const LEGACY_PG_SCHEME: &str = "postgres://";
const PG_SCHEME: &str = "postgresql://";
const SQLITE_SCHEME: &str = "sqlite://";
const DEFAULT_SQLITE_FILE: &str = "notes.db";

/// Where notes are kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Database {
    /// A `postgresql://` connection URL.
    Postgres(String),
    /// A local file, used when `DATABASE_URL` is unset.
    Sqlite(PathBuf),
}

impl Database {
    /// Picks the backend from `DATABASE_URL`. `sqlite://notes.db` is relative to
    /// the working directory, `sqlite:///var/notes.db` is absolute.
    pub fn from_url(url: Option<&str>) -> Result<Self, StartupError> {
        let url = match url.map(str::trim) {
            None | Some("") => return Ok(Database::Sqlite(PathBuf::from(DEFAULT_SQLITE_FILE))),
            Some(url) => url,
        };
        if url.starts_with(LEGACY_PG_SCHEME) || url.starts_with(PG_SCHEME) {
            return Ok(Database::Postgres(normalize_database_url(url)));
        }
        match url.strip_prefix(SQLITE_SCHEME) {
            Some(path) if !path.is_empty() => Ok(Database::Sqlite(PathBuf::from(path))),
            _ => Err(StartupError::Config(format!(
                "DATABASE_URL must start with {PG_SCHEME}, {LEGACY_PG_SCHEME} or {SQLITE_SCHEME}"
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database: Database,
    pub host: String,
    pub port: u16,
    pub key_file: PathBuf,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Config {
    /// Reads the process environment. Call `dotenv` first to pick up `.env`.
    pub fn from_env() -> Result<Self, StartupError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StartupError> {
        Ok(Config {
            database: Database::from_url(lookup("DATABASE_URL").as_deref())?,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: parse_or(&lookup, "PORT", 5001)?,
            key_file: lookup("KEY_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("secret.key")),
            rate_limit_per_second: parse_or(&lookup, "RATE_LIMIT_PER_SECOND", 2)?,
            rate_limit_burst: parse_or(&lookup, "RATE_LIMIT_BURST", 30)?,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, StartupError> {
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            StartupError::Config(format!("{name} must be a positive integer, got {raw:?}"))
        }),
        None => Ok(default),
    }
}

/// Rewrites a leading `postgres://` to `postgresql://`.
pub fn normalize_database_url(url: &str) -> String {
    match url.strip_prefix(LEGACY_PG_SCHEME) {
        Some(rest) => format!("{PG_SCHEME}{rest}"),
        None => url.to_owned(),
    }
}
