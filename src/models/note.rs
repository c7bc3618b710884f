use chrono::NaiveDateTime;
use diesel::{AsChangeset, Insertable, Queryable};
use serde::Deserializer;
use serde_derive::{Deserialize, Serialize};

use crate::schema::notes;

pub const DEFAULT_TITLE: &str = "Untitled";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A row of the `notes` table, exactly as stored.
#[derive(Clone, Debug, Queryable)]
pub struct NoteRecord {
    pub id: i32,
    pub title_encrypted: String,
    pub content_encrypted: String,
    pub timestamp: NaiveDateTime,
}

/// What gets written on insert and update. Only ever built from cipher output.
#[derive(Clone, Debug, Insertable, AsChangeset)]
#[diesel(table_name = notes)]
pub struct SealedNote {
    pub title_encrypted: String,
    pub content_encrypted: String,
    pub timestamp: NaiveDateTime,
}

/// Request body for create and update.
///
/// The outer `Option` is whether the key was sent at all, the inner one is
/// JSON `null`. A missing key takes the field default, `null` is stored empty.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NoteInput {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub content: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    <Option<String> as serde::Deserialize>::deserialize(deserializer).map(Some)
}

impl NoteInput {
    pub fn title_or_default(&self) -> &str {
        match &self.title {
            None => DEFAULT_TITLE,
            Some(title) => title.as_deref().unwrap_or_default(),
        }
    }

    pub fn content_or_default(&self) -> &str {
        self.content.as_ref().and_then(Option::as_deref).unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NoteView {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub timestamp: String,
}

impl NoteView {
    pub fn new(id: i32, title: String, content: String, timestamp: NaiveDateTime) -> Self {
        NoteView {
            id,
            title,
            content,
            timestamp: timestamp.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}
