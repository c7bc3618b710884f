diesel::table! {
    notes (id) {
        id -> Int4,
        title_encrypted -> Text,
        content_encrypted -> Text,
        timestamp -> Timestamp,
    }
}
