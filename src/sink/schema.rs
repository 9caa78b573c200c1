//! Database schema definitions
//!
//! This module contains the SQL schema for the document index.

/// SQL schema for the database
///
/// `documents_fts` is an external-content FTS5 table over `documents`; the
/// triggers keep it in step with every insert, update and delete.
pub const SCHEMA_SQL: &str = r#"
-- One row per canonical URL
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    final_url TEXT NOT NULL,
    title TEXT NOT NULL DEFAULT '',
    index_text TEXT NOT NULL DEFAULT '',
    raw_text TEXT NOT NULL DEFAULT '',
    excerpt TEXT NOT NULL DEFAULT '',
    content_length INTEGER NOT NULL DEFAULT 0,
    crawled_at TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_crawled_at ON documents(crawled_at);

-- Full-text index; column order fixes the bm25() weight order
CREATE VIRTUAL TABLE IF NOT EXISTS documents_fts USING fts5(
    title,
    index_text,
    content='documents',
    content_rowid='id',
    tokenize='porter unicode61 remove_diacritics 2'
);

CREATE TRIGGER IF NOT EXISTS documents_ai AFTER INSERT ON documents BEGIN
    INSERT INTO documents_fts(rowid, title, index_text)
    VALUES (new.id, new.title, new.index_text);
END;

CREATE TRIGGER IF NOT EXISTS documents_ad AFTER DELETE ON documents BEGIN
    INSERT INTO documents_fts(documents_fts, rowid, title, index_text)
    VALUES ('delete', old.id, old.title, old.index_text);
END;

CREATE TRIGGER IF NOT EXISTS documents_au AFTER UPDATE ON documents BEGIN
    INSERT INTO documents_fts(documents_fts, rowid, title, index_text)
    VALUES ('delete', old.id, old.title, old.index_text);
    INSERT INTO documents_fts(rowid, title, index_text)
    VALUES (new.id, new.title, new.index_text);
END;
"#;

/// Weight of the title column relative to the body in ranking
pub const TITLE_WEIGHT: f64 = 5.0;

/// Weight of the normalized body column in ranking
pub const BODY_WEIGHT: f64 = 1.0;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
