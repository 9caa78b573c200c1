//! SQLite document sink
//!
//! This module provides the FTS5-backed implementation of `DocumentSink`.

use crate::sink::schema::{initialize_schema, BODY_WEIGHT, TITLE_WEIGHT};
use crate::sink::traits::{
    DocumentSink, IndexStats, IndexedDocument, SearchHit, SearchQuery, SinkError, SinkResult,
    StoredDocument,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite document sink
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Opens or creates the index database
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteSink)` - Successfully opened/created database
    /// * `Err(SinkError)` - Failed to open database
    pub fn new(path: &Path) -> SinkResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory index
    pub fn new_in_memory() -> SinkResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl DocumentSink for SqliteSink {
    fn upsert(&mut self, document: &IndexedDocument) -> SinkResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO documents (url, final_url, title, index_text, raw_text, excerpt,
                                    content_length, crawled_at, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
             ON CONFLICT(url) DO UPDATE SET
                final_url = excluded.final_url,
                title = excluded.title,
                index_text = excluded.index_text,
                raw_text = excluded.raw_text,
                excerpt = excluded.excerpt,
                content_length = excluded.content_length,
                crawled_at = excluded.crawled_at,
                updated_at = excluded.updated_at",
            params![
                document.url,
                document.final_url,
                document.title,
                document.index_text,
                document.raw_text,
                document.excerpt,
                document.content_length as i64,
                document.crawled_at.to_rfc3339(),
                now,
            ],
        )?;
        tracing::debug!("Upserted document {}", document.url);
        Ok(())
    }

    fn search(&self, query: &SearchQuery) -> SinkResult<Vec<SearchHit>> {
        if query.expression.trim().is_empty() || query.limit == 0 {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT d.url, d.final_url, d.title, d.excerpt,
                    bm25(documents_fts, {:.1}, {:.1}) AS rank
             FROM documents_fts
             JOIN documents d ON d.id = documents_fts.rowid
             WHERE documents_fts MATCH ?1
             ORDER BY rank, d.url
             LIMIT ?2 OFFSET ?3",
            TITLE_WEIGHT, BODY_WEIGHT
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let rows = stmt.query_map(
            params![
                query.expression,
                query.limit as i64,
                query.offset as i64,
            ],
            |row| {
                let rank: f64 = row.get(4)?;
                Ok(SearchHit {
                    url: row.get(0)?,
                    final_url: row.get(1)?,
                    title: row.get(2)?,
                    excerpt: row.get(3)?,
                    // bm25() is lower-is-better
                    score: -rank,
                })
            },
        )
        .map_err(classify_query_error)?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(classify_query_error)
    }

    fn get(&self, url: &str) -> SinkResult<Option<StoredDocument>> {
        let record = self
            .conn
            .query_row(
                "SELECT url, final_url, title, index_text, raw_text, excerpt, content_length,
                        crawled_at, created_at, updated_at
                 FROM documents WHERE url = ?1",
                params![url],
                DocumentRow::from_row,
            )
            .optional()?;

        record.map(DocumentRow::into_stored).transpose()
    }

    fn count(&self) -> SinkResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn all_raw_text(&self) -> SinkResult<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url, raw_text FROM documents ORDER BY url")?;

        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn update_index_text(&mut self, url: &str, index_text: &str) -> SinkResult<bool> {
        let changed = self.conn.execute(
            "UPDATE documents SET index_text = ?1, updated_at = ?2 WHERE url = ?3",
            params![index_text, Utc::now().to_rfc3339(), url],
        )?;
        Ok(changed > 0)
    }

    fn stats(&self) -> SinkResult<IndexStats> {
        let stats = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(content_length), 0), MIN(crawled_at), MAX(crawled_at)
             FROM documents",
            [],
            |row| {
                Ok(IndexStats {
                    documents: row.get::<_, i64>(0)? as usize,
                    total_content_length: row.get::<_, i64>(1)? as u64,
                    first_crawled_at: row.get(2)?,
                    last_crawled_at: row.get(3)?,
                })
            },
        )?;
        Ok(stats)
    }
}

/// Maps FTS5 expression errors to `SinkError::InvalidQuery`
///
/// A malformed MATCH expression surfaces as a generic `SQLITE_ERROR`; busy,
/// I/O and corruption failures carry their own codes and stay `Sqlite`.
fn classify_query_error(err: rusqlite::Error) -> SinkError {
    match &err {
        rusqlite::Error::SqliteFailure(code, Some(message))
            if code.code == rusqlite::ErrorCode::Unknown =>
        {
            SinkError::InvalidQuery(message.clone())
        }
        _ => SinkError::Sqlite(err),
    }
}

struct DocumentRow {
    url: String,
    final_url: String,
    title: String,
    index_text: String,
    raw_text: String,
    excerpt: String,
    content_length: i64,
    crawled_at: String,
    created_at: String,
    updated_at: String,
}

impl DocumentRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            url: row.get(0)?,
            final_url: row.get(1)?,
            title: row.get(2)?,
            index_text: row.get(3)?,
            raw_text: row.get(4)?,
            excerpt: row.get(5)?,
            content_length: row.get(6)?,
            crawled_at: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    fn into_stored(self) -> SinkResult<StoredDocument> {
        let crawled_at = parse_timestamp(&self.url, &self.crawled_at)?;
        let created_at = parse_timestamp(&self.url, &self.created_at)?;
        let updated_at = parse_timestamp(&self.url, &self.updated_at)?;

        Ok(StoredDocument {
            document: IndexedDocument {
                url: self.url,
                final_url: self.final_url,
                title: self.title,
                index_text: self.index_text,
                raw_text: self.raw_text,
                excerpt: self.excerpt,
                content_length: self.content_length.max(0) as u64,
                crawled_at,
            },
            created_at,
            updated_at,
        })
    }
}

fn parse_timestamp(url: &str, value: &str) -> SinkResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SinkError::Corrupt {
            url: url.to_string(),
            message: format!("bad timestamp {:?}: {}", value, e),
        })
}
