//! SQLite-backed document store.
//!
//! The store keeps one JSON document per row, one table per collection. The
//! query surface is deliberately narrow: exact-match filters combined with
//! logical OR, and single-document insert/update/delete. There is no
//! transaction support and no uniqueness constraint at the storage layer;
//! callers that pre-check existence before inserting are racing concurrent
//! writers (documented, not fixed).

use rusqlite::Connection;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Collection names persisted by this store.
pub mod collections {
    pub const CHAPTERS: &str = "chapters";
    pub const SECTION_SUMMARIES: &str = "section_summaries";
    pub const DOMAIN_WORDS: &str = "domain_words";
    pub const TAXONOMY: &str = "taxonomy";
    pub const USERS: &str = "users";
    pub const SESSIONS: &str = "sessions";

    pub(super) const ALL: [&str; 6] = [
        CHAPTERS,
        SECTION_SUMMARIES,
        DOMAIN_WORDS,
        TAXONOMY,
        USERS,
        SESSIONS,
    ];
}

/// A stored document: a JSON object keyed by field name.
pub type Document = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to open document store: {0}")]
    Open(rusqlite::Error),
    #[error("store query failed: {0}")]
    Query(rusqlite::Error),
    #[error("failed to encode document: {0}")]
    Encode(serde_json::Error),
}

/// Exact-match filter: a disjunction of conjunction groups.
///
/// `Filter::eq("a", 1).and("b", 2)` matches documents where both fields
/// equal the given values; `Filter::any([f1, f2])` matches documents
/// satisfying either filter. An empty filter matches every document.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    groups: Vec<Vec<(String, Value)>>,
}

impl Filter {
    /// Matches every document in the collection.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches documents whose `field` equals `value` exactly.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            groups: vec![vec![(field.into(), value.into())]],
        }
    }

    /// Adds a further equality requirement to every group.
    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let clause = (field.into(), value.into());
        if self.groups.is_empty() {
            self.groups.push(vec![clause]);
        } else {
            for group in &mut self.groups {
                group.push(clause.clone());
            }
        }
        self
    }

    /// Combines filters with logical OR.
    pub fn any(filters: impl IntoIterator<Item = Filter>) -> Self {
        let mut groups = Vec::new();
        for filter in filters {
            groups.extend(filter.groups);
        }
        Self { groups }
    }

    fn matches(&self, doc: &Document) -> bool {
        if self.groups.is_empty() {
            return true;
        }
        self.groups.iter().any(|group| {
            group
                .iter()
                .all(|(field, value)| doc.get(field) == Some(value))
        })
    }
}

/// Handle to the document database.
///
/// Constructed once at startup and passed into services explicitly; there is
/// no ambient connection singleton. The handle is cheap to share behind an
/// `Arc` and serialises access through an internal mutex.
pub struct DocumentStore {
    conn: Mutex<Connection>,
}

impl DocumentStore {
    /// Opens (creating if necessary) the database at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(StoreError::Open)?;
        Self::init(conn)
    }

    /// Opens a private in-memory database. Intended for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::Open)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        for collection in collections::ALL {
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {collection} (id INTEGER PRIMARY KEY, doc TEXT NOT NULL)"
            ))
            .map_err(StoreError::Open)?;
        }
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn scan(
        conn: &Connection,
        collection: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<(i64, Document)>, StoreError> {
        let mut stmt = conn
            .prepare(&format!("SELECT id, doc FROM {collection} ORDER BY id"))
            .map_err(StoreError::Query)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(StoreError::Query)?;

        let mut found = Vec::new();
        for row in rows {
            let (id, raw) = row.map_err(StoreError::Query)?;
            // A row that fails to decode is skipped, not fatal: one corrupt
            // document must not take down every list endpoint.
            let doc = match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(doc)) => doc,
                Ok(_) => {
                    tracing::warn!("skipping non-object document {id} in '{collection}'");
                    continue;
                }
                Err(e) => {
                    tracing::warn!("skipping corrupt document {id} in '{collection}': {e}");
                    continue;
                }
            };
            if filter.matches(&doc) {
                found.push((id, doc));
                if limit.is_some_and(|n| found.len() >= n) {
                    break;
                }
            }
        }
        Ok(found)
    }

    /// Returns the first document matching `filter`, if any.
    pub fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let conn = self.lock();
        let mut found = Self::scan(&conn, collection, filter, Some(1))?;
        Ok(found.pop().map(|(_, doc)| doc))
    }

    /// Returns every document matching `filter`, in insertion order.
    pub fn find_all(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let conn = self.lock();
        let found = Self::scan(&conn, collection, filter, None)?;
        Ok(found.into_iter().map(|(_, doc)| doc).collect())
    }

    /// Inserts `doc`, assigning and returning a fresh `_id`.
    pub fn insert_one(&self, collection: &str, mut doc: Document) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        doc.insert("_id".to_string(), Value::String(id.clone()));
        let raw = serde_json::to_string(&Value::Object(doc)).map_err(StoreError::Encode)?;

        let conn = self.lock();
        conn.execute(
            &format!("INSERT INTO {collection} (doc) VALUES (?1)"),
            rusqlite::params![raw],
        )
        .map_err(StoreError::Query)?;
        Ok(id)
    }

    /// Shallow-merges `patch` into the first document matching `filter`.
    ///
    /// Returns the number of documents updated (0 or 1). The read-modify-write
    /// has no optimistic concurrency control: concurrent updates to the same
    /// document are last-write-wins.
    pub fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        patch: Document,
    ) -> Result<u64, StoreError> {
        let conn = self.lock();
        let mut found = Self::scan(&conn, collection, filter, Some(1))?;
        let Some((id, mut doc)) = found.pop() else {
            return Ok(0);
        };
        for (field, value) in patch {
            doc.insert(field, value);
        }
        let raw = serde_json::to_string(&Value::Object(doc)).map_err(StoreError::Encode)?;
        conn.execute(
            &format!("UPDATE {collection} SET doc = ?1 WHERE id = ?2"),
            rusqlite::params![raw, id],
        )
        .map_err(StoreError::Query)?;
        Ok(1)
    }

    /// Deletes the first document matching `filter`.
    ///
    /// Returns the number of documents deleted (0 or 1).
    pub fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let conn = self.lock();
        let mut found = Self::scan(&conn, collection, filter, Some(1))?;
        let Some((id, _)) = found.pop() else {
            return Ok(0);
        };
        conn.execute(
            &format!("DELETE FROM {collection} WHERE id = ?1"),
            rusqlite::params![id],
        )
        .map_err(StoreError::Query)?;
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_insert_assigns_id_and_find_one_matches() {
        let store = DocumentStore::open_in_memory().unwrap();
        let id = store
            .insert_one(
                collections::CHAPTERS,
                doc(json!({"chapter_id": "ch1", "full_summary": ["a", "b"]})),
            )
            .unwrap();
        assert_eq!(id.len(), 32, "simple uuid format");

        let found = store
            .find_one(collections::CHAPTERS, &Filter::eq("chapter_id", "ch1"))
            .unwrap()
            .expect("document should be found");
        assert_eq!(found.get("_id"), Some(&Value::String(id)));
        assert_eq!(found.get("full_summary"), Some(&json!(["a", "b"])));
    }

    #[test]
    fn test_find_one_returns_none_for_no_match() {
        let store = DocumentStore::open_in_memory().unwrap();
        let found = store
            .find_one(collections::CHAPTERS, &Filter::eq("chapter_id", "nope"))
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_composite_filter_requires_every_field() {
        let store = DocumentStore::open_in_memory().unwrap();
        store
            .insert_one(
                collections::SECTION_SUMMARIES,
                doc(json!({"chapter_id": "ch1", "section_id": "s1", "section_summary": "x"})),
            )
            .unwrap();

        let hit = store
            .find_one(
                collections::SECTION_SUMMARIES,
                &Filter::eq("chapter_id", "ch1").and("section_id", "s1"),
            )
            .unwrap();
        assert!(hit.is_some());

        let miss = store
            .find_one(
                collections::SECTION_SUMMARIES,
                &Filter::eq("chapter_id", "ch1").and("section_id", "s2"),
            )
            .unwrap();
        assert!(miss.is_none());
    }

    #[test]
    fn test_or_filter_matches_either_branch() {
        let store = DocumentStore::open_in_memory().unwrap();
        store
            .insert_one(
                collections::USERS,
                doc(json!({"username": "bob", "email": "bob@x.com"})),
            )
            .unwrap();

        let by_name = Filter::any([
            Filter::eq("username", "bob"),
            Filter::eq("email", "other@x.com"),
        ]);
        assert!(store.find_one(collections::USERS, &by_name).unwrap().is_some());

        let by_email = Filter::any([
            Filter::eq("username", "alice"),
            Filter::eq("email", "bob@x.com"),
        ]);
        assert!(store.find_one(collections::USERS, &by_email).unwrap().is_some());

        let neither = Filter::any([
            Filter::eq("username", "alice"),
            Filter::eq("email", "alice@x.com"),
        ]);
        assert!(store.find_one(collections::USERS, &neither).unwrap().is_none());
    }

    #[test]
    fn test_update_one_merges_patch_and_reports_matched_count() {
        let store = DocumentStore::open_in_memory().unwrap();
        store
            .insert_one(
                collections::CHAPTERS,
                doc(json!({"chapter_id": "ch1", "full_summary": ["a"]})),
            )
            .unwrap();

        let updated = store
            .update_one(
                collections::CHAPTERS,
                &Filter::eq("chapter_id", "ch1"),
                doc(json!({"full_summary": ["a", "b"]})),
            )
            .unwrap();
        assert_eq!(updated, 1);

        let found = store
            .find_one(collections::CHAPTERS, &Filter::eq("chapter_id", "ch1"))
            .unwrap()
            .unwrap();
        assert_eq!(found.get("full_summary"), Some(&json!(["a", "b"])));
        assert_eq!(found.get("chapter_id"), Some(&json!("ch1")), "untouched fields survive");

        let missed = store
            .update_one(
                collections::CHAPTERS,
                &Filter::eq("chapter_id", "ch2"),
                doc(json!({"full_summary": []})),
            )
            .unwrap();
        assert_eq!(missed, 0);
    }

    #[test]
    fn test_delete_one_removes_a_single_document() {
        let store = DocumentStore::open_in_memory().unwrap();
        store
            .insert_one(collections::SESSIONS, doc(json!({"session_token": "t1"})))
            .unwrap();
        store
            .insert_one(collections::SESSIONS, doc(json!({"session_token": "t2"})))
            .unwrap();

        assert_eq!(
            store
                .delete_one(collections::SESSIONS, &Filter::eq("session_token", "t1"))
                .unwrap(),
            1
        );
        assert_eq!(
            store
                .delete_one(collections::SESSIONS, &Filter::eq("session_token", "t1"))
                .unwrap(),
            0,
            "deleting an absent document is not an error"
        );
        assert_eq!(
            store
                .find_all(collections::SESSIONS, &Filter::all())
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_scan_skips_undecodable_rows() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("store.db");

        {
            let store = DocumentStore::open(&path).unwrap();
            store
                .insert_one(collections::CHAPTERS, doc(json!({"chapter_id": "ch1"})))
                .unwrap();
        }
        // Corrupt a row behind the store's back.
        let conn = Connection::open(&path).unwrap();
        conn.execute(
            "INSERT INTO chapters (doc) VALUES ('not json')",
            [],
        )
        .unwrap();
        drop(conn);

        let store = DocumentStore::open(&path).unwrap();
        let all = store.find_all(collections::CHAPTERS, &Filter::all()).unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_open_persists_to_disk() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("store.db");

        {
            let store = DocumentStore::open(&path).unwrap();
            store
                .insert_one(collections::CHAPTERS, doc(json!({"chapter_id": "ch1"})))
                .unwrap();
        }

        let reopened = DocumentStore::open(&path).unwrap();
        let found = reopened
            .find_one(collections::CHAPTERS, &Filter::eq("chapter_id", "ch1"))
            .unwrap();
        assert!(found.is_some());
    }
}
