//! Document shapes for the six collections.
//!
//! All entities are independent documents; relationships between them are by
//! convention only (shared `chapter_id`/`domain_id` values), with no
//! foreign-key enforcement.

use crate::{CoreResult, store::Document};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A chapter's full summary: an ordered sequence of sentences.
///
/// Chapter documents are created by an external ingestion pipeline; this
/// service only reads and mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterSummary {
    pub chapter_id: String,
    pub full_summary: Vec<String>,
}

/// A single section's summary text within a chapter.
///
/// Deleting a section clears `section_summary` but keeps the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSummary {
    pub chapter_id: String,
    pub section_id: String,
    pub section_summary: String,
}

/// A glossary entry for a domain-specific word or multi-word expression.
///
/// The reserved `audio_binary` field is stored as null and populated by an
/// external collaborator; it is deliberately absent here so reads never
/// serialise it back out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainWord {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub chapter_id: String,
    pub domain_id: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub is_mwe: bool,
    #[serde(default)]
    pub mwe_type: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tokens_with_pos: Vec<(String, String)>,
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
    #[serde(default)]
    pub word_structure: BTreeMap<String, String>,
}

/// Taxonomy metadata. The image payload itself is handled separately through
/// the image codec because legacy documents store it in three shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub chapter_id: String,
    pub domain_id: String,
    #[serde(default)]
    pub domain_name: String,
    #[serde(default = "default_image_format")]
    pub image_format: String,
}

fn default_image_format() -> String {
    crate::image::DEFAULT_FORMAT.to_string()
}

/// A registered user. `password` holds the hex digest, never plaintext.
/// User documents are immutable after signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub domain: String,
    pub created_at: DateTime<Utc>,
}

/// A session record. Expiry is lazy: nothing sweeps expired sessions, they
/// simply fail verification once `expires_at` has passed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub username: String,
    pub session_token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Decodes a stored document into a typed model.
pub fn from_doc<T: DeserializeOwned>(doc: Document) -> CoreResult<T> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

/// Encodes a typed model as a stored document.
pub fn to_doc<T: Serialize>(value: &T) -> CoreResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(crate::CoreError::Decode(serde::de::Error::custom(format!(
            "expected a JSON object, got {other}"
        )))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_domain_word_read_tolerates_missing_optional_fields() {
        let doc = to_doc(&json!({
            "_id": "abc",
            "chapter_id": "ch1",
            "domain_id": "d1"
        }))
        .unwrap();
        let word: DomainWord = from_doc(doc).unwrap();
        assert_eq!(word.id, "abc");
        assert_eq!(word.definition, "");
        assert!(!word.is_mwe);
        assert!(word.mwe_type.is_none());
        assert!(word.tokens_with_pos.is_empty());
    }

    #[test]
    fn test_domain_word_ignores_reserved_audio_field_on_read() {
        let doc = to_doc(&json!({
            "chapter_id": "ch1",
            "domain_id": "d1",
            "audio_binary": null
        }))
        .unwrap();
        let word: DomainWord = from_doc(doc).unwrap();
        let back = to_doc(&word).unwrap();
        assert!(!back.contains_key("audio_binary"));
    }

    #[test]
    fn test_taxonomy_image_format_defaults_to_svg() {
        let doc = to_doc(&json!({"chapter_id": "ch1", "domain_id": "d1"})).unwrap();
        let entry: TaxonomyEntry = from_doc(doc).unwrap();
        assert_eq!(entry.image_format, "svg");
    }

    #[test]
    fn test_session_timestamps_round_trip() {
        let session = Session {
            user_id: "u1".to_string(),
            username: "bob".to_string(),
            session_token: "tok".to_string(),
            created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
            expires_at: "2024-01-02T00:00:00Z".parse().unwrap(),
        };
        let doc = to_doc(&session).unwrap();
        let back: Session = from_doc(doc).unwrap();
        assert_eq!(back.expires_at, session.expires_at);
    }
}
