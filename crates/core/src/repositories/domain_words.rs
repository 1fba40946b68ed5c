//! Domain-word glossary operations.
//!
//! Entries are keyed by the (`chapter_id`, `domain_id`) pair and hard-deleted
//! on removal. Every document carries a reserved `audio_binary` field that is
//! stored as null here and populated by an external collaborator; reads never
//! return it.

use crate::models::{from_doc, to_doc, DomainWord};
use crate::store::{collections, Document, DocumentStore, Filter};
use crate::{CoreError, CoreResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Fields accepted when creating a glossary entry.
#[derive(Debug, Clone, Default)]
pub struct NewDomainWord {
    pub definition: String,
    pub translations: BTreeMap<String, String>,
    pub word_structure: BTreeMap<String, String>,
    pub is_mwe: bool,
    pub mwe_type: Option<String>,
    pub name: String,
    pub tokens_with_pos: Vec<(String, String)>,
}

#[derive(Clone)]
pub struct DomainWordService {
    store: Arc<DocumentStore>,
}

impl DomainWordService {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    fn key(chapter_id: &str, domain_id: &str) -> Filter {
        Filter::eq("chapter_id", chapter_id).and("domain_id", domain_id)
    }

    fn not_found(chapter_id: &str, domain_id: &str) -> CoreError {
        CoreError::NotFound(format!(
            "Domain word '{domain_id}' not found for chapter '{chapter_id}'"
        ))
    }

    pub fn list(&self) -> CoreResult<Vec<DomainWord>> {
        self.store
            .find_all(collections::DOMAIN_WORDS, &Filter::all())?
            .into_iter()
            .map(from_doc)
            .collect()
    }

    pub fn get(&self, chapter_id: &str, domain_id: &str) -> CoreResult<DomainWord> {
        let filter = Self::key(chapter_id, domain_id);
        let Some(doc) = self.store.find_one(collections::DOMAIN_WORDS, &filter)? else {
            return Err(Self::not_found(chapter_id, domain_id));
        };
        from_doc(doc)
    }

    /// Creates a new entry. Check-then-act: the pre-check and insert are not
    /// atomic, and the conflict is reported regardless of payload equality.
    pub fn create(
        &self,
        chapter_id: &str,
        domain_id: &str,
        fields: NewDomainWord,
    ) -> CoreResult<()> {
        let filter = Self::key(chapter_id, domain_id);
        if self
            .store
            .find_one(collections::DOMAIN_WORDS, &filter)?
            .is_some()
        {
            return Err(CoreError::Conflict(format!(
                "Domain word '{domain_id}' already exists for chapter '{chapter_id}'"
            )));
        }

        let word = DomainWord {
            id: String::new(),
            chapter_id: chapter_id.to_string(),
            domain_id: domain_id.to_string(),
            definition: fields.definition,
            is_mwe: fields.is_mwe,
            mwe_type: fields.mwe_type,
            name: fields.name,
            tokens_with_pos: fields.tokens_with_pos,
            translations: fields.translations,
            word_structure: fields.word_structure,
        };
        let mut doc = to_doc(&word)?;
        // Reserved for the audio pipeline; always null in this service.
        doc.insert("audio_binary".to_string(), Value::Null);
        self.store.insert_one(collections::DOMAIN_WORDS, doc)?;
        Ok(())
    }

    /// Updates the editable fields only; identity, MWE metadata, and the
    /// reserved audio field are untouched.
    pub fn update(
        &self,
        chapter_id: &str,
        domain_id: &str,
        definition: &str,
        translations: BTreeMap<String, String>,
        word_structure: BTreeMap<String, String>,
    ) -> CoreResult<()> {
        self.get(chapter_id, domain_id)?;

        let mut patch = Document::new();
        patch.insert("definition".to_string(), definition.into());
        patch.insert("translations".to_string(), serde_json::to_value(translations)?);
        patch.insert(
            "word_structure".to_string(),
            serde_json::to_value(word_structure)?,
        );
        self.store.update_one(
            collections::DOMAIN_WORDS,
            &Self::key(chapter_id, domain_id),
            patch,
        )?;
        Ok(())
    }

    /// Hard delete: removes the whole document.
    pub fn delete(&self, chapter_id: &str, domain_id: &str) -> CoreResult<()> {
        let deleted = self
            .store
            .delete_one(collections::DOMAIN_WORDS, &Self::key(chapter_id, domain_id))?;
        if deleted == 0 {
            return Err(Self::not_found(chapter_id, domain_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> DomainWordService {
        DomainWordService::new(Arc::new(DocumentStore::open_in_memory().unwrap()))
    }

    fn osmosis() -> NewDomainWord {
        NewDomainWord {
            definition: "Movement of water across a membrane".to_string(),
            translations: BTreeMap::from([("af".to_string(), "osmose".to_string())]),
            word_structure: BTreeMap::from([("root".to_string(), "osmos".to_string())]),
            is_mwe: false,
            mwe_type: None,
            name: "osmosis".to_string(),
            tokens_with_pos: vec![("osmosis".to_string(), "NOUN".to_string())],
        }
    }

    #[test]
    fn test_create_then_get() {
        let words = service();
        words.create("ch1", "d1", osmosis()).unwrap();

        let word = words.get("ch1", "d1").unwrap();
        assert_eq!(word.name, "osmosis");
        assert_eq!(word.translations.get("af").map(String::as_str), Some("osmose"));
        assert!(!word.id.is_empty(), "store assigns an id");
    }

    #[test]
    fn test_create_existing_pair_conflicts_regardless_of_payload() {
        let words = service();
        words.create("ch1", "d1", osmosis()).unwrap();

        let same = words.create("ch1", "d1", osmosis()).expect_err("duplicate");
        assert!(matches!(same, CoreError::Conflict(_)));

        let different = words
            .create("ch1", "d1", NewDomainWord::default())
            .expect_err("duplicate");
        assert!(matches!(different, CoreError::Conflict(_)));
    }

    #[test]
    fn test_update_touches_only_editable_fields() {
        let words = service();
        words.create("ch1", "d1", osmosis()).unwrap();

        words
            .update(
                "ch1",
                "d1",
                "Updated definition",
                BTreeMap::new(),
                BTreeMap::new(),
            )
            .unwrap();

        let word = words.get("ch1", "d1").unwrap();
        assert_eq!(word.definition, "Updated definition");
        assert!(word.translations.is_empty());
        assert_eq!(word.name, "osmosis", "name is not editable");
        assert_eq!(word.tokens_with_pos.len(), 1);
    }

    #[test]
    fn test_delete_is_a_hard_delete() {
        let words = service();
        words.create("ch1", "d1", osmosis()).unwrap();
        words.delete("ch1", "d1").unwrap();

        assert!(matches!(
            words.get("ch1", "d1").expect_err("gone"),
            CoreError::NotFound(_)
        ));
        // The pair can be created again once removed.
        words.create("ch1", "d1", osmosis()).unwrap();
    }

    #[test]
    fn test_delete_missing_entry_is_not_found() {
        let words = service();
        let err = words.delete("ch1", "d1").expect_err("missing");
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn test_update_missing_entry_is_not_found() {
        let words = service();
        let err = words
            .update("ch1", "d1", "x", BTreeMap::new(), BTreeMap::new())
            .expect_err("missing");
        assert!(matches!(err, CoreError::NotFound(_)));
    }
}
