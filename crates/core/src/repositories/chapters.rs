//! Chapter full-summary operations.
//!
//! Chapter documents are created by an external ingestion pipeline and keyed
//! by `chapter_id`. This service mutates the sentence list in place: bulk
//! replace, index-targeted substring edit, and index-targeted delete. It
//! never creates or removes whole chapter documents.

use crate::models::{from_doc, ChapterSummary};
use crate::store::{collections, Document, DocumentStore, Filter};
use crate::{CoreError, CoreResult};
use std::sync::Arc;

/// Result of an index-targeted sentence edit.
#[derive(Debug, Clone)]
pub struct SentenceEdit {
    pub old_sentence: String,
    pub new_sentence: String,
}

#[derive(Clone)]
pub struct ChapterService {
    store: Arc<DocumentStore>,
}

impl ChapterService {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    fn fetch(&self, chapter_id: &str) -> CoreResult<ChapterSummary> {
        let filter = Filter::eq("chapter_id", chapter_id);
        let Some(doc) = self.store.find_one(collections::CHAPTERS, &filter)? else {
            return Err(CoreError::NotFound(format!(
                "Chapter '{chapter_id}' not found"
            )));
        };
        from_doc(doc)
    }

    fn write_sentences(&self, chapter_id: &str, sentences: &[String]) -> CoreResult<()> {
        let mut patch = Document::new();
        patch.insert("full_summary".to_string(), serde_json::to_value(sentences)?);
        self.store
            .update_one(collections::CHAPTERS, &Filter::eq("chapter_id", chapter_id), patch)?;
        Ok(())
    }

    /// Validates `index` against the sentence list, per the contract
    /// `0 <= index < length`. Out of range is an invalid-argument outcome,
    /// distinct from not-found: the chapter exists, the index does not.
    fn checked_index(index: i64, length: usize) -> CoreResult<usize> {
        usize::try_from(index)
            .ok()
            .filter(|i| *i < length)
            .ok_or_else(|| CoreError::InvalidArgument("Invalid index number".to_string()))
    }

    pub fn list(&self) -> CoreResult<Vec<ChapterSummary>> {
        self.store
            .find_all(collections::CHAPTERS, &Filter::all())?
            .into_iter()
            .map(from_doc)
            .collect()
    }

    pub fn get(&self, chapter_id: &str) -> CoreResult<Vec<String>> {
        Ok(self.fetch(chapter_id)?.full_summary)
    }

    /// Replaces the whole sentence list. Returns the new sentence count.
    pub fn replace(&self, chapter_id: &str, sentences: Vec<String>) -> CoreResult<usize> {
        self.fetch(chapter_id)?;
        let count = sentences.len();
        self.write_sentences(chapter_id, &sentences)?;
        Ok(count)
    }

    /// Replaces every occurrence of `replace_text` within the sentence at
    /// `index`. Fails when the substring is absent rather than silently
    /// no-opping.
    pub fn edit_sentence(
        &self,
        chapter_id: &str,
        index: i64,
        replace_text: &str,
        with_text: &str,
    ) -> CoreResult<SentenceEdit> {
        let mut chapter = self.fetch(chapter_id)?;
        let index = Self::checked_index(index, chapter.full_summary.len())?;

        let old_sentence = chapter.full_summary[index].clone();
        if !old_sentence.contains(replace_text) {
            return Err(CoreError::InvalidArgument(format!(
                "'{replace_text}' not found in sentence"
            )));
        }

        let new_sentence = old_sentence.replace(replace_text, with_text);
        chapter.full_summary[index] = new_sentence.clone();
        self.write_sentences(chapter_id, &chapter.full_summary)?;

        Ok(SentenceEdit {
            old_sentence,
            new_sentence,
        })
    }

    /// Removes the sentence at `index`, returning it. Only the one element is
    /// removed; the chapter document itself always survives.
    pub fn delete_sentence(&self, chapter_id: &str, index: i64) -> CoreResult<String> {
        let mut chapter = self.fetch(chapter_id)?;
        let index = Self::checked_index(index, chapter.full_summary.len())?;

        let removed = chapter.full_summary.remove(index);
        self.write_sentences(chapter_id, &chapter.full_summary)?;
        Ok(removed)
    }
}
