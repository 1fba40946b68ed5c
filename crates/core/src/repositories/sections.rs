//! Section summary operations.
//!
//! Sections are keyed by the (`chapter_id`, `section_id`) pair. Unlike the
//! other resources, deleting a section is a soft delete: the summary text is
//! cleared but the document is retained, so the section can be re-filled
//! without re-creating it.

use crate::models::{from_doc, to_doc, SectionSummary};
use crate::store::{collections, Document, DocumentStore, Filter};
use crate::{CoreError, CoreResult};
use std::sync::Arc;

#[derive(Clone)]
pub struct SectionService {
    store: Arc<DocumentStore>,
}

impl SectionService {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    fn key(chapter_id: &str, section_id: &str) -> Filter {
        Filter::eq("chapter_id", chapter_id).and("section_id", section_id)
    }

    fn fetch(&self, chapter_id: &str, section_id: &str) -> CoreResult<SectionSummary> {
        let filter = Self::key(chapter_id, section_id);
        let Some(doc) = self
            .store
            .find_one(collections::SECTION_SUMMARIES, &filter)?
        else {
            return Err(CoreError::NotFound(format!(
                "Section '{section_id}' not found for chapter '{chapter_id}'"
            )));
        };
        from_doc(doc)
    }

    fn write_text(&self, chapter_id: &str, section_id: &str, text: &str) -> CoreResult<()> {
        let mut patch = Document::new();
        patch.insert("section_summary".to_string(), text.into());
        self.store.update_one(
            collections::SECTION_SUMMARIES,
            &Self::key(chapter_id, section_id),
            patch,
        )?;
        Ok(())
    }

    pub fn list(&self) -> CoreResult<Vec<SectionSummary>> {
        self.store
            .find_all(collections::SECTION_SUMMARIES, &Filter::all())?
            .into_iter()
            .map(from_doc)
            .collect()
    }

    pub fn get(&self, chapter_id: &str, section_id: &str) -> CoreResult<String> {
        Ok(self.fetch(chapter_id, section_id)?.section_summary)
    }

    /// Creates a new section document. The existence pre-check and the insert
    /// are not atomic (check-then-act); the conflict is reported regardless
    /// of whether the payload matches the existing record.
    pub fn create(&self, chapter_id: &str, section_id: &str, text: &str) -> CoreResult<()> {
        let filter = Self::key(chapter_id, section_id);
        if self
            .store
            .find_one(collections::SECTION_SUMMARIES, &filter)?
            .is_some()
        {
            return Err(CoreError::Conflict(format!(
                "Section '{section_id}' already exists for chapter '{chapter_id}'"
            )));
        }

        let section = SectionSummary {
            chapter_id: chapter_id.to_string(),
            section_id: section_id.to_string(),
            section_summary: text.to_string(),
        };
        self.store
            .insert_one(collections::SECTION_SUMMARIES, to_doc(&section)?)?;
        Ok(())
    }

    pub fn replace(&self, chapter_id: &str, section_id: &str, text: &str) -> CoreResult<()> {
        self.fetch(chapter_id, section_id)?;
        self.write_text(chapter_id, section_id, text)
    }

    /// Replaces every occurrence of `replace_text` in the summary text.
    /// Returns the updated text.
    pub fn edit(
        &self,
        chapter_id: &str,
        section_id: &str,
        replace_text: &str,
        with_text: &str,
    ) -> CoreResult<String> {
        let section = self.fetch(chapter_id, section_id)?;
        if !section.section_summary.contains(replace_text) {
            return Err(CoreError::InvalidArgument(format!(
                "'{replace_text}' not found in section summary"
            )));
        }

        let updated = section.section_summary.replace(replace_text, with_text);
        self.write_text(chapter_id, section_id, &updated)?;
        Ok(updated)
    }

    /// Soft delete: clears the summary text, retaining the document.
    pub fn clear(&self, chapter_id: &str, section_id: &str) -> CoreResult<()> {
        self.fetch(chapter_id, section_id)?;
        self.write_text(chapter_id, section_id, "")
    }
}
