//! Taxonomy diagram operations.
//!
//! Entries are keyed by the (`chapter_id`, `domain_id`) pair; the image
//! payload is additionally addressable by the store-assigned document id so
//! browsers can fetch it as a plain resource. Writes always store the
//! canonical image representation; reads go through the codec's multi-shape
//! decoder for legacy documents.

use crate::image;
use crate::models::{from_doc, TaxonomyEntry};
use crate::store::{collections, Document, DocumentStore, Filter};
use crate::{CoreError, CoreResult};
use serde_json::Value;
use std::sync::Arc;

/// A taxonomy entry together with its decoded image, when one is stored.
#[derive(Debug, Clone)]
pub struct TaxonomyWithImage {
    pub entry: TaxonomyEntry,
    pub image: Option<Vec<u8>>,
}

/// Raw image bytes plus the declared format, for serving as an HTTP body.
#[derive(Debug, Clone)]
pub struct TaxonomyImage {
    pub bytes: Vec<u8>,
    pub image_format: String,
}

#[derive(Clone)]
pub struct TaxonomyService {
    store: Arc<DocumentStore>,
}

impl TaxonomyService {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    fn key(chapter_id: &str, domain_id: &str) -> Filter {
        Filter::eq("chapter_id", chapter_id).and("domain_id", domain_id)
    }

    fn not_found(chapter_id: &str, domain_id: &str) -> CoreError {
        CoreError::NotFound(format!(
            "Taxonomy '{domain_id}' not found for chapter '{chapter_id}'"
        ))
    }

    fn fetch_doc(&self, chapter_id: &str, domain_id: &str) -> CoreResult<Document> {
        let filter = Self::key(chapter_id, domain_id);
        self.store
            .find_one(collections::TAXONOMY, &filter)?
            .ok_or_else(|| Self::not_found(chapter_id, domain_id))
    }

    pub fn list(&self) -> CoreResult<Vec<TaxonomyEntry>> {
        self.store
            .find_all(collections::TAXONOMY, &Filter::all())?
            .into_iter()
            .map(from_doc)
            .collect()
    }

    pub fn get(&self, chapter_id: &str, domain_id: &str) -> CoreResult<TaxonomyEntry> {
        from_doc(self.fetch_doc(chapter_id, domain_id)?)
    }

    /// Returns the entry with its image decoded from whichever stored shape
    /// the document carries.
    pub fn get_with_image(
        &self,
        chapter_id: &str,
        domain_id: &str,
    ) -> CoreResult<TaxonomyWithImage> {
        let doc = self.fetch_doc(chapter_id, domain_id)?;
        let image = doc
            .get("taxonomy_image")
            .filter(|value| !value.is_null())
            .map(image::decode_stored)
            .transpose()?;
        Ok(TaxonomyWithImage {
            entry: from_doc(doc)?,
            image,
        })
    }

    /// Looks the image up by document id, for direct browser fetches.
    pub fn image(&self, taxonomy_id: &str) -> CoreResult<TaxonomyImage> {
        let Some(doc) = self
            .store
            .find_one(collections::TAXONOMY, &Filter::eq("_id", taxonomy_id))?
        else {
            return Err(CoreError::NotFound("Taxonomy image not found".to_string()));
        };

        let Some(stored) = doc.get("taxonomy_image").filter(|value| !value.is_null()) else {
            return Err(CoreError::NotFound("Image data not found".to_string()));
        };
        let bytes = image::decode_stored(stored)?;

        let image_format = doc
            .get("image_format")
            .and_then(Value::as_str)
            .filter(|format| !format.is_empty())
            .unwrap_or(image::DEFAULT_FORMAT)
            .to_string();

        Ok(TaxonomyImage {
            bytes,
            image_format,
        })
    }

    /// Creates a new entry from a base64 image payload. Check-then-act, like
    /// every create in this service.
    pub fn create(
        &self,
        chapter_id: &str,
        domain_id: &str,
        domain_name: &str,
        image_format: &str,
        image_base64: &str,
    ) -> CoreResult<()> {
        let filter = Self::key(chapter_id, domain_id);
        if self.store.find_one(collections::TAXONOMY, &filter)?.is_some() {
            return Err(CoreError::Conflict(format!(
                "Taxonomy '{domain_id}' already exists for chapter '{chapter_id}'"
            )));
        }

        let stored_image = if image_base64.is_empty() {
            Value::Null
        } else {
            image::canonical(&image::decode_base64(image_base64)?)
        };

        let mut doc = Document::new();
        doc.insert("chapter_id".to_string(), chapter_id.into());
        doc.insert("domain_id".to_string(), domain_id.into());
        doc.insert("domain_name".to_string(), domain_name.into());
        doc.insert("image_format".to_string(), image_format.into());
        doc.insert("taxonomy_image".to_string(), stored_image);
        self.store.insert_one(collections::TAXONOMY, doc)?;
        Ok(())
    }

    /// Updates the display name and declared format; the image is updated
    /// separately through [`Self::update_image`].
    pub fn update(
        &self,
        chapter_id: &str,
        domain_id: &str,
        domain_name: &str,
        image_format: &str,
    ) -> CoreResult<()> {
        self.fetch_doc(chapter_id, domain_id)?;

        let mut patch = Document::new();
        patch.insert("domain_name".to_string(), domain_name.into());
        patch.insert("image_format".to_string(), image_format.into());
        self.store
            .update_one(collections::TAXONOMY, &Self::key(chapter_id, domain_id), patch)?;
        Ok(())
    }

    /// Replaces the stored image with the canonical representation of the
    /// supplied base64 payload.
    pub fn update_image(
        &self,
        chapter_id: &str,
        domain_id: &str,
        image_base64: &str,
    ) -> CoreResult<()> {
        self.fetch_doc(chapter_id, domain_id)?;

        let bytes = image::decode_base64(image_base64)?;
        let mut patch = Document::new();
        patch.insert("taxonomy_image".to_string(), image::canonical(&bytes));
        self.store
            .update_one(collections::TAXONOMY, &Self::key(chapter_id, domain_id), patch)?;
        Ok(())
    }

    /// Hard delete: removes the whole document, image included.
    pub fn delete(&self, chapter_id: &str, domain_id: &str) -> CoreResult<()> {
        let deleted = self
            .store
            .delete_one(collections::TAXONOMY, &Self::key(chapter_id, domain_id))?;
        if deleted == 0 {
            return Err(Self::not_found(chapter_id, domain_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::to_doc;
    use serde_json::json;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn setup() -> (Arc<DocumentStore>, TaxonomyService) {
        let store = Arc::new(DocumentStore::open_in_memory().unwrap());
        (store.clone(), TaxonomyService::new(store))
    }

    #[test]
    fn test_create_then_get_metadata() {
        let (_, taxonomy) = setup();
        taxonomy
            .create("ch1", "d1", "Cell biology", "png", &image::encode_base64(PNG_HEADER))
            .unwrap();

        let entry = taxonomy.get("ch1", "d1").unwrap();
        assert_eq!(entry.domain_name, "Cell biology");
        assert_eq!(entry.image_format, "png");
        assert!(!entry.id.is_empty());
    }

    #[test]
    fn test_image_round_trips_through_canonical_storage() {
        let (_, taxonomy) = setup();
        taxonomy
            .create("ch1", "d1", "Cells", "png", &image::encode_base64(PNG_HEADER))
            .unwrap();

        let entry = taxonomy.get("ch1", "d1").unwrap();
        let img = taxonomy.image(&entry.id).unwrap();
        assert_eq!(img.bytes, PNG_HEADER);
        assert_eq!(img.image_format, "png");
    }

    #[test]
    fn test_image_decodes_legacy_stored_shapes() {
        let (store, taxonomy) = setup();
        // Raw byte array, as left behind by the oldest import path.
        store
            .insert_one(
                collections::TAXONOMY,
                to_doc(&json!({
                    "chapter_id": "ch1",
                    "domain_id": "d1",
                    "taxonomy_image": PNG_HEADER,
                }))
                .unwrap(),
            )
            .unwrap();
        // Export-tool wrapper shape.
        store
            .insert_one(
                collections::TAXONOMY,
                to_doc(&json!({
                    "chapter_id": "ch1",
                    "domain_id": "d2",
                    "image_format": "png",
                    "taxonomy_image": {"$binary": {"base64": image::encode_base64(PNG_HEADER)}},
                }))
                .unwrap(),
            )
            .unwrap();

        let with_array = taxonomy.get_with_image("ch1", "d1").unwrap();
        assert_eq!(with_array.image.as_deref(), Some(PNG_HEADER));
        assert_eq!(with_array.entry.image_format, "svg", "format defaults when absent");

        let with_wrapper = taxonomy.get_with_image("ch1", "d2").unwrap();
        assert_eq!(with_wrapper.image.as_deref(), Some(PNG_HEADER));
    }

    #[test]
    fn test_create_existing_pair_conflicts() {
        let (_, taxonomy) = setup();
        taxonomy.create("ch1", "d1", "Cells", "svg", "").unwrap();
        let err = taxonomy
            .create("ch1", "d1", "Cells", "svg", "")
            .expect_err("duplicate");
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[test]
    fn test_create_rejects_invalid_base64() {
        let (_, taxonomy) = setup();
        let err = taxonomy
            .create("ch1", "d1", "Cells", "png", "@@not-base64@@")
            .expect_err("bad payload");
        assert!(matches!(err, CoreError::InvalidArgument(_)));
        // The failed create must not leave a document behind.
        assert!(matches!(
            taxonomy.get("ch1", "d1").expect_err("nothing stored"),
            CoreError::NotFound(_)
        ));
    }

    #[test]
    fn test_update_image_replaces_payload() {
        let (_, taxonomy) = setup();
        taxonomy.create("ch1", "d1", "Cells", "png", "").unwrap();

        taxonomy
            .update_image("ch1", "d1", &image::encode_base64(PNG_HEADER))
            .unwrap();
        let with_image = taxonomy.get_with_image("ch1", "d1").unwrap();
        assert_eq!(with_image.image.as_deref(), Some(PNG_HEADER));
    }

    #[test]
    fn test_entry_without_image_reports_image_not_found() {
        let (_, taxonomy) = setup();
        taxonomy.create("ch1", "d1", "Cells", "png", "").unwrap();
        let entry = taxonomy.get("ch1", "d1").unwrap();

        let err = taxonomy.image(&entry.id).expect_err("no payload stored");
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn test_delete_removes_document() {
        let (_, taxonomy) = setup();
        taxonomy.create("ch1", "d1", "Cells", "svg", "").unwrap();
        taxonomy.delete("ch1", "d1").unwrap();

        assert!(matches!(
            taxonomy.get("ch1", "d1").expect_err("gone"),
            CoreError::NotFound(_)
        ));
        assert!(matches!(
            taxonomy.delete("ch1", "d1").expect_err("already gone"),
            CoreError::NotFound(_)
        ));
    }
}
