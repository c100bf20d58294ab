//! Schema editor surface
//!
//! Thin orchestration over the schema store: everything the "define a
//! content type" screen needs, including the type picker choices sourced
//! from the catalog.

use crate::catalog::FieldType;
use crate::error::Result;
use crate::model::{FieldDraft, Section, SectionDraft, SectionPatch};
use crate::store::SchemaStore;

#[derive(Clone)]
pub struct SchemaEditor {
    schemas: SchemaStore,
}

impl SchemaEditor {
    pub fn new(schemas: SchemaStore) -> Self {
        Self { schemas }
    }

    /// Sections for the editor's list view, inactive ones included
    pub fn list(&self) -> Result<Vec<Section>> {
        self.schemas.list_sections(true)
    }

    /// The "choose field type" control is populated straight from the
    /// catalog, so a new type shows up here without editor changes.
    pub fn field_type_choices(&self) -> &'static [FieldType] {
        &FieldType::ALL
    }

    pub fn create(&self, draft: SectionDraft) -> Result<Section> {
        self.schemas.create_section(draft)
    }

    pub fn update(&self, id: &str, patch: SectionPatch) -> Result<Section> {
        self.schemas.update_section(id, patch)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.schemas.delete_section(id)
    }

    pub fn add_field(&self, section_id: &str, draft: FieldDraft) -> Result<Section> {
        self.schemas.add_field(section_id, draft)
    }

    pub fn remove_field(&self, section_id: &str, index: usize) -> Result<Section> {
        self.schemas.remove_field(section_id, index)
    }
}
