//! Instance manager surface
//!
//! Lists and edits the entries of one chosen section. The section picker
//! only offers active sections. Forms come from the dynamic form module,
//! seeded against the section's current field list.
//!
//! Deletion goes through an explicit per-row state machine instead of the
//! "remove locally, hope the remote delete sticks" pattern: a row moves
//! Live -> PendingDelete -> Deleted on success, or back to the visible
//! list as Reverted when the delete fails, with the error attached.

use serde_json::{Map, Value};

use crate::error::{EngineError, Result};
use crate::form::{self, FieldWidget};
use crate::model::{EntryPayload, Section, SectionDataEntry};
use crate::store::{EntryStore, SchemaStore};

/// Lifecycle of one row in the entry list view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryRowState {
    Live,
    /// Delete requested, confirmation outstanding; hidden from the list
    PendingDelete,
    /// Delete confirmed; the row is dropped on the next refresh
    Deleted,
    /// Delete failed; the row is back in the list with the failure message
    Reverted { error: String },
}

/// One entry plus its list-view lifecycle state
#[derive(Debug, Clone)]
pub struct EntryRow {
    pub entry: SectionDataEntry,
    pub state: EntryRowState,
}

pub struct InstanceManager {
    schemas: SchemaStore,
    entries: EntryStore,
    section: Option<Section>,
    rows: Vec<EntryRow>,
}

impl InstanceManager {
    pub fn new(schemas: SchemaStore, entries: EntryStore) -> Self {
        Self { schemas, entries, section: None, rows: Vec::new() }
    }

    /// Sections offered in the picker. Inactive sections are excluded.
    pub fn pick_sections(&self) -> Result<Vec<Section>> {
        self.schemas.list_sections(false)
    }

    /// Load one section's entries into the list view
    pub fn open(&mut self, section_id: &str) -> Result<Section> {
        let section = self.schemas.get_section(section_id)?;
        self.rows = self
            .entries
            .list_entries(section_id)?
            .into_iter()
            .map(|entry| EntryRow { entry, state: EntryRowState::Live })
            .collect();
        self.section = Some(section.clone());
        Ok(section)
    }

    /// Re-read the open section's entries from the store
    pub fn refresh(&mut self) -> Result<()> {
        let id = self.open_section()?.id.clone();
        self.open(&id)?;
        Ok(())
    }

    /// Rows currently shown: live and reverted ones, never pending or
    /// confirmed deletions
    pub fn visible_rows(&self) -> Vec<&EntryRow> {
        self.rows
            .iter()
            .filter(|row| {
                matches!(row.state, EntryRowState::Live | EntryRowState::Reverted { .. })
            })
            .collect()
    }

    /// Widget sequence for a blank entry form
    pub fn new_entry_form(&self) -> Result<Vec<FieldWidget>> {
        let section = self.open_section()?;
        Ok(form::render_form(&section.fields, &Map::new()))
    }

    /// Widget sequence for editing an existing entry, seeded with its data
    pub fn edit_entry_form(&self, entry_id: &str) -> Result<Vec<FieldWidget>> {
        let section = self.open_section()?;
        let row = self
            .rows
            .iter()
            .find(|r| r.entry.id == entry_id)
            .ok_or_else(|| EngineError::not_found("entry", entry_id))?;
        Ok(form::render_form(&section.fields, &row.entry.data))
    }

    /// Submit a new entry; the list view picks it up immediately
    pub fn create_entry(&mut self, raw: Map<String, Value>) -> Result<SectionDataEntry> {
        let section_id = self.open_section()?.id.clone();
        let entry = self
            .entries
            .create_entry(&section_id, EntryPayload { data: raw, ..Default::default() })?;
        self.rows.push(EntryRow { entry: entry.clone(), state: EntryRowState::Live });
        Ok(entry)
    }

    /// Submit edits to an existing entry
    pub fn update_entry(
        &mut self,
        entry_id: &str,
        payload: EntryPayload,
    ) -> Result<SectionDataEntry> {
        let section_id = self.open_section()?.id.clone();
        let updated = self.entries.update_entry(&section_id, entry_id, payload)?;
        if let Some(row) = self.rows.iter_mut().find(|r| r.entry.id == entry_id) {
            row.entry = updated.clone();
            row.state = EntryRowState::Live;
        }
        Ok(updated)
    }

    /// Delete an entry through the row state machine. On failure the row
    /// reverts into the visible list and the error is returned.
    pub fn delete_entry(&mut self, entry_id: &str) -> Result<()> {
        let section_id = self.open_section()?.id.clone();
        let row = self
            .rows
            .iter_mut()
            .find(|r| r.entry.id == entry_id)
            .ok_or_else(|| EngineError::not_found("entry", entry_id))?;
        row.state = EntryRowState::PendingDelete;

        match self.entries.delete_entry(&section_id, entry_id) {
            Ok(()) => {
                // Confirmed: drop the row rather than keeping a tombstone
                self.rows.retain(|r| r.entry.id != entry_id);
                Ok(())
            }
            Err(err) => {
                if let Some(row) = self.rows.iter_mut().find(|r| r.entry.id == entry_id) {
                    row.state = EntryRowState::Reverted { error: err.to_string() };
                }
                log::warn!("entry delete failed, row reverted: {}", err);
                Err(err)
            }
        }
    }

    fn open_section(&self) -> Result<&Section> {
        self.section
            .as_ref()
            .ok_or_else(|| EngineError::validation("no section is open"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldDraft, SectionDraft};
    use crate::store::new_stores;
    use serde_json::json;

    fn manager_with_section() -> (InstanceManager, String) {
        let (schemas, entries) = new_stores();
        let section = schemas
            .create_section(SectionDraft { display_name: "Promo".into(), ..Default::default() })
            .unwrap();
        schemas
            .add_field(
                &section.id,
                FieldDraft { label: "Headline".into(), required: true, ..Default::default() },
            )
            .unwrap();
        (InstanceManager::new(schemas, entries), section.id)
    }

    fn raw(value: serde_json::Value) -> Map<String, serde_json::Value> {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_picker_excludes_inactive_sections() {
        let (schemas, entries) = new_stores();
        schemas
            .create_section(SectionDraft {
                display_name: "Hidden".into(),
                is_active: false,
                ..Default::default()
            })
            .unwrap();
        let manager = InstanceManager::new(schemas, entries);
        assert!(manager.pick_sections().unwrap().is_empty());
    }

    #[test]
    fn test_create_and_list_through_manager() {
        let (mut manager, section_id) = manager_with_section();
        manager.open(&section_id).unwrap();
        manager.create_entry(raw(json!({"headline": "Sale"}))).unwrap();
        assert_eq!(manager.visible_rows().len(), 1);
    }

    #[test]
    fn test_new_entry_form_is_seeded_with_defaults() {
        let (mut manager, section_id) = manager_with_section();
        manager.open(&section_id).unwrap();
        let widgets = manager.new_entry_form().unwrap();
        assert_eq!(widgets.len(), 1);
        assert_eq!(widgets[0].name, "headline");
        assert_eq!(widgets[0].value, json!(""));
    }

    #[test]
    fn test_delete_success_drops_the_row() {
        let (mut manager, section_id) = manager_with_section();
        manager.open(&section_id).unwrap();
        let entry = manager.create_entry(raw(json!({"headline": "Sale"}))).unwrap();
        manager.delete_entry(&entry.id).unwrap();
        assert!(manager.visible_rows().is_empty());
    }

    #[test]
    fn test_failed_delete_reverts_the_row() {
        let (mut manager, section_id) = manager_with_section();
        manager.open(&section_id).unwrap();
        let entry = manager.create_entry(raw(json!({"headline": "Sale"}))).unwrap();

        // Delete the entry out from under the manager so its own delete fails
        manager.entries.delete_entry(&section_id, &entry.id).unwrap();

        let err = manager.delete_entry(&entry.id).unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));

        let rows = manager.visible_rows();
        assert_eq!(rows.len(), 1);
        assert!(matches!(rows[0].state, EntryRowState::Reverted { .. }));

        // A refresh reconciles the view with the store
        manager.refresh().unwrap();
        assert!(manager.visible_rows().is_empty());
    }

    #[test]
    fn test_required_failure_surfaces_without_breaking_the_view() {
        let (mut manager, section_id) = manager_with_section();
        manager.open(&section_id).unwrap();
        manager.create_entry(raw(json!({"headline": "Ok"}))).unwrap();
        let err = manager.create_entry(raw(json!({}))).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(manager.visible_rows().len(), 1);
    }
}
