//! Schema and instance stores
//!
//! [`SchemaStore`] holds the section definitions; [`EntryStore`] holds the
//! records written against them. Both are views over one shared
//! [`ContentState`] so that deleting a section and cascading its entries is
//! a single atomic write — entries cannot outlive their section.
//!
//! Every successful mutation is visible to the next read. There is no cache
//! layer and no staleness window; the engine serves a single-admin,
//! low-concurrency workload.

pub mod state;

use chrono::Utc;
use serde_json::{Map, Value};

use crate::error::{EngineError, Result};
use crate::form;
use crate::model::{
    field_key, new_id, section_slug, EntryPayload, Field, FieldDraft, Section, SectionDataEntry,
    SectionDraft, SectionPatch, DEFAULT_SECTION_ICON,
};
use state::StateCell;

/// All content for one namespace
#[derive(Debug, Default)]
pub struct ContentState {
    sections: Vec<Section>,
    entries: Vec<SectionDataEntry>,
}

/// Build a linked pair of stores over fresh state
pub fn new_stores() -> (SchemaStore, EntryStore) {
    let cell = StateCell::new(ContentState::default());
    (SchemaStore { state: cell.clone() }, EntryStore { state: cell })
}

/// Section definition store
#[derive(Clone)]
pub struct SchemaStore {
    state: StateCell<ContentState>,
}

impl SchemaStore {
    /// All sections sorted by their order key. Inactive sections are
    /// excluded unless asked for; the instance manager's picker never sees
    /// them.
    pub fn list_sections(&self, include_inactive: bool) -> Result<Vec<Section>> {
        self.state.with_state(|s| {
            let mut sections: Vec<Section> = s
                .sections
                .iter()
                .filter(|sec| include_inactive || sec.is_active)
                .cloned()
                .collect();
            sections.sort_by_key(|sec| sec.order);
            sections
        })
    }

    pub fn get_section(&self, id: &str) -> Result<Section> {
        self.state.with_state(|s| s.sections.iter().find(|sec| sec.id == id).cloned())?
            .ok_or_else(|| EngineError::not_found("section", id))
    }

    pub fn create_section(&self, draft: SectionDraft) -> Result<Section> {
        let display_name = draft.display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(EngineError::validation("displayName is required"));
        }
        let slug = section_slug(draft.name.as_deref().unwrap_or(&display_name));
        if slug.is_empty() {
            return Err(EngineError::validation("derived name is empty"));
        }

        self.state.with_state_mut(|s| {
            if s.sections.iter().any(|sec| sec.name == slug) {
                return Err(EngineError::validation(format!(
                    "a section named '{}' already exists",
                    slug
                )));
            }
            let section = Section {
                id: new_id(),
                name: slug,
                display_name,
                description: draft.description,
                icon: draft.icon.unwrap_or_else(|| DEFAULT_SECTION_ICON.to_string()),
                kind: draft.kind,
                fields: Vec::new(),
                is_active: draft.is_active,
                show_on_frontend: draft.show_on_frontend,
                order: draft.order,
            };
            s.sections.push(section.clone());
            log::info!("section created: {} ({})", section.name, section.id);
            Ok(section)
        })?
    }

    pub fn update_section(&self, id: &str, patch: SectionPatch) -> Result<Section> {
        self.state.with_state_mut(|s| {
            // Re-derive the slug first so the uniqueness check can run
            // against the other sections before anything is mutated.
            let new_slug = match &patch.name {
                Some(raw) => {
                    let slug = section_slug(raw);
                    if slug.is_empty() {
                        return Err(EngineError::validation("derived name is empty"));
                    }
                    if s.sections.iter().any(|sec| sec.name == slug && sec.id != id) {
                        return Err(EngineError::validation(format!(
                            "a section named '{}' already exists",
                            slug
                        )));
                    }
                    Some(slug)
                }
                None => None,
            };

            let section = s
                .sections
                .iter_mut()
                .find(|sec| sec.id == id)
                .ok_or_else(|| EngineError::not_found("section", id))?;

            if let Some(slug) = new_slug {
                section.name = slug;
            }
            if let Some(display_name) = patch.display_name {
                let display_name = display_name.trim().to_string();
                if display_name.is_empty() {
                    return Err(EngineError::validation("displayName cannot be empty"));
                }
                section.display_name = display_name;
            }
            if let Some(description) = patch.description {
                section.description = description;
            }
            if let Some(icon) = patch.icon {
                section.icon = icon;
            }
            if let Some(kind) = patch.kind {
                section.kind = kind;
            }
            if let Some(is_active) = patch.is_active {
                section.is_active = is_active;
            }
            if let Some(show) = patch.show_on_frontend {
                section.show_on_frontend = show;
            }
            if let Some(order) = patch.order {
                section.order = order;
            }
            Ok(section.clone())
        })?
    }

    /// Delete a section and cascade-delete every entry it owns
    pub fn delete_section(&self, id: &str) -> Result<()> {
        self.state.with_state_mut(|s| {
            let before = s.sections.len();
            s.sections.retain(|sec| sec.id != id);
            if s.sections.len() == before {
                return Err(EngineError::not_found("section", id));
            }
            let owned = s.entries.iter().filter(|e| e.section_id == id).count();
            s.entries.retain(|e| e.section_id != id);
            log::info!("section deleted: {} ({} entries cascaded)", id, owned);
            Ok(())
        })?
    }

    /// Append a field to the section's ordered list
    pub fn add_field(&self, section_id: &str, draft: FieldDraft) -> Result<Section> {
        let label = draft.label.trim().to_string();
        if label.is_empty() {
            return Err(EngineError::validation("field label is required"));
        }
        let key = field_key(draft.name.as_deref().unwrap_or(&label));
        if key.is_empty() {
            return Err(EngineError::validation("derived field name is empty"));
        }

        self.state.with_state_mut(|s| {
            let section = s
                .sections
                .iter_mut()
                .find(|sec| sec.id == section_id)
                .ok_or_else(|| EngineError::not_found("section", section_id))?;
            if section.field_index(&key).is_some() {
                return Err(EngineError::validation(format!(
                    "field '{}' already exists in section '{}'",
                    key, section.name
                )));
            }
            section.fields.push(Field {
                name: key,
                label,
                field_type: draft.field_type,
                required: draft.required,
                options: draft.options,
            });
            Ok(section.clone())
        })?
    }

    /// Remove the field at `index`. Existing entries keep whatever keys
    /// they already carry; the orphaned key is tolerated, not stripped.
    pub fn remove_field(&self, section_id: &str, index: usize) -> Result<Section> {
        self.state.with_state_mut(|s| {
            let section = s
                .sections
                .iter_mut()
                .find(|sec| sec.id == section_id)
                .ok_or_else(|| EngineError::not_found("section", section_id))?;
            if index >= section.fields.len() {
                return Err(EngineError::validation(format!(
                    "field index {} out of range (section has {} fields)",
                    index,
                    section.fields.len()
                )));
            }
            let removed = section.fields.remove(index);
            log::info!("field removed: {}.{}", section.name, removed.name);
            Ok(section.clone())
        })?
    }
}

/// Store for the records written against section schemas
#[derive(Clone)]
pub struct EntryStore {
    state: StateCell<ContentState>,
}

impl EntryStore {
    /// All entries for one section, sorted by their order key. A deleted or
    /// unknown section simply has no entries.
    pub fn list_entries(&self, section_id: &str) -> Result<Vec<SectionDataEntry>> {
        self.state.with_state(|s| {
            let mut entries: Vec<SectionDataEntry> =
                s.entries.iter().filter(|e| e.section_id == section_id).cloned().collect();
            entries.sort_by_key(|e| e.order);
            entries
        })
    }

    /// Create an entry against the section's *current* field list: the raw
    /// data map is coerced per the catalog and required fields must be
    /// present and non-empty.
    pub fn create_entry(&self, section_id: &str, payload: EntryPayload) -> Result<SectionDataEntry> {
        self.state.with_state_mut(|s| {
            let fields = section_fields(s, section_id)?;
            let data = coerce_and_validate(&fields, &payload.data)?;
            let now = Utc::now();
            let entry = SectionDataEntry {
                id: new_id(),
                section_id: section_id.to_string(),
                data,
                is_active: payload.is_active,
                order: payload.order,
                created_at: now,
                updated_at: now,
            };
            s.entries.push(entry.clone());
            Ok(entry)
        })?
    }

    /// Update an entry with the same validation as creation. The entry must
    /// belong to the given section.
    pub fn update_entry(
        &self,
        section_id: &str,
        entry_id: &str,
        payload: EntryPayload,
    ) -> Result<SectionDataEntry> {
        self.state.with_state_mut(|s| {
            let fields = section_fields(s, section_id)?;
            let data = coerce_and_validate(&fields, &payload.data)?;
            let entry = s
                .entries
                .iter_mut()
                .find(|e| e.id == entry_id && e.section_id == section_id)
                .ok_or_else(|| EngineError::not_found("entry", entry_id))?;
            entry.data = data;
            entry.is_active = payload.is_active;
            entry.order = payload.order;
            entry.updated_at = Utc::now();
            Ok(entry.clone())
        })?
    }

    pub fn delete_entry(&self, section_id: &str, entry_id: &str) -> Result<()> {
        self.state.with_state_mut(|s| {
            let before = s.entries.len();
            s.entries.retain(|e| !(e.id == entry_id && e.section_id == section_id));
            if s.entries.len() == before {
                return Err(EngineError::not_found("entry", entry_id));
            }
            Ok(())
        })?
    }
}

fn section_fields(state: &ContentState, section_id: &str) -> Result<Vec<Field>> {
    state
        .sections
        .iter()
        .find(|sec| sec.id == section_id)
        .map(|sec| sec.fields.clone())
        .ok_or_else(|| EngineError::not_found("section", section_id))
}

fn coerce_and_validate(
    fields: &[Field],
    raw: &Map<String, Value>,
) -> Result<Map<String, Value>> {
    let data = form::collect_submission(fields, raw);
    form::validate_required(fields, &data)?;
    Ok(data)
}
