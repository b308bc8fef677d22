use std::sync::Arc;

use formcraft_core::{AppError, AppResult, FormId};
use formcraft_domain::{
    Field, FieldId, FieldIdGenerator, FieldPatch, FieldType, FormDocument, FormSummary,
};
use tracing::{debug, warn};

use crate::form_ports::FormStore;


/// Editing state of a builder session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The document has no fields.
    Empty,
    /// The document has at least one field.
    Editing,
}

/// Editing session for one form document.
///
/// The session owns the current document and the selected field. Document
/// changes go through [`FormDocument`] operations and replace the document as a
/// whole, so a failed operation leaves the session exactly as it was. After
/// every change the selection either names a field of the current document or
/// is cleared.
pub struct BuilderSession {
    store: Arc<dyn FormStore>,
    id_generator: Arc<dyn FieldIdGenerator>,
    document: FormDocument,
    selected_field_id: Option<FieldId>,
}

impl BuilderSession {
    /// Creates a session holding a fresh, unsaved document.
    #[must_use]
    pub fn new(store: Arc<dyn FormStore>, id_generator: Arc<dyn FieldIdGenerator>) -> Self {
        Self {
            store,
            id_generator,
            document: FormDocument::new(),
            selected_field_id: None,
        }
    }

    /// Returns the current document.
    #[must_use]
    pub fn document(&self) -> &FormDocument {
        &self.document
    }

    /// Returns the selected field id, if any.
    #[must_use]
    pub fn selected_field_id(&self) -> Option<&FieldId> {
        self.selected_field_id.as_ref()
    }

    /// Returns the selected field, if any.
    #[must_use]
    pub fn selected_field(&self) -> Option<&Field> {
        self.selected_field_id
            .as_ref()
            .and_then(|field_id| self.document.field(field_id))
    }

    /// Returns whether the document has any fields.
    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.document.is_empty() {
            SessionState::Empty
        } else {
            SessionState::Editing
        }
    }

    /// Discards the current document and starts a new unsaved one.
    pub fn new_form(&mut self) {
        self.replace_document(FormDocument::new());
    }

    /// Replaces the current document with a stored form.
    ///
    /// On failure the current document and selection are kept.
    pub async fn load_form(&mut self, form_id: FormId) -> AppResult<()> {
        let loaded = self.store.get(form_id).await.inspect_err(|error| {
            warn!(%form_id, %error, "failed to load form");
        })?;

        let loaded = match loaded.id() {
            Some(loaded_id) if loaded_id != form_id => {
                return Err(AppError::Format(format!(
                    "requested form '{form_id}' but store returned '{loaded_id}'"
                )));
            }
            Some(_) => loaded,
            None => loaded.with_id(form_id),
        };

        debug!(%form_id, fields = loaded.fields().len(), "form loaded");
        self.replace_document(loaded);
        Ok(())
    }

    /// Renames the current document.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.document = self.document.with_title(title);
    }

    /// Appends a default field of the given kind and selects it.
    pub fn add_field(&mut self, field_type: FieldType) -> AppResult<FieldId> {
        let (document, field_id) = self
            .document
            .add_field(field_type, self.id_generator.as_ref())?;
        self.document = document;
        self.selected_field_id = Some(field_id.clone());
        Ok(field_id)
    }

    /// Appends a default field given its kind name, e.g. `"select"`.
    pub fn add_field_named(&mut self, type_name: &str) -> AppResult<FieldId> {
        self.add_field(type_name.parse::<FieldType>()?)
    }

    /// Applies a partial update to the selected field.
    ///
    /// Without a selection this does nothing.
    pub fn update_selected_field(&mut self, patch: &FieldPatch) -> AppResult<()> {
        let Some(field_id) = self.selected_field_id.as_ref() else {
            return Ok(());
        };

        self.document = self.document.patch_field(field_id, patch)?;
        Ok(())
    }

    /// Removes a field; clears the selection when it pointed at that field.
    pub fn remove_field(&mut self, field_id: &FieldId) {
        let document = self.document.remove_field(field_id);
        self.replace_document_keeping_selection(document);
    }

    /// Reorders fields to exactly the given id sequence.
    pub fn reorder(&mut self, new_order: &[FieldId]) -> AppResult<()> {
        let document = self.document.reorder_fields(new_order)?;
        self.replace_document_keeping_selection(document);
        Ok(())
    }

    /// Selects a field, or clears the selection with `None`.
    ///
    /// Selecting an id that is not in the document is ignored.
    pub fn select(&mut self, field_id: Option<&FieldId>) {
        match field_id {
            None => self.selected_field_id = None,
            Some(field_id) if self.document.contains_field(field_id) => {
                self.selected_field_id = Some(field_id.clone());
            }
            Some(field_id) => debug!(%field_id, "ignoring selection of unknown field"),
        }
    }

    /// Appends an `Option N` entry to the selected select field.
    ///
    /// Does nothing unless a select field is selected.
    pub fn add_select_option(&mut self) -> AppResult<()> {
        let Some(field) = self.selected_select_field() else {
            return Ok(());
        };

        let mut options = field.options().to_vec();
        options.push(field.next_option_label());
        self.update_selected_field(&FieldPatch::options(options))
    }

    /// Removes the option at `index` from the selected select field.
    ///
    /// An index past the end, or a selection that is not a select field, does
    /// nothing.
    pub fn remove_select_option(&mut self, index: usize) -> AppResult<()> {
        let Some(field) = self.selected_select_field() else {
            return Ok(());
        };
        if index >= field.options().len() {
            return Ok(());
        }

        let mut options = field.options().to_vec();
        options.remove(index);
        self.update_selected_field(&FieldPatch::options(options))
    }

    /// Persists the current document and returns its id.
    ///
    /// An unsaved document is created; a saved one is updated in place. On
    /// failure the document is not changed and the error is returned.
    pub async fn save(&mut self) -> AppResult<FormId> {
        let form_id = match self.document.id() {
            None => {
                let form_id = self.store.create(&self.document).await.inspect_err(|error| {
                    warn!(%error, "failed to create form");
                })?;
                self.document = self.document.with_id(form_id);
                form_id
            }
            Some(form_id) => {
                let stored = self
                    .store
                    .update(form_id, &self.document)
                    .await
                    .inspect_err(|error| warn!(%form_id, %error, "failed to update form"))?;
                self.document = match (stored.created_at(), stored.updated_at()) {
                    (Some(created_at), Some(updated_at)) => {
                        self.document.persisted(form_id, created_at, updated_at)
                    }
                    _ => self.document.with_id(form_id),
                };
                form_id
            }
        };

        debug!(%form_id, "form saved");
        Ok(form_id)
    }

    /// Lists stored forms, newest first.
    pub async fn list_forms(&self) -> AppResult<Vec<FormSummary>> {
        self.store.list().await
    }

    fn selected_select_field(&self) -> Option<Field> {
        self.selected_field()
            .filter(|field| field.field_type() == FieldType::Select)
            .cloned()
    }

    fn replace_document(&mut self, document: FormDocument) {
        self.document = document;
        self.selected_field_id = None;
    }

    fn replace_document_keeping_selection(&mut self, document: FormDocument) {
        self.document = document;
        if self
            .selected_field_id
            .as_ref()
            .is_some_and(|field_id| !self.document.contains_field(field_id))
        {
            self.selected_field_id = None;
        }
    }
}
