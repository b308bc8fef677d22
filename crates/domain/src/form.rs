use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use formcraft_core::{AppError, AppResult, FormId};
use serde::{Deserialize, Serialize};

use crate::field::{Field, FieldPatch, FieldType};
use crate::field_id::{FieldId, FieldIdGenerator};

/// Title given to a form that has not been named yet.
pub const DEFAULT_FORM_TITLE: &str = "Untitled form";

/// Ordered collection of fields plus form metadata.
///
/// Every mutating operation takes `&self` and returns a new document, leaving
/// the caller's previous value untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "FormDocumentRecord")]
pub struct FormDocument {
    id: Option<FormId>,
    title: String,
    fields: Vec<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FormDocumentRecord {
    #[serde(default)]
    id: Option<FormId>,
    title: String,
    #[serde(default)]
    fields: Vec<Field>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<FormDocumentRecord> for FormDocument {
    type Error = AppError;

    fn try_from(record: FormDocumentRecord) -> Result<Self, Self::Error> {
        let document = Self::from_parts(record.title, record.fields)?;
        Ok(Self {
            id: record.id,
            created_at: record.created_at,
            updated_at: record.updated_at,
            ..document
        })
    }
}

/// Listing entry for a persisted form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    /// Form identifier.
    pub id: FormId,
    /// Form title.
    pub title: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Default for FormDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl FormDocument {
    /// Creates an empty, unsaved document with the default title.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: None,
            title: DEFAULT_FORM_TITLE.to_owned(),
            fields: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Creates an unsaved document from a title and fields, checking id uniqueness.
    pub fn from_parts(title: impl Into<String>, fields: Vec<Field>) -> AppResult<Self> {
        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            field.validate()?;
            if !seen.insert(field.id()) {
                return Err(AppError::Validation(format!(
                    "duplicate field id '{}' in form",
                    field.id()
                )));
            }
        }

        Ok(Self {
            id: None,
            title: title.into(),
            fields,
            created_at: None,
            updated_at: None,
        })
    }

    /// Returns a copy carrying store-assigned identity and timestamps.
    #[must_use]
    pub fn persisted(
        &self,
        id: FormId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            created_at: Some(created_at),
            updated_at: Some(updated_at),
            ..self.clone()
        }
    }

    /// Returns a copy carrying the given identifier.
    #[must_use]
    pub fn with_id(&self, id: FormId) -> Self {
        Self {
            id: Some(id),
            ..self.clone()
        }
    }

    /// Returns a copy with a new title.
    #[must_use]
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    /// Appends a new field of the given kind and returns its identifier.
    ///
    /// Generated ids already used by the document are skipped. A generator
    /// that keeps repeating used ids fails with `Conflict`.
    pub fn add_field(
        &self,
        field_type: FieldType,
        id_generator: &dyn FieldIdGenerator,
    ) -> AppResult<(Self, FieldId)> {
        let field_id = self.unused_field_id(id_generator)?;

        let mut document = self.clone();
        document
            .fields
            .push(Field::new(field_type, field_id.clone()));
        Ok((document, field_id))
    }

    /// Merges a patch into the field with the given id.
    ///
    /// Returns an unchanged copy when the id is not present.
    pub fn patch_field(&self, field_id: &FieldId, patch: &FieldPatch) -> AppResult<Self> {
        let Some(position) = self.position_of(field_id) else {
            return Ok(self.clone());
        };

        let patched = self.fields[position].patched(patch)?;
        let mut document = self.clone();
        document.fields[position] = patched;
        Ok(document)
    }

    /// Removes the field with the given id, if present.
    #[must_use]
    pub fn remove_field(&self, field_id: &FieldId) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .filter(|field| field.id() != field_id)
                .cloned()
                .collect(),
            ..self.clone()
        }
    }

    /// Reorders fields to exactly match `new_order`.
    ///
    /// `new_order` must be a permutation of the current field ids.
    pub fn reorder_fields(&self, new_order: &[FieldId]) -> AppResult<Self> {
        if new_order.len() != self.fields.len() {
            return Err(AppError::Reorder(format!(
                "expected {} field ids but received {}",
                self.fields.len(),
                new_order.len()
            )));
        }

        let by_id: HashMap<&FieldId, &Field> =
            self.fields.iter().map(|field| (field.id(), field)).collect();
        let mut seen = HashSet::with_capacity(new_order.len());
        let mut reordered = Vec::with_capacity(new_order.len());
        for field_id in new_order {
            if !seen.insert(field_id) {
                return Err(AppError::Reorder(format!(
                    "field id '{field_id}' appears more than once"
                )));
            }

            let Some(field) = by_id.get(field_id) else {
                return Err(AppError::Reorder(format!(
                    "field id '{field_id}' is not part of this form"
                )));
            };
            reordered.push((*field).clone());
        }

        Ok(Self {
            fields: reordered,
            ..self.clone()
        })
    }

    /// Encodes the document into its JSON transport representation.
    pub fn to_json_bytes(&self) -> AppResult<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|error| AppError::Internal(format!("failed to encode form: {error}")))
    }

    /// Decodes a document from its JSON transport representation.
    pub fn from_json_bytes(bytes: &[u8]) -> AppResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|error| AppError::Format(format!("invalid form document: {error}")))
    }

    /// Returns the listing entry for a persisted document.
    #[must_use]
    pub fn summary(&self) -> Option<FormSummary> {
        Some(FormSummary {
            id: self.id?,
            title: self.title.clone(),
            created_at: self.created_at?,
            updated_at: self.updated_at?,
        })
    }

    /// Returns store-assigned identifier, absent while unsaved.
    #[must_use]
    pub fn id(&self) -> Option<FormId> {
        self.id
    }

    /// Returns form title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns fields in display order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks up a field by id.
    #[must_use]
    pub fn field(&self, field_id: &FieldId) -> Option<&Field> {
        self.fields.iter().find(|field| field.id() == field_id)
    }

    /// Returns whether a field with the given id exists.
    #[must_use]
    pub fn contains_field(&self, field_id: &FieldId) -> bool {
        self.position_of(field_id).is_some()
    }

    /// Returns field ids in display order.
    #[must_use]
    pub fn field_ids(&self) -> Vec<FieldId> {
        self.fields.iter().map(|field| field.id().clone()).collect()
    }

    /// Returns whether the document has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Returns last update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    fn unused_field_id(&self, id_generator: &dyn FieldIdGenerator) -> AppResult<FieldId> {
        let mut last = None;
        for _ in 0..=self.fields.len() {
            let field_id = id_generator.next_id();
            if !self.contains_field(&field_id) {
                return Ok(field_id);
            }
            last = Some(field_id);
        }

        Err(AppError::Conflict(format!(
            "generated field id '{}' already exists in form",
            last.map(|field_id| field_id.to_string()).unwrap_or_default()
        )))
    }

    fn position_of(&self, field_id: &FieldId) -> Option<usize> {
        self.fields.iter().position(|field| field.id() == field_id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{TimeZone, Utc};
    use formcraft_core::{AppError, FormId};
    use proptest::prelude::*;
    use serde_json::json;

    use super::{DEFAULT_FORM_TITLE, FormDocument};
    use crate::{
        Field, FieldId, FieldIdGenerator, FieldPatch, FieldType, SelectFieldPatch,
        SequentialFieldIdGenerator,
    };

    struct FixedFieldIdGenerator;

    impl FieldIdGenerator for FixedFieldIdGenerator {
        fn next_id(&self) -> FieldId {
            FieldId::new("same").unwrap_or_else(|_| unreachable!())
        }
    }

    fn add(
        document: &FormDocument,
        field_type: FieldType,
        ids: &SequentialFieldIdGenerator,
    ) -> (FormDocument, FieldId) {
        document
            .add_field(field_type, ids)
            .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn new_document_is_unsaved_and_untitled() {
        let document = FormDocument::new();
        assert_eq!(document.id(), None);
        assert_eq!(document.title(), DEFAULT_FORM_TITLE);
        assert!(document.is_empty());
        assert!(document.summary().is_none());
    }

    #[test]
    fn add_field_appends_and_keeps_previous_value_intact() {
        let ids = SequentialFieldIdGenerator::default();
        let empty = FormDocument::new();
        let (one, first) = add(&empty, FieldType::Text, &ids);
        let (two, second) = add(&one, FieldType::Select, &ids);

        assert!(empty.is_empty());
        assert_eq!(one.field_ids(), vec![first.clone()]);
        assert_eq!(two.field_ids(), vec![first, second]);
    }

    #[test]
    fn add_field_skips_ids_already_in_document() {
        let author_ids = SequentialFieldIdGenerator::default();
        let (document, first) = add(&FormDocument::new(), FieldType::Text, &author_ids);
        let (document, second) = add(&document, FieldType::Number, &author_ids);

        let fresh_ids = SequentialFieldIdGenerator::default();
        let (document, third) = add(&document, FieldType::Checkbox, &fresh_ids);

        assert_ne!(third, first);
        assert_ne!(third, second);
        assert_eq!(document.fields().len(), 3);
    }

    #[test]
    fn add_field_rejects_colliding_generated_ids() {
        let (document, _) = FormDocument::new()
            .add_field(FieldType::Text, &FixedFieldIdGenerator)
            .unwrap_or_else(|_| unreachable!());
        let result = document.add_field(FieldType::Number, &FixedFieldIdGenerator);
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[test]
    fn patch_field_replaces_whole_option_list() {
        let ids = SequentialFieldIdGenerator::default();
        let (document, select) = add(&FormDocument::new(), FieldType::Select, &ids);
        let patched = document
            .patch_field(
                &select,
                &FieldPatch::Select(SelectFieldPatch {
                    options: Some(vec!["Only".to_owned()]),
                    ..SelectFieldPatch::default()
                }),
            )
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(
            patched.field(&select).map(Field::options),
            Some(&["Only".to_owned()][..])
        );
    }

    #[test]
    fn patch_field_for_unknown_id_is_a_no_op() {
        let ids = SequentialFieldIdGenerator::default();
        let (document, _) = add(&FormDocument::new(), FieldType::Text, &ids);
        let missing = FieldId::new("missing").unwrap_or_else(|_| unreachable!());
        let patched = document.patch_field(&missing, &FieldPatch::label(FieldType::Text, "x"));
        assert_eq!(patched.ok(), Some(document));
    }

    #[test]
    fn remove_field_keeps_relative_order() {
        let ids = SequentialFieldIdGenerator::default();
        let (document, a) = add(&FormDocument::new(), FieldType::Text, &ids);
        let (document, b) = add(&document, FieldType::Number, &ids);
        let (document, c) = add(&document, FieldType::Checkbox, &ids);

        let removed = document.remove_field(&b);
        assert_eq!(removed.field_ids(), vec![a, c]);
        assert_eq!(removed.remove_field(&b), removed);
    }

    #[test]
    fn reorder_rejects_partial_duplicate_and_foreign_orders() {
        let ids = SequentialFieldIdGenerator::default();
        let (document, a) = add(&FormDocument::new(), FieldType::Text, &ids);
        let (document, b) = add(&document, FieldType::Number, &ids);
        let foreign = FieldId::new("foreign").unwrap_or_else(|_| unreachable!());

        let partial = document.reorder_fields(std::slice::from_ref(&b));
        assert!(matches!(partial, Err(AppError::Reorder(_))));

        let duplicated = document.reorder_fields(&[b.clone(), b.clone()]);
        assert!(matches!(duplicated, Err(AppError::Reorder(_))));

        let with_foreign = document.reorder_fields(&[b.clone(), foreign]);
        assert!(matches!(with_foreign, Err(AppError::Reorder(_))));

        let extended = document.reorder_fields(&[b.clone(), a.clone(), a.clone()]);
        assert!(matches!(extended, Err(AppError::Reorder(_))));

        assert_eq!(document.field_ids(), vec![a, b]);
    }

    #[test]
    fn decode_rejects_duplicate_field_ids() {
        let bytes = serde_json::to_vec(&json!({
            "title": "Dupes",
            "fields": [
                {"id": "x", "type": "text", "label": "A"},
                {"id": "x", "type": "number", "label": "B"}
            ]
        }))
        .unwrap_or_default();
        let decoded = FormDocument::from_json_bytes(&bytes);
        assert!(matches!(decoded, Err(AppError::Format(_))));
    }

    #[test]
    fn decode_rejects_corrupt_bytes() {
        let decoded = FormDocument::from_json_bytes(b"{\"title\": ");
        assert!(matches!(decoded, Err(AppError::Format(_))));
    }

    #[test]
    fn decode_ignores_unknown_attributes() {
        let bytes = serde_json::to_vec(&json!({
            "_id": "65f1c0ffee",
            "__v": 0,
            "title": "Feedback",
            "fields": [{"id": "1", "type": "text", "label": "Name", "extra": true}]
        }))
        .unwrap_or_default();
        let decoded = FormDocument::from_json_bytes(&bytes);
        assert!(decoded.is_ok());
        let decoded = decoded.unwrap_or_else(|_| unreachable!());
        assert_eq!(decoded.title(), "Feedback");
        assert_eq!(decoded.fields().len(), 1);
    }

    #[test]
    fn encoded_document_uses_camel_case_timestamps() {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single();
        let timestamp = timestamp.unwrap_or_else(|| unreachable!());
        let form_id = FormId::new();
        let document = FormDocument::new().persisted(form_id, timestamp, timestamp);
        let value = serde_json::to_value(&document).unwrap_or_default();

        assert_eq!(value["id"], json!(form_id.to_string()));
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("created_at").is_none());
    }

    #[derive(Debug, Clone)]
    enum Operation {
        Add(FieldType),
        Remove(usize),
        Relabel(usize, String),
        Reorder(u64),
    }

    fn field_type_strategy() -> impl Strategy<Value = FieldType> {
        prop_oneof![
            Just(FieldType::Text),
            Just(FieldType::Number),
            Just(FieldType::Checkbox),
            Just(FieldType::Select),
        ]
    }

    fn operation_strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            3 => field_type_strategy().prop_map(Operation::Add),
            1 => any::<usize>().prop_map(Operation::Remove),
            1 => (any::<usize>(), "[a-zA-Z ]{0,12}")
                .prop_map(|(index, label)| Operation::Relabel(index, label)),
            1 => any::<u64>().prop_map(Operation::Reorder),
        ]
    }

    fn shuffled(ids: &[FieldId], seed: u64) -> Vec<FieldId> {
        let mut order = ids.to_vec();
        if order.is_empty() {
            return order;
        }
        let shift = usize::try_from(seed % order.len() as u64).unwrap_or(0);
        order.rotate_left(shift);
        if seed % 2 == 1 {
            order.reverse();
        }
        order
    }

    fn pick(document: &FormDocument, index: usize) -> Option<&crate::Field> {
        document
            .fields()
            .get(index % document.fields().len().max(1))
    }

    fn apply(
        document: &FormDocument,
        operation: &Operation,
        ids: &SequentialFieldIdGenerator,
    ) -> FormDocument {
        match operation {
            Operation::Add(field_type) => add(document, *field_type, ids).0,
            Operation::Remove(index) => match pick(document, *index) {
                Some(field) => document.remove_field(field.id()),
                None => document.clone(),
            },
            Operation::Relabel(index, label) => match pick(document, *index) {
                Some(field) => document
                    .patch_field(field.id(), &FieldPatch::label(field.field_type(), label))
                    .unwrap_or_else(|_| unreachable!()),
                None => document.clone(),
            },
            Operation::Reorder(seed) => document
                .reorder_fields(&shuffled(&document.field_ids(), *seed))
                .unwrap_or_else(|_| unreachable!()),
        }
    }

    fn build(operations: &[Operation]) -> FormDocument {
        let ids = SequentialFieldIdGenerator::default();
        operations
            .iter()
            .fold(FormDocument::new(), |document, operation| {
                apply(&document, operation, &ids)
            })
    }

    proptest! {
        #[test]
        fn field_ids_stay_unique(operations in prop::collection::vec(operation_strategy(), 0..48)) {
            let document = build(&operations);
            let unique: HashSet<FieldId> = document.field_ids().into_iter().collect();
            prop_assert_eq!(unique.len(), document.fields().len());
        }

        #[test]
        fn only_select_fields_carry_options(operations in prop::collection::vec(operation_strategy(), 0..48)) {
            let document = build(&operations);
            for field in document.fields() {
                if field.field_type() != FieldType::Select {
                    prop_assert!(field.options().is_empty());
                }
            }
        }

        #[test]
        fn json_round_trip_preserves_document(operations in prop::collection::vec(operation_strategy(), 0..32)) {
            let document = build(&operations).with_title("Round trip");
            let bytes = document.to_json_bytes();
            prop_assert!(bytes.is_ok());
            let decoded = FormDocument::from_json_bytes(&bytes.unwrap_or_default());
            prop_assert_eq!(decoded.ok(), Some(document));
        }

        #[test]
        fn valid_permutation_yields_exact_order(
            operations in prop::collection::vec(operation_strategy(), 1..32),
            seed in any::<u64>(),
        ) {
            let document = build(&operations);
            let order = shuffled(&document.field_ids(), seed);
            let reordered = document.reorder_fields(&order);
            prop_assert!(reordered.is_ok());
            prop_assert_eq!(reordered.unwrap_or_else(|_| unreachable!()).field_ids(), order);
        }

        #[test]
        fn dropping_an_id_is_rejected(
            operations in prop::collection::vec(operation_strategy(), 1..32),
            seed in any::<u64>(),
        ) {
            let document = build(&operations);
            let before = document.clone();
            let mut order = shuffled(&document.field_ids(), seed);
            if order.pop().is_some() {
                let result = document.reorder_fields(&order);
                prop_assert!(matches!(result, Err(AppError::Reorder(_))));
            }
            prop_assert_eq!(document, before);
        }
    }
}
