use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::reactive::{Computed, Observable, ObservableList, Reorderable, Tracker};
use crate::{Field, FieldData, FieldPatch, FieldType, FormError};

/// Name of a form that was given none.
pub const DEFAULT_FORM_NAME: &str = "Untitled";

/// A partial set of form attributes, used to hydrate a [`Form`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub fields: Option<Vec<FieldPatch>>,
}

impl From<FormData> for FormPatch {
    fn from(data: FormData) -> Self {
        Self {
            name: Some(data.name),
            description: Some(data.description),
            fields: Some(data.fields.into_iter().map(FieldPatch::from).collect()),
        }
    }
}

/// The serialized form: the only externally visible data format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormData {
    pub name: String,
    pub description: String,
    pub fields: Vec<FieldData>,
}

struct FormInner {
    name: Observable<String>,
    description: Observable<String>,
    fields: ObservableList<Field>,
    has_fields: Computed<bool>,
}

/// The document being built: a name, a description and an ordered list of
/// fields.
///
/// Like [`Field`], `Form` is a handle; clones refer to the same form.
#[derive(Clone)]
pub struct Form {
    inner: Rc<FormInner>,
}

impl Form {
    /// An empty form with default name and description.
    pub fn new() -> Self {
        Self::from_data(FormPatch::default())
    }

    /// Hydrate a form. Each field record goes through [`Field::new`], so
    /// missing attributes get the usual defaults.
    pub fn from_data(patch: FormPatch) -> Self {
        let fields = ObservableList::from_vec(
            patch
                .fields
                .unwrap_or_default()
                .into_iter()
                .map(Field::new)
                .collect(),
        );
        let has_fields = {
            let fields = fields.clone();
            Computed::new(move |cx| fields.track_len(cx) != 0)
        };

        Self {
            inner: Rc::new(FormInner {
                name: Observable::new(
                    patch
                        .name
                        .unwrap_or_else(|| DEFAULT_FORM_NAME.to_string()),
                ),
                description: Observable::new(patch.description.unwrap_or_default()),
                fields,
                has_fields,
            }),
        }
    }

    /// Hydrate a form from its JSON serialization.
    pub fn from_json(json: &str) -> Result<Self, FormError> {
        let patch: FormPatch = serde_json::from_str(json)?;
        Ok(Self::from_data(patch))
    }

    pub fn name(&self) -> String {
        self.inner.name.get()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.inner.name.set(name.into());
    }

    pub fn description(&self) -> String {
        self.inner.description.get()
    }

    pub fn set_description(&self, description: impl Into<String>) {
        self.inner.description.set(description.into());
    }

    /// Snapshot of the fields, in order.
    pub fn fields(&self) -> Vec<Field> {
        self.inner.fields.to_vec()
    }

    /// A handle that reorders the fields in place, for collaborators such as
    /// a drag-and-drop synchronizer. Fields are only added and removed
    /// through the form itself, so every field appears once.
    pub fn field_order(&self) -> Reorderable<Field> {
        Reorderable::from(self.inner.fields.clone())
    }

    /// Field at `index`, if any.
    pub fn field_at(&self, index: usize) -> Option<Field> {
        self.inner.fields.get(index)
    }

    /// Index of `field` in this form.
    pub fn position_of(&self, field: &Field) -> Option<usize> {
        self.inner.fields.position(|candidate| candidate == field)
    }

    /// Index of `field`, recorded as a dependency of `cx`.
    pub fn track_position_of(&self, cx: &Tracker, field: &Field) -> Option<usize> {
        self.inner
            .fields
            .track(cx)
            .iter()
            .position(|candidate| candidate == field)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.inner.fields.len()
    }

    /// Check if the form has no fields. Prefer [`Form::has_fields`] inside
    /// computed values.
    pub fn is_empty(&self) -> bool {
        self.inner.fields.is_empty()
    }

    /// Check if the form has at least one field.
    pub fn has_fields(&self) -> bool {
        self.inner.has_fields.get()
    }

    /// [`Form::has_fields`], recorded as a dependency of `cx`.
    pub fn track_has_fields(&self, cx: &Tracker) -> bool {
        self.inner.has_fields.track(cx)
    }

    /// Append a new field of the type named in `patch`.
    ///
    /// Only the type is honored: the new field gets that type's defaults and
    /// every other attribute in `patch` is ignored. Fails without touching the
    /// form when the patch has no type.
    pub fn add_field(&self, patch: FieldPatch) -> Result<Field, FormError> {
        let field_type = patch.field_type.ok_or(FormError::MissingFieldType)?;
        Ok(self.add_field_of_type(field_type))
    }

    /// Append a new field of `field_type` with that type's defaults.
    pub fn add_field_of_type(&self, field_type: FieldType) -> Field {
        let field = Field::for_type(field_type);
        self.inner.fields.push(field.clone());
        tracing::debug!(%field_type, index = self.len() - 1, "field added");
        field
    }

    /// Insert a copy of `field` right after it.
    ///
    /// The copy is built from the field's current serialized state and shares
    /// nothing with the original.
    pub fn duplicate_field(&self, field: &Field) -> Result<Field, FormError> {
        let index = self.position_of(field).ok_or(FormError::FieldNotFound)?;
        let copy = Field::new(field.to_data().into());
        self.inner.fields.insert(index + 1, copy.clone());
        tracing::debug!(index, "field duplicated");
        Ok(copy)
    }

    /// Remove `field` from the form. Returns false if it was not part of it.
    pub fn remove_field(&self, field: &Field) -> bool {
        let removed = self.inner.fields.remove_item(field);
        if removed {
            tracing::debug!(field_type = %field.field_type(), "field removed");
        }
        removed
    }

    /// Serialize the current state.
    pub fn to_data(&self) -> FormData {
        self.track_data(&Tracker::untracked())
    }

    /// Serialize the current state, recording the name, the description, the
    /// field list and every field attribute as dependencies of `cx`.
    pub fn track_data(&self, cx: &Tracker) -> FormData {
        FormData {
            name: self.inner.name.track(cx),
            description: self.inner.description.track(cx),
            fields: self
                .inner
                .fields
                .track(cx)
                .iter()
                .map(|field| field.track_data(cx))
                .collect(),
        }
    }

    /// Serialize the current state as compact JSON.
    pub fn to_json(&self) -> Result<String, FormError> {
        Ok(serde_json::to_string(&self.to_data())?)
    }

    /// Serialize the current state as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, FormError> {
        Ok(serde_json::to_string_pretty(&self.to_data())?)
    }
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl From<FormData> for Form {
    fn from(data: FormData) -> Self {
        Self::from_data(data.into())
    }
}

impl PartialEq for Form {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("name", &self.inner.name.get())
            .field("fields", &self.inner.fields)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(form: &Form) -> Vec<String> {
        form.fields().iter().map(Field::title).collect()
    }

    #[test]
    fn empty_form_defaults() {
        let form = Form::new();
        assert_eq!(form.name(), "Untitled");
        assert_eq!(form.description(), "");
        assert!(!form.has_fields());
        assert!(form.is_empty());
    }

    #[test]
    fn add_field_requires_a_type() {
        let form = Form::new();
        let err = form.add_field(FieldPatch::default()).unwrap_err();
        assert!(matches!(err, FormError::MissingFieldType));
        assert!(!form.has_fields());
    }

    #[test]
    fn add_field_only_honors_the_type() {
        let form = Form::new();
        let field = form
            .add_field(FieldPatch::of_type(FieldType::Checkbox).with_title("Ignored"))
            .unwrap();
        assert_eq!(field.title(), "Check all that apply");
        assert_eq!(field.choices().len(), 3);
        assert!(form.has_fields());
        assert_eq!(form.field_at(0), Some(field));
    }

    #[test]
    fn add_field_appends() {
        let form = Form::new();
        form.add_field_of_type(FieldType::Number);
        form.add_field_of_type(FieldType::Phone);
        assert_eq!(titles(&form), vec!["Number", "Phone"]);
    }

    #[test]
    fn duplicate_inserts_after_the_original() {
        let form = Form::new();
        let a = form.add_field_of_type(FieldType::Text);
        let b = form.add_field_of_type(FieldType::Radio);
        let c = form.add_field_of_type(FieldType::Phone);
        b.set_title("Favourite colour");
        b.set_required(true);

        let copy = form.duplicate_field(&b).unwrap();
        assert_eq!(form.fields(), vec![a, b.clone(), copy.clone(), c]);
        assert_ne!(copy, b);
        assert_eq!(copy.to_data(), b.to_data());

        copy.add_choice();
        assert_eq!(b.choices().len(), 3);
    }

    #[test]
    fn duplicate_of_a_foreign_field_fails() {
        let form = Form::new();
        form.add_field_of_type(FieldType::Text);
        let stranger = Field::for_type(FieldType::Text);
        let err = form.duplicate_field(&stranger).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(form.len(), 1);
    }

    #[test]
    fn remove_field_by_identity() {
        let form = Form::new();
        let a = form.add_field_of_type(FieldType::Text);
        let b = form.add_field_of_type(FieldType::Text);
        let lookalike = Field::new(a.to_data().into());

        assert!(!form.remove_field(&lookalike));
        assert_eq!(form.len(), 2);

        assert!(form.remove_field(&a));
        assert_eq!(form.fields(), vec![b.clone()]);

        assert!(form.remove_field(&b));
        assert!(!form.has_fields());
        assert!(!form.remove_field(&b));
    }

    #[test]
    fn field_order_moves_fields_in_place() {
        let form = Form::new();
        let a = form.add_field_of_type(FieldType::Text);
        let b = form.add_field_of_type(FieldType::Email);
        let order = form.field_order();

        assert!(order.move_item(1, 0));
        assert_eq!(form.fields(), vec![b.clone(), a.clone()]);
        assert_eq!(form.position_of(&a), Some(1));
        assert!(!order.move_item(0, 2));
        assert_eq!(order.len(), 2);
    }

    #[test]
    fn hydrates_from_json() {
        let form = Form::from_json(
            r#"{
                "name": "Signup",
                "fields": [
                    {"type": "shortname"},
                    {"type": "radio", "title": "Plan", "choices": [{"choice": "Free"}]},
                    {"title": "No type"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(form.name(), "Signup");
        assert_eq!(form.description(), "");
        let fields = form.fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].field_type(), FieldType::Shortname);
        assert_eq!(fields[0].title(), "Untitled");
        assert_eq!(fields[1].choices().len(), 1);
        assert_eq!(fields[2].field_type(), FieldType::Text);
        assert_eq!(fields[2].title(), "No type");
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = Form::from_json(r#"{"fields": [{"type": "rating"}]}"#).unwrap_err();
        assert!(matches!(err, FormError::Json(_)));
    }

    #[test]
    fn serialization_round_trip() {
        let form = Form::new();
        form.set_name("Feedback");
        form.set_description("Tell us what you think");
        form.add_field_of_type(FieldType::Section);
        let choice = form.add_field_of_type(FieldType::Select);
        choice.set_randomized(Some(true));
        choice.add_choice();
        choice.set_choice_text(3, "Fourth Choice");

        let json = form.to_json().unwrap();
        let restored = Form::from_json(&json).unwrap();
        assert_eq!(restored.to_data(), form.to_data());
        assert_ne!(restored, form);
    }

    #[test]
    fn serialized_form_has_only_domain_keys() {
        let form = Form::new();
        form.add_field_of_type(FieldType::Checkbox);
        let value = serde_json::to_value(form.to_data()).unwrap();

        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["description", "fields", "name"]);
        assert_eq!(value["fields"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn tracked_data_follows_nested_changes() {
        let form = Form::new();
        let field = form.add_field_of_type(FieldType::Text);
        let data = {
            let form = form.clone();
            Computed::new(move |cx| form.track_data(cx))
        };
        assert_eq!(data.get().fields[0].title, "Untitled");

        field.set_title("Email address");
        assert!(data.is_dirty());
        assert_eq!(data.get().fields[0].title, "Email address");

        field.set_required(true);
        assert!(data.get().fields[0].is_required);

        form.set_name("Contact");
        assert_eq!(data.get().name, "Contact");
    }
}
