use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::FieldType;
use crate::reactive::{Computed, Observable, ObservableList, Tracker};

/// Title of a field that was given none.
pub const DEFAULT_FIELD_TITLE: &str = "Untitled";

/// Prefix of the preview template name, followed by the field type.
pub const PREVIEW_TEMPLATE_PREFIX: &str = "tmp-field-preview-";

/// Prefix of the settings template name, followed by the field type.
pub const SETTINGS_TEMPLATE_PREFIX: &str = "tmp-field-settings-";

/// One entry of a choice list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub choice: String,
}

impl Choice {
    pub fn new(choice: impl Into<String>) -> Self {
        Self {
            choice: choice.into(),
        }
    }
}

/// A partial set of field attributes.
///
/// Used to create fields: every attribute left as `None` keeps its default.
/// Deserializes leniently, so raw records with missing keys are accepted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldPatch {
    #[serde(rename = "type")]
    pub field_type: Option<FieldType>,
    pub title: Option<String>,
    pub is_required: Option<bool>,
    pub instructions: Option<String>,
    pub choices: Option<Vec<Choice>>,
    pub is_randomized: Option<bool>,
}

impl FieldPatch {
    /// A patch that only sets the type.
    pub fn of_type(field_type: FieldType) -> Self {
        Self {
            field_type: Some(field_type),
            ..Default::default()
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the instructions.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Set the choices.
    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = Some(choices.into_iter().map(Choice::new).collect());
        self
    }

    /// Set whether the field is required.
    pub fn required(mut self, is_required: bool) -> Self {
        self.is_required = Some(is_required);
        self
    }
}

impl From<FieldData> for FieldPatch {
    fn from(data: FieldData) -> Self {
        Self {
            field_type: Some(data.field_type),
            title: Some(data.title),
            is_required: Some(data.is_required),
            instructions: Some(data.instructions),
            choices: Some(data.choices),
            is_randomized: data.is_randomized,
        }
    }
}

/// The serialized form of a field: exactly its six public attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldData {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub title: String,
    pub is_required: bool,
    pub instructions: String,
    pub choices: Vec<Choice>,
    pub is_randomized: Option<bool>,
}

/// Attribute overrides applied to a field added with the given type.
///
/// Only consulted when a field is added to a form by type; fields hydrated
/// from stored data keep exactly what the data says.
pub fn defaults_for_type(field_type: FieldType) -> FieldPatch {
    const STARTER_CHOICES: [&str; 3] = ["First Choice", "Second Choice", "Third Choice"];

    match field_type {
        FieldType::Number => FieldPatch::default().with_title("Number"),
        FieldType::Checkbox => FieldPatch::default()
            .with_title("Check all that apply")
            .with_choices(STARTER_CHOICES),
        FieldType::Radio | FieldType::Select => FieldPatch::default()
            .with_title("Select a Choice")
            .with_choices(STARTER_CHOICES),
        FieldType::Section => FieldPatch::default()
            .with_title("Section Break")
            .with_instructions("A description of the section goes here."),
        FieldType::Shortname => FieldPatch::default().with_title("Name"),
        FieldType::Phone => FieldPatch::default().with_title("Phone"),
        FieldType::Text
        | FieldType::Textarea
        | FieldType::Page
        | FieldType::File
        | FieldType::Address
        | FieldType::Date
        | FieldType::Email
        | FieldType::Time
        | FieldType::Url
        | FieldType::Money
        | FieldType::Likert => FieldPatch::default(),
    }
}

struct FieldInner {
    field_type: Observable<FieldType>,
    title: Observable<String>,
    is_required: Observable<bool>,
    instructions: Observable<String>,
    choices: ObservableList<Choice>,
    is_randomized: Observable<Option<bool>>,
    has_choices: Computed<bool>,
    preview_template_name: Computed<String>,
    settings_template_name: Computed<String>,
}

/// One question or element of a form.
///
/// `Field` is a handle: clones refer to the same field, and `==` compares
/// identity, not attributes. Compare [`Field::to_data`] snapshots to check
/// whether two fields hold the same attributes.
#[derive(Clone)]
pub struct Field {
    inner: Rc<FieldInner>,
}

impl Field {
    /// Create a field from defaults, overlaid with every attribute the patch
    /// provides. A patch without a type yields a text field.
    pub fn new(patch: FieldPatch) -> Self {
        let field_type = Observable::new(patch.field_type.unwrap_or_default());
        let choices = ObservableList::from_vec(patch.choices.unwrap_or_default());

        let has_choices = {
            let choices = choices.clone();
            Computed::new(move |cx| choices.track_len(cx) != 0)
        };
        let preview_template_name = {
            let field_type = field_type.clone();
            Computed::new(move |cx| format!("{PREVIEW_TEMPLATE_PREFIX}{}", field_type.track(cx)))
        };
        let settings_template_name = {
            let field_type = field_type.clone();
            Computed::new(move |cx| format!("{SETTINGS_TEMPLATE_PREFIX}{}", field_type.track(cx)))
        };

        Self {
            inner: Rc::new(FieldInner {
                field_type,
                title: Observable::new(
                    patch
                        .title
                        .unwrap_or_else(|| DEFAULT_FIELD_TITLE.to_string()),
                ),
                is_required: Observable::new(patch.is_required.unwrap_or(false)),
                instructions: Observable::new(patch.instructions.unwrap_or_default()),
                choices,
                is_randomized: Observable::new(patch.is_randomized),
                has_choices,
                preview_template_name,
                settings_template_name,
            }),
        }
    }

    /// Create a field of the given type with that type's default attributes.
    pub fn for_type(field_type: FieldType) -> Self {
        let mut patch = defaults_for_type(field_type);
        patch.field_type = Some(field_type);
        Self::new(patch)
    }

    pub fn field_type(&self) -> FieldType {
        self.inner.field_type.get()
    }

    pub fn title(&self) -> String {
        self.inner.title.get()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.inner.title.set(title.into());
    }

    pub fn is_required(&self) -> bool {
        self.inner.is_required.get()
    }

    pub fn set_required(&self, is_required: bool) {
        self.inner.is_required.set(is_required);
    }

    pub fn instructions(&self) -> String {
        self.inner.instructions.get()
    }

    pub fn set_instructions(&self, instructions: impl Into<String>) {
        self.inner.instructions.set(instructions.into());
    }

    pub fn is_randomized(&self) -> Option<bool> {
        self.inner.is_randomized.get()
    }

    pub fn set_randomized(&self, is_randomized: Option<bool>) {
        self.inner.is_randomized.set(is_randomized);
    }

    /// Snapshot of the choice list.
    pub fn choices(&self) -> Vec<Choice> {
        self.inner.choices.to_vec()
    }

    /// Append an empty choice.
    pub fn add_choice(&self) {
        self.inner.choices.push(Choice::default());
    }

    /// Remove the first choice equal to `choice`. Returns whether one was
    /// removed.
    pub fn remove_choice(&self, choice: &Choice) -> bool {
        self.inner.choices.remove_item(choice)
    }

    /// Remove and return the choice at `index`.
    pub fn remove_choice_at(&self, index: usize) -> Option<Choice> {
        self.inner.choices.remove_at(index)
    }

    /// Change the text of the choice at `index`. Returns false if there is no
    /// such choice.
    pub fn set_choice_text(&self, index: usize, text: impl Into<String>) -> bool {
        self.inner.choices.replace_at(index, Choice::new(text))
    }

    /// Check if the field has at least one choice.
    pub fn has_choices(&self) -> bool {
        self.inner.has_choices.get()
    }

    /// Name of the template that previews this field in the form canvas.
    pub fn preview_template_name(&self) -> String {
        self.inner.preview_template_name.get()
    }

    /// Name of the template that edits this field's settings.
    pub fn settings_template_name(&self) -> String {
        self.inner.settings_template_name.get()
    }

    /// Serialize the current attributes.
    pub fn to_data(&self) -> FieldData {
        self.track_data(&Tracker::untracked())
    }

    /// Serialize the current attributes, recording every one of them as a
    /// dependency of `cx`.
    pub fn track_data(&self, cx: &Tracker) -> FieldData {
        FieldData {
            field_type: self.inner.field_type.track(cx),
            title: self.inner.title.track(cx),
            is_required: self.inner.is_required.track(cx),
            instructions: self.inner.instructions.track(cx),
            choices: self.inner.choices.track(cx),
            is_randomized: self.inner.is_randomized.track(cx),
        }
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new(FieldPatch::default())
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Field {}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("type", &self.field_type())
            .field("title", &self.inner.title.get())
            .field("choices", &self.inner.choices.len())
            .finish_non_exhaustive()
    }
}
