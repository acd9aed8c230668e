//! The editor controller: which tab is shown, which field is selected, and
//! how form mutations keep both consistent.

use formsmith_types::reactive::{Computed, Observable};
use formsmith_types::{Field, FieldPatch, FieldType, Form, FormData, FormError};

use crate::keymap::Command;
use crate::sortable::SortableList;

/// Title given to the field created by [`Editor::create_first_field`].
pub const FIRST_FIELD_TITLE: &str = "This is my first field, yeay!";

/// One of the three mutually exclusive editor views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    /// Palette of field types to add.
    #[default]
    AddField,
    /// Settings of the selected field.
    FieldSettings,
    /// Name and description of the form.
    FormSettings,
}

impl Tab {
    /// All tabs, in display order.
    pub const ALL: [Tab; 3] = [Self::AddField, Self::FieldSettings, Self::FormSettings];

    /// Position of the tab in the tab strip.
    pub fn index(self) -> usize {
        match self {
            Self::AddField => 0,
            Self::FieldSettings => 1,
            Self::FormSettings => 2,
        }
    }

    /// The tab at `index` in the tab strip.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Label shown in the tab strip.
    pub fn title(self) -> &'static str {
        match self {
            Self::AddField => "Add a Field",
            Self::FieldSettings => "Field Settings",
            Self::FormSettings => "Form Settings",
        }
    }

    /// The tab to the right, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// The tab to the left, wrapping around.
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Configuration for an [`Editor`].
#[derive(Debug, Clone)]
pub struct EditorConfig {
    first_field_title: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self {
            first_field_title: FIRST_FIELD_TITLE.to_string(),
        }
    }

    /// Set the title of the field created by [`Editor::create_first_field`].
    pub fn with_first_field_title(mut self, title: impl Into<String>) -> Self {
        self.first_field_title = title.into();
        self
    }

    pub fn first_field_title(&self) -> &str {
        &self.first_field_title
    }
}

/// The editing session for one form.
///
/// Owns the form, the current tab and the selected field. The selection and
/// the tab are derived from the form, so they stay consistent even when the
/// form is changed through another handle: a selected field that leaves the
/// form is no longer selected, and emptying the form while its field settings
/// are shown brings back the add-field tab.
///
/// Shortcuts are not wired up on construction; the composing layer attaches
/// them with [`attach_shortcuts`](crate::attach_shortcuts).
pub struct Editor {
    form: Form,
    requested_tab: Observable<Tab>,
    tab_had_fields: Observable<bool>,
    selection: Observable<Option<Field>>,
    current_tab: Computed<Tab>,
    selected_field: Computed<Option<Field>>,
    form_settings_selected: Computed<bool>,
    selected_field_index: Computed<Option<usize>>,
    form_data: Computed<FormData>,
    config: EditorConfig,
}

impl Editor {
    /// Start editing `form` with the default configuration.
    pub fn new(form: Form) -> Self {
        Self::with_config(form, EditorConfig::default())
    }

    /// Start editing `form`.
    pub fn with_config(form: Form, config: EditorConfig) -> Self {
        let requested_tab = Observable::new(Tab::AddField);
        let tab_had_fields = Observable::new(form.has_fields());
        let selection: Observable<Option<Field>> = Observable::new(None);

        let current_tab = {
            let form = form.clone();
            let requested_tab = requested_tab.clone();
            let tab_had_fields = tab_had_fields.clone();
            Computed::new(move |cx| {
                let tab = requested_tab.track(cx);
                let emptied = tab_had_fields.track(cx) && !form.track_has_fields(cx);
                if tab == Tab::FieldSettings && emptied {
                    Tab::AddField
                } else {
                    tab
                }
            })
        };
        let selected_field = {
            let form = form.clone();
            let selection = selection.clone();
            Computed::new(move |cx| {
                selection
                    .track(cx)
                    .filter(|field| form.track_position_of(cx, field).is_some())
            })
        };
        let form_settings_selected = {
            let current_tab = current_tab.clone();
            Computed::new(move |cx| current_tab.track(cx) == Tab::FormSettings)
        };
        let selected_field_index = {
            let form = form.clone();
            let selection = selection.clone();
            Computed::new(move |cx| {
                selection
                    .track(cx)
                    .and_then(|field| form.track_position_of(cx, &field))
            })
        };
        let form_data = {
            let form = form.clone();
            Computed::new(move |cx| form.track_data(cx))
        };

        Self {
            form,
            requested_tab,
            tab_had_fields,
            selection,
            current_tab,
            selected_field,
            form_settings_selected,
            selected_field_index,
            form_data,
            config,
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn current_tab(&self) -> Tab {
        self.current_tab.get()
    }

    /// The selected field. Always a field of the form, or `None`.
    pub fn selected_field(&self) -> Option<Field> {
        self.selected_field.get()
    }

    /// Check if the form settings tab is shown.
    pub fn form_settings_selected(&self) -> bool {
        self.form_settings_selected.get()
    }

    /// Position of the selected field in the form, `None` without selection.
    pub fn selected_field_index(&self) -> Option<usize> {
        self.selected_field_index.get()
    }

    /// The serialized form, kept current with every change to the form.
    pub fn form_data(&self) -> FormData {
        self.form_data.get()
    }

    /// [`Editor::form_data`] as a JSON string.
    pub fn form_json(&self) -> Result<String, FormError> {
        self.form_data
            .with(|data| serde_json::to_string(data).map_err(FormError::from))
    }

    /// A reorder synchronizer over this form's fields.
    pub fn sortable_fields<N>(&self) -> SortableList<Field, N>
    where
        N: Clone + Eq + std::hash::Hash,
    {
        SortableList::over(self.form.field_order())
    }

    /// Show `tab`. The selection is left alone.
    pub fn select_tab(&self, tab: Tab) {
        let changed = self.requested_tab.set(tab);
        self.tab_had_fields.set(self.form.has_fields());
        if changed {
            tracing::debug!(?tab, "tab changed");
        }
    }

    /// Make the shown tab the requested one, so that a fallback taken after
    /// the form was emptied sticks once fields come back.
    fn settle_tab(&self) {
        let shown = self.current_tab();
        if shown != self.requested_tab.get() {
            self.select_tab(shown);
        }
    }

    /// Show the form settings tab.
    pub fn show_form_settings(&self) {
        self.select_tab(Tab::FormSettings);
    }

    /// Show the add-field tab.
    pub fn show_add_field(&self) {
        self.select_tab(Tab::AddField);
    }

    /// Select `field` and show its settings.
    ///
    /// Fields that are not part of the form cannot be selected; the call is
    /// then a no-op returning false.
    pub fn select_field(&self, field: &Field) -> bool {
        if self.form.position_of(field).is_none() {
            tracing::debug!("ignoring selection of a field outside the form");
            return false;
        }
        self.selection.set(Some(field.clone()));
        self.select_tab(Tab::FieldSettings);
        true
    }

    /// Select the field at `index`. Out-of-range indices are ignored.
    pub fn select_field_at_index(&self, index: usize) -> bool {
        match self.form.field_at(index) {
            Some(field) => self.select_field(&field),
            None => false,
        }
    }

    /// Select the field after the selected one, or the first field when
    /// nothing is selected.
    pub fn select_next_field(&self) -> bool {
        let next = self.selected_field_index().map_or(0, |index| index + 1);
        self.select_field_at_index(next)
    }

    /// Select the field before the selected one. Does nothing on the first
    /// field or without selection.
    pub fn select_prev_field(&self) -> bool {
        match self.selected_field_index() {
            Some(index) if index > 0 => self.select_field_at_index(index - 1),
            _ => false,
        }
    }

    /// Append a field of the type named in `patch`. The new field is not
    /// selected.
    pub fn add_field(&self, patch: FieldPatch) -> Result<Field, FormError> {
        self.settle_tab();
        let field = self.form.add_field(patch)?;
        self.tab_had_fields.set(true);
        Ok(field)
    }

    /// Append a field of `field_type`. The new field is not selected.
    pub fn add_field_of_type(&self, field_type: FieldType) -> Field {
        self.settle_tab();
        let field = self.form.add_field_of_type(field_type);
        self.tab_had_fields.set(true);
        field
    }

    /// Duplicate `field` and select the copy. The tab is left alone.
    pub fn duplicate_field(&self, field: &Field) -> Result<Field, FormError> {
        let copy = self.form.duplicate_field(field)?;
        self.selection.set(Some(copy.clone()));
        Ok(copy)
    }

    /// Remove `field`, clearing the selection if it was selected.
    ///
    /// When this empties the form while its field settings are shown, the
    /// editor falls back to the add-field tab.
    pub fn remove_field(&self, field: &Field) -> bool {
        if self
            .selection
            .with(|selected| selected.as_ref() == Some(field))
        {
            self.selection.set(None);
        }
        let removed = self.form.remove_field(field);
        self.settle_tab();
        removed
    }

    /// Remove the selected field, if any.
    pub fn remove_selected_field(&self) -> bool {
        match self.selected_field() {
            Some(field) => self.remove_field(&field),
            None => false,
        }
    }

    /// Add a multi-line text field with a welcome title and select it.
    pub fn create_first_field(&self) -> Field {
        let field = self.add_field_of_type(FieldType::Textarea);
        field.set_title(self.config.first_field_title());
        self.select_field(&field);
        field
    }

    /// Run a keyboard command.
    pub fn execute(&self, command: Command) -> bool {
        tracing::debug!(?command, "executing command");
        match command {
            Command::RemoveSelectedField => self.remove_selected_field(),
            Command::SelectNextField => self.select_next_field(),
            Command::SelectPrevField => self.select_prev_field(),
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Form::new())
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("form", &self.form)
            .field("current_tab", &self.current_tab())
            .field("selected_field_index", &self.selected_field_index.get())
            .finish_non_exhaustive()
    }
}
