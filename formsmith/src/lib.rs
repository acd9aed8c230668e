//! # formsmith
//!
//! State model of an interactive form builder. Presentation-agnostic.
//!
//! A [`Form`] holds an ordered list of [`Field`]s. The [`Editor`] owns one form
//! and tracks which tab is shown and which field is selected. Every piece of
//! state is observable, so a front end can derive what it displays from
//! [`Computed`](reactive::Computed) values that stay current on their own.
//!
//! ## Usage
//!
//! ```rust
//! use formsmith::{Editor, FieldType, Form, Tab};
//!
//! let editor = Editor::new(Form::new());
//! let email = editor.add_field_of_type(FieldType::Email);
//! editor.add_field_of_type(FieldType::Checkbox);
//!
//! editor.select_field(&email);
//! assert_eq!(editor.current_tab(), Tab::FieldSettings);
//!
//! editor.select_next_field();
//! assert_eq!(editor.selected_field_index(), Some(1));
//!
//! let data = editor.form_data();
//! assert_eq!(data.fields[1].title, "Check all that apply");
//! ```
//!
//! ## Keyboard commands
//!
//! Shortcuts are attached explicitly by the composing layer, see
//! [`attach_shortcuts`] and [`Keymap::standard`].
//!
//! ## Reordering
//!
//! [`SortableList`] keeps the field order in sync with a host that reorders
//! rendered nodes on its own, such as a drag-and-drop widget. Hosts implement
//! [`SortableHost`]; [`MemoryHost`] is an in-memory host for tests and
//! terminal front ends.
//!
//! ## Front ends
//!
//! - `formsmith-editor-ratatui` - terminal editor via ratatui

// Re-export all types from formsmith-types
pub use formsmith_types::*;

mod editor;
pub use editor::{Editor, EditorConfig, FIRST_FIELD_TITLE, Tab};

mod keymap;
pub use keymap::{Command, Key, Keymap, Shortcuts, attach_shortcuts};

mod sortable;
pub use sortable::{Reorder, SortError, SortableHost, SortableList};

// In-memory host for reordering without a real widget
mod memory_host;
pub use memory_host::{HostNode, MemoryHost};
