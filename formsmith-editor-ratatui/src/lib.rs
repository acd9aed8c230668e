//! # formsmith-editor-ratatui
//!
//! Terminal front end for formsmith.
//!
//! The screen shows a tab strip (add a field, field settings, form settings),
//! a side panel for the current tab and the form canvas with a preview of
//! every field. Fields are selected with the mouse or `j`/`k` and reordered by
//! dragging them on the canvas.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use formsmith::{Editor, Form};
//! use formsmith_editor_ratatui::RatatuiEditor;
//!
//! fn main() -> anyhow::Result<()> {
//!     let editor = Editor::new(Form::new());
//!     let data = RatatuiEditor::new().with_title("Signup form").run(&editor)?;
//!     println!("{} fields", data.fields.len());
//!     Ok(())
//! }
//! ```

mod draw;
mod editor;
mod state;
mod templates;

pub use editor::{RatatuiEditor, RatatuiEditorError, Theme};
pub use templates::{Template, Templates};
