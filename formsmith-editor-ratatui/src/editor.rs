//! Terminal front end for the form builder.
//!
//! Draws the editor with a tab strip, a side panel and the form canvas, and
//! feeds key presses and mouse drags back into it.

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use formsmith::{Editor, FormData, FormError, Keymap, Shortcuts, attach_shortcuts};
use ratatui::{Terminal, prelude::CrosstermBackend, style::Color};
use std::io::{self, Stdout};
use thiserror::Error;

use crate::draw::draw_editor;
use crate::state::{Flow, ViewState};
use crate::templates::Templates;

/// Error type for the terminal editor.
#[derive(Debug, Error)]
pub enum RatatuiEditorError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal setup/restore error.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// The edited form could not be serialized.
    #[error("Form error: {0}")]
    Form(#[from] FormError),
}

/// Color theme for the editor.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub background: Color,
    pub text: Color,
    pub highlight: Color,
    pub error: Color,
    pub success: Color,
    pub border: Color,
    pub selected_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Cyan,
            secondary: Color::Blue,
            background: Color::Reset,
            text: Color::White,
            highlight: Color::Yellow,
            error: Color::Red,
            success: Color::Green,
            border: Color::Gray,
            selected_bg: Color::DarkGray,
        }
    }
}

/// Terminal editor for a [`Editor`].
#[derive(Debug, Clone)]
pub struct RatatuiEditor {
    /// Title shown at the top of the screen.
    title: String,
    /// Color theme for the UI.
    theme: Theme,
    /// Shortcuts attached to the editor while it runs.
    keymap: Keymap,
    /// How fields are previewed and edited.
    templates: Templates,
}

impl Default for RatatuiEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl RatatuiEditor {
    /// Create a new terminal editor with default settings.
    pub fn new() -> Self {
        Self {
            title: "Form Builder".to_string(),
            theme: Theme::default(),
            keymap: Keymap::standard(),
            templates: Templates::new(),
        }
    }

    /// Set the title shown at the top of the screen.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set a custom color theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Replace the keyboard shortcuts.
    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Replace the preview and settings templates.
    pub fn with_templates(mut self, templates: Templates) -> Self {
        self.templates = templates;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    /// Attach the configured shortcuts to `editor`.
    fn shortcuts<'a>(&self, editor: &'a Editor) -> Shortcuts<'a> {
        attach_shortcuts(editor).with_keymap(self.keymap.clone())
    }

    /// Edit interactively until the user quits, then return the form.
    pub fn run(&self, editor: &Editor) -> Result<FormData, RatatuiEditorError> {
        let mut terminal = self.setup_terminal()?;
        let result = self.event_loop(&mut terminal, editor);
        self.restore_terminal(&mut terminal)?;
        result?;
        Ok(editor.form_data())
    }

    /// Like [`RatatuiEditor::run`], returning the form as JSON.
    pub fn run_to_json(&self, editor: &Editor) -> Result<String, RatatuiEditorError> {
        self.run(editor)?;
        Ok(editor.form_json()?)
    }

    fn event_loop(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        editor: &Editor,
    ) -> Result<(), RatatuiEditorError> {
        let shortcuts = self.shortcuts(editor);
        let mut view = ViewState::new(editor);
        tracing::debug!(fields = editor.form().len(), "editor started");

        loop {
            view.sync_host();
            terminal.draw(|frame| draw_editor(frame, self, editor, &mut view))?;

            let flow = match event::read()? {
                Event::Key(key) => view.handle_key(editor, &shortcuts, key),
                Event::Mouse(mouse) => view.handle_mouse(editor, mouse),
                _ => Flow::Continue,
            };
            if flow == Flow::Exit {
                break;
            }
        }

        tracing::debug!(fields = editor.form().len(), "editor closed");
        Ok(())
    }

    fn setup_terminal(&self) -> Result<Terminal<CrosstermBackend<Stdout>>, RatatuiEditorError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend).map_err(|err| RatatuiEditorError::Terminal(err.to_string()))
    }

    fn restore_terminal(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<(), RatatuiEditorError> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        Ok(())
    }
}
