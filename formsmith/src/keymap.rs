//! Keyboard shortcuts of the editor.

use std::collections::HashMap;

use crate::Editor;

/// A key as reported by the front end, independent of any terminal or
/// windowing library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Backspace,
    Delete,
    Char(char),
}

/// An editor action that can be bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Remove the selected field.
    RemoveSelectedField,
    /// Select the field after the selected one.
    SelectNextField,
    /// Select the field before the selected one.
    SelectPrevField,
}

/// Maps keys to editor commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    bindings: HashMap<Key, Command>,
}

impl Keymap {
    /// A keymap without any bindings.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// The default bindings:
    ///
    /// | Key       | Command               |
    /// |-----------|-----------------------|
    /// | Backspace | `RemoveSelectedField` |
    /// | Delete    | `RemoveSelectedField` |
    /// | `j`       | `SelectNextField`     |
    /// | `k`       | `SelectPrevField`     |
    pub fn standard() -> Self {
        Self::empty()
            .bind(Key::Backspace, Command::RemoveSelectedField)
            .bind(Key::Delete, Command::RemoveSelectedField)
            .bind(Key::Char('j'), Command::SelectNextField)
            .bind(Key::Char('k'), Command::SelectPrevField)
    }

    /// Bind `key` to `command`, replacing any previous binding of `key`.
    pub fn bind(mut self, key: Key, command: Command) -> Self {
        self.bindings.insert(key, command);
        self
    }

    /// Remove the binding of `key`.
    pub fn unbind(mut self, key: Key) -> Self {
        self.bindings.remove(&key);
        self
    }

    pub fn command_for(&self, key: Key) -> Option<Command> {
        self.bindings.get(&key).copied()
    }

    /// Run the command bound to `key` on `editor`.
    ///
    /// Returns the command that ran, or `None` if the key is unbound.
    pub fn dispatch(&self, editor: &Editor, key: Key) -> Option<Command> {
        let command = self.command_for(key)?;
        editor.execute(command);
        Some(command)
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::standard()
    }
}

/// Keyboard shortcuts attached to an editor.
#[derive(Debug)]
pub struct Shortcuts<'a> {
    editor: &'a Editor,
    keymap: Keymap,
}

/// Attach the standard shortcuts to `editor`.
///
/// The editor does not listen to keys on its own; the front end feeds key
/// presses to the returned [`Shortcuts`].
pub fn attach_shortcuts(editor: &Editor) -> Shortcuts<'_> {
    Shortcuts {
        editor,
        keymap: Keymap::standard(),
    }
}

impl<'a> Shortcuts<'a> {
    /// Replace the keymap.
    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    /// Handle a key press. Returns the command that ran, if any.
    pub fn handle(&self, key: Key) -> Option<Command> {
        self.keymap.dispatch(self.editor, key)
    }
}
