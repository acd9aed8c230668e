//! View state of the terminal editor and the translation of terminal events
//! into editor operations.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use formsmith::{
    Command, Editor, Field, FieldType, HostNode, Key, MemoryHost, Shortcuts, SortableList, Tab,
};
use ratatui::layout::{Position, Rect};

/// Whether the event loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Exit,
}

/// What a text input writes to when committed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum InputTarget {
    FieldTitle(Field),
    FieldInstructions(Field),
    ChoiceText(Field, usize),
    FormName,
    FormDescription,
}

impl InputTarget {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::FieldTitle(_) => "Title",
            Self::FieldInstructions(_) => "Instructions",
            Self::ChoiceText(..) => "Choice",
            Self::FormName => "Name",
            Self::FormDescription => "Description",
        }
    }
}

/// A line of text being typed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextInput {
    pub(crate) target: InputTarget,
    pub(crate) buffer: String,
}

/// A field row being dragged on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Drag {
    pub(crate) node: HostNode,
    /// Element position the row currently sits at.
    pub(crate) position: usize,
}

/// A field row as drawn on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Row {
    pub(crate) area: Rect,
    pub(crate) node: HostNode,
    pub(crate) position: usize,
}

/// Screen regions recorded by the last draw, for mouse hit testing.
#[derive(Debug, Clone, Default)]
pub(crate) struct Regions {
    pub(crate) tabs: Vec<(Rect, Tab)>,
    pub(crate) rows: Vec<Row>,
}

/// Extra vertical space between field rows.
pub(crate) const ROW_SPACING: u16 = 1;

/// Lines scrolled per mouse wheel step.
const WHEEL_STEP: u16 = 3;

pub(crate) struct ViewState {
    /// Highlighted entry of the add-field palette.
    pub(crate) palette_index: usize,
    /// First canvas line shown.
    pub(crate) scroll_offset: u16,
    /// Scroll to the end of the canvas on the next draw.
    pub(crate) scroll_to_last: bool,
    /// Canvas row that was focused on the last draw.
    last_focus: Option<usize>,
    pub(crate) input: Option<TextInput>,
    /// One-line feedback shown in the help bar.
    pub(crate) status: Option<String>,
    pub(crate) sortable: SortableList<Field, HostNode>,
    pub(crate) host: MemoryHost,
    pub(crate) drag: Option<Drag>,
    pub(crate) regions: Regions,
}

impl ViewState {
    pub(crate) fn new(editor: &Editor) -> Self {
        let mut state = Self {
            palette_index: 0,
            scroll_offset: 0,
            scroll_to_last: false,
            last_focus: None,
            input: None,
            status: None,
            sortable: editor.sortable_fields(),
            host: MemoryHost::new(),
            drag: None,
            regions: Regions::default(),
        };
        state.sync_host();
        state
    }

    /// Rebuild the canvas nodes from the field list, unless a drag is in
    /// progress.
    pub(crate) fn sync_host(&mut self) {
        if self.drag.is_none() {
            self.host.render(&mut self.sortable);
        }
    }

    /// Fields in the order the canvas currently shows them.
    pub(crate) fn canvas_fields(&self) -> Vec<(HostNode, Field)> {
        self.host
            .elements()
            .into_iter()
            .filter_map(|node| {
                self.sortable
                    .item_for(&node)
                    .map(|field| (node, field.clone()))
            })
            .collect()
    }

    pub(crate) fn handle_key(
        &mut self,
        editor: &Editor,
        shortcuts: &Shortcuts<'_>,
        key: KeyEvent,
    ) -> Flow {
        if key.kind != KeyEventKind::Press {
            return Flow::Continue;
        }
        if self.input.is_some() {
            self.handle_input_key(editor, key.code);
            return Flow::Continue;
        }
        self.status = None;

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Flow::Exit;
            }
            KeyCode::Esc => return Flow::Exit,
            KeyCode::Tab => editor.select_tab(editor.current_tab().next()),
            KeyCode::BackTab => editor.select_tab(editor.current_tab().prev()),
            code => {
                let handled = match editor.current_tab() {
                    Tab::AddField => self.palette_key(editor, code),
                    Tab::FieldSettings => self.field_settings_key(editor, code),
                    Tab::FormSettings => self.form_settings_key(editor, code),
                };
                if !handled {
                    self.global_key(editor, shortcuts, code);
                }
            }
        }
        Flow::Continue
    }

    fn palette_key(&mut self, editor: &Editor, code: KeyCode) -> bool {
        match code {
            KeyCode::Up => self.palette_index = self.palette_index.saturating_sub(1),
            KeyCode::Down => {
                self.palette_index = (self.palette_index + 1).min(FieldType::ALL.len() - 1);
            }
            KeyCode::Enter => {
                if let Some(field_type) = FieldType::ALL.get(self.palette_index) {
                    editor.add_field_of_type(*field_type);
                    self.scroll_to_last = true;
                }
            }
            _ => return false,
        }
        true
    }

    fn field_settings_key(&mut self, editor: &Editor, code: KeyCode) -> bool {
        let Some(field) = editor.selected_field() else {
            return false;
        };
        match code {
            KeyCode::Char('r') => field.set_required(!field.is_required()),
            KeyCode::Char('c') => field.add_choice(),
            KeyCode::Char('x') => {
                let choices = field.choices().len();
                if choices > 0 {
                    field.remove_choice_at(choices - 1);
                }
            }
            KeyCode::Char('e') => {
                let choices = field.choices();
                if let Some(last) = choices.last() {
                    self.begin_input(
                        InputTarget::ChoiceText(field.clone(), choices.len() - 1),
                        last.choice.clone(),
                    );
                }
            }
            KeyCode::Char('m') if field.field_type().is_choice() => {
                field.set_randomized(Some(!field.is_randomized().unwrap_or(false)));
            }
            KeyCode::Char('d') => {
                if let Err(err) = editor.duplicate_field(&field) {
                    self.status = Some(err.to_string());
                }
            }
            KeyCode::Char('t') => {
                self.begin_input(InputTarget::FieldTitle(field.clone()), field.title());
            }
            KeyCode::Char('i') => {
                let current = field.instructions();
                self.begin_input(InputTarget::FieldInstructions(field.clone()), current);
            }
            _ => return false,
        }
        true
    }

    fn form_settings_key(&mut self, editor: &Editor, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('t') => self.begin_input(InputTarget::FormName, editor.form().name()),
            KeyCode::Char('i') => {
                self.begin_input(InputTarget::FormDescription, editor.form().description());
            }
            _ => return false,
        }
        true
    }

    fn global_key(&mut self, editor: &Editor, shortcuts: &Shortcuts<'_>, code: KeyCode) {
        match code {
            KeyCode::Char('f') => editor.show_form_settings(),
            KeyCode::Char('n') if !editor.form().has_fields() => {
                editor.create_first_field();
                self.scroll_to_last = true;
            }
            KeyCode::Up => {
                editor.execute(Command::SelectPrevField);
            }
            KeyCode::Down => {
                editor.execute(Command::SelectNextField);
            }
            code => {
                if let Some(key) = shortcut_key(code) {
                    shortcuts.handle(key);
                }
            }
        }
    }

    fn begin_input(&mut self, target: InputTarget, current: String) {
        self.input = Some(TextInput {
            target,
            buffer: current,
        });
    }

    fn handle_input_key(&mut self, editor: &Editor, code: KeyCode) {
        let Some(input) = self.input.as_mut() else {
            return;
        };
        match code {
            KeyCode::Char(ch) => input.buffer.push(ch),
            KeyCode::Backspace => {
                input.buffer.pop();
            }
            KeyCode::Esc => self.input = None,
            KeyCode::Enter => {
                if let Some(input) = self.input.take() {
                    commit(editor, input);
                }
            }
            _ => {}
        }
    }

    pub(crate) fn handle_mouse(&mut self, editor: &Editor, mouse: MouseEvent) -> Flow {
        if self.input.is_some() {
            return Flow::Continue;
        }
        let at = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(tab) = self.tab_at(at) {
                    editor.select_tab(tab);
                } else if let Some(row) = self.row_at(at) {
                    if let Some(field) = self.sortable.item_for(&row.node) {
                        editor.select_field(field);
                    }
                    self.sortable.begin_drag(&self.host);
                    self.drag = Some(Drag {
                        node: row.node,
                        position: row.position,
                    });
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let target = self.row_at(at).map(|row| row.position);
                if let (Some(drag), Some(target)) = (self.drag.as_mut(), target)
                    && target != drag.position
                    && self.host.move_element(drag.position, target)
                {
                    drag.position = target;
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(drag) = self.drag.take() {
                    match self.sortable.drop_item(&mut self.host, &drag.node) {
                        Ok(reorder) if !reorder.is_noop() => {
                            self.status = Some(format!(
                                "Moved field {} to position {}",
                                reorder.from + 1,
                                reorder.to + 1
                            ));
                        }
                        Ok(_) => {}
                        Err(err) => self.status = Some(err.to_string()),
                    }
                    self.sync_host();
                }
            }
            MouseEventKind::ScrollDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(WHEEL_STEP);
            }
            MouseEventKind::ScrollUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(WHEEL_STEP);
            }
            _ => {}
        }
        Flow::Continue
    }

    fn tab_at(&self, at: Position) -> Option<Tab> {
        self.regions
            .tabs
            .iter()
            .find(|(area, _)| area.contains(at))
            .map(|(_, tab)| *tab)
    }

    fn row_at(&self, at: Position) -> Option<Row> {
        self.regions
            .rows
            .iter()
            .find(|row| row.area.contains(at))
            .copied()
    }

    /// Scroll the canvas so that a newly focused row is fully visible.
    ///
    /// `heights` are the row heights in canvas order, without spacing.
    pub(crate) fn adjust_scroll(&mut self, heights: &[u16], focus: Option<usize>, viewport: u16) {
        let total = content_height(heights);
        let focus_changed = focus != self.last_focus;
        self.last_focus = focus;
        if self.scroll_to_last {
            self.scroll_to_last = false;
            self.scroll_offset = total.saturating_sub(viewport);
            return;
        }

        if let Some(focus) = focus.filter(|focus| focus_changed && *focus < heights.len()) {
            let top = row_top(heights, focus);
            let bottom = top.saturating_add(heights[focus]);
            if top < self.scroll_offset {
                self.scroll_offset = top;
            }
            if bottom > self.scroll_offset.saturating_add(viewport) {
                self.scroll_offset = bottom.saturating_sub(viewport);
            }
        }
        self.scroll_offset = self.scroll_offset.min(total.saturating_sub(viewport));
    }
}

/// Canvas line where row `index` starts.
pub(crate) fn row_top(heights: &[u16], index: usize) -> u16 {
    heights
        .iter()
        .take(index)
        .fold(0, |top: u16, height| {
            top.saturating_add(*height).saturating_add(ROW_SPACING)
        })
}

/// Total canvas height of the rows.
pub(crate) fn content_height(heights: &[u16]) -> u16 {
    row_top(heights, heights.len()).saturating_sub(ROW_SPACING)
}

fn commit(editor: &Editor, input: TextInput) {
    let TextInput { target, buffer } = input;
    tracing::debug!(target = target.label(), "text input committed");
    match target {
        InputTarget::FieldTitle(field) => field.set_title(buffer),
        InputTarget::FieldInstructions(field) => field.set_instructions(buffer),
        InputTarget::ChoiceText(field, index) => {
            field.set_choice_text(index, buffer);
        }
        InputTarget::FormName => editor.form().set_name(buffer),
        InputTarget::FormDescription => editor.form().set_description(buffer),
    }
}

fn shortcut_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Delete => Some(Key::Delete),
        KeyCode::Char(ch) => Some(Key::Char(ch)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formsmith::{Keymap, attach_shortcuts};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(view: &mut ViewState, editor: &Editor, shortcuts: &Shortcuts<'_>, text: &str) {
        for ch in text.chars() {
            view.handle_key(editor, shortcuts, press(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn escape_and_ctrl_c_exit() {
        let editor = Editor::default();
        let shortcuts = attach_shortcuts(&editor);
        let mut view = ViewState::new(&editor);

        assert_eq!(view.handle_key(&editor, &shortcuts, press(KeyCode::Esc)), Flow::Exit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(view.handle_key(&editor, &shortcuts, ctrl_c), Flow::Exit);
        assert_eq!(
            view.handle_key(&editor, &shortcuts, press(KeyCode::Char('q'))),
            Flow::Continue
        );
    }

    #[test]
    fn tab_keys_cycle() {
        let editor = Editor::default();
        let shortcuts = attach_shortcuts(&editor);
        let mut view = ViewState::new(&editor);

        view.handle_key(&editor, &shortcuts, press(KeyCode::Tab));
        assert_eq!(editor.current_tab(), Tab::FieldSettings);
        view.handle_key(&editor, &shortcuts, press(KeyCode::BackTab));
        view.handle_key(&editor, &shortcuts, press(KeyCode::BackTab));
        assert_eq!(editor.current_tab(), Tab::FormSettings);
    }

    #[test]
    fn palette_adds_the_highlighted_type() {
        let editor = Editor::default();
        let shortcuts = attach_shortcuts(&editor);
        let mut view = ViewState::new(&editor);

        view.handle_key(&editor, &shortcuts, press(KeyCode::Up));
        assert_eq!(view.palette_index, 0);
        for _ in 0..3 {
            view.handle_key(&editor, &shortcuts, press(KeyCode::Down));
        }
        view.handle_key(&editor, &shortcuts, press(KeyCode::Enter));

        let fields = editor.form().fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field_type(), FieldType::Checkbox);
        assert_eq!(editor.selected_field(), None);
        assert!(view.scroll_to_last);

        for _ in 0..40 {
            view.handle_key(&editor, &shortcuts, press(KeyCode::Down));
        }
        assert_eq!(view.palette_index, FieldType::ALL.len() - 1);
    }

    #[test]
    fn first_field_on_empty_form() {
        let editor = Editor::default();
        let shortcuts = attach_shortcuts(&editor);
        let mut view = ViewState::new(&editor);

        view.handle_key(&editor, &shortcuts, press(KeyCode::Char('n')));
        assert_eq!(editor.form().len(), 1);
        assert_eq!(editor.current_tab(), Tab::FieldSettings);

        editor.show_add_field();
        view.handle_key(&editor, &shortcuts, press(KeyCode::Char('n')));
        assert_eq!(editor.form().len(), 1);
    }

    #[test]
    fn field_settings_keys() {
        let editor = Editor::default();
        let field = editor.add_field_of_type(FieldType::Radio);
        editor.select_field(&field);
        let shortcuts = attach_shortcuts(&editor);
        let mut view = ViewState::new(&editor);

        view.handle_key(&editor, &shortcuts, press(KeyCode::Char('r')));
        assert!(field.is_required());

        view.handle_key(&editor, &shortcuts, press(KeyCode::Char('c')));
        assert_eq!(field.choices().len(), 4);
        view.handle_key(&editor, &shortcuts, press(KeyCode::Char('x')));
        view.handle_key(&editor, &shortcuts, press(KeyCode::Char('x')));
        assert_eq!(field.choices().len(), 2);

        view.handle_key(&editor, &shortcuts, press(KeyCode::Char('m')));
        assert_eq!(field.is_randomized(), Some(true));

        view.handle_key(&editor, &shortcuts, press(KeyCode::Char('d')));
        assert_eq!(editor.form().len(), 2);
        assert_eq!(editor.selected_field_index(), Some(1));

        view.handle_key(&editor, &shortcuts, press(KeyCode::Delete));
        assert_eq!(editor.form().fields(), vec![field]);
        assert_eq!(editor.selected_field(), None);
    }

    #[test]
    fn editing_a_title() {
        let editor = Editor::default();
        let field = editor.add_field_of_type(FieldType::Text);
        editor.select_field(&field);
        let shortcuts = attach_shortcuts(&editor);
        let mut view = ViewState::new(&editor);

        view.handle_key(&editor, &shortcuts, press(KeyCode::Char('t')));
        for _ in 0.."Untitled".len() {
            view.handle_key(&editor, &shortcuts, press(KeyCode::Backspace));
        }
        type_text(&mut view, &editor, &shortcuts, "jk");
        assert_eq!(editor.selected_field_index(), Some(0));
        view.handle_key(&editor, &shortcuts, press(KeyCode::Enter));

        assert_eq!(field.title(), "jk");
        assert!(view.input.is_none());
        assert_eq!(editor.form().len(), 1);
    }

    #[test]
    fn cancelled_input_changes_nothing() {
        let editor = Editor::default();
        editor.show_form_settings();
        let shortcuts = attach_shortcuts(&editor);
        let mut view = ViewState::new(&editor);

        view.handle_key(&editor, &shortcuts, press(KeyCode::Char('t')));
        type_text(&mut view, &editor, &shortcuts, " form");
        assert_eq!(
            view.input.as_ref().map(|input| input.buffer.as_str()),
            Some("Untitled form")
        );
        assert_eq!(view.handle_key(&editor, &shortcuts, press(KeyCode::Esc)), Flow::Continue);
        assert_eq!(editor.form().name(), "Untitled");

        view.handle_key(&editor, &shortcuts, press(KeyCode::Char('i')));
        type_text(&mut view, &editor, &shortcuts, "Hello");
        view.handle_key(&editor, &shortcuts, press(KeyCode::Enter));
        assert_eq!(editor.form().description(), "Hello");
    }

    #[test]
    fn custom_keymap_is_used() {
        let editor = Editor::default();
        editor.add_field_of_type(FieldType::Text);
        let keymap = Keymap::empty().bind(Key::Char('s'), Command::SelectNextField);
        let shortcuts = attach_shortcuts(&editor).with_keymap(keymap);
        let mut view = ViewState::new(&editor);

        view.handle_key(&editor, &shortcuts, press(KeyCode::Char('j')));
        assert_eq!(editor.selected_field_index(), None);
        view.handle_key(&editor, &shortcuts, press(KeyCode::Char('s')));
        assert_eq!(editor.selected_field_index(), Some(0));
    }

    #[test]
    fn scroll_follows_a_new_focus_only() {
        let editor = Editor::default();
        let mut view = ViewState::new(&editor);
        let heights = [4, 4, 4, 4, 4];

        view.adjust_scroll(&heights, Some(4), 10);
        assert_eq!(view.scroll_offset, 14);

        view.scroll_offset = 0;
        view.adjust_scroll(&heights, Some(4), 10);
        assert_eq!(view.scroll_offset, 0);

        view.adjust_scroll(&heights, Some(2), 10);
        assert_eq!(view.scroll_offset, 4);
    }

    #[test]
    fn row_offsets_saturate() {
        let heights = [u16::MAX; 3];
        assert_eq!(row_top(&heights, 3), u16::MAX);
        assert_eq!(content_height(&heights), u16::MAX - ROW_SPACING);

        let editor = Editor::default();
        let mut view = ViewState::new(&editor);
        view.adjust_scroll(&heights, Some(2), 10);
        assert_eq!(view.scroll_offset, u16::MAX - ROW_SPACING - 10);
    }
}
