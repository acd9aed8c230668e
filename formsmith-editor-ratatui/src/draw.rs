//! Rendering of the editor screen.

use formsmith::{Editor, Field, FieldType, Tab};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Wrap,
    },
};

use crate::state::{Row, ViewState, content_height, row_top};
use crate::{RatatuiEditor, Theme};

/// Width of the side panel.
const PANEL_WIDTH: u16 = 40;

pub(crate) fn draw_editor(
    frame: &mut Frame,
    app: &RatatuiEditor,
    editor: &Editor,
    view: &mut ViewState,
) {
    let theme = app.theme();
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    let [title_area, tabs_area, body_area, help_area] = Layout::vertical([
        Constraint::Length(2), // Title
        Constraint::Length(3), // Tab strip
        Constraint::Min(5),    // Panel and canvas
        Constraint::Length(1), // Help bar
    ])
    .areas(area);
    let [panel_area, canvas_area] =
        Layout::horizontal([Constraint::Length(PANEL_WIDTH), Constraint::Min(20)])
            .areas(body_area);

    draw_title(frame, app, editor, title_area);
    draw_tabs(frame, theme, editor, view, tabs_area);
    draw_panel(frame, app, editor, view, panel_area);
    draw_canvas(frame, app, editor, view, canvas_area);
    draw_help(frame, theme, editor, view, help_area);
}

fn draw_title(frame: &mut Frame, app: &RatatuiEditor, editor: &Editor, area: Rect) {
    let theme = app.theme();
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            app.title().to_string(),
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", editor.form().name()),
            Style::default().fg(theme.text),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(theme.border)),
    );
    frame.render_widget(title, area);
}

fn draw_tabs(
    frame: &mut Frame,
    theme: &Theme,
    editor: &Editor,
    view: &mut ViewState,
    area: Rect,
) {
    let areas: [Rect; 3] = Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(area);
    let current = editor.current_tab();
    view.regions.tabs.clear();

    for (tab, tab_area) in Tab::ALL.into_iter().zip(areas) {
        let selected = tab == current;
        let style = if selected {
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        let widget = Paragraph::new(tab.title())
            .style(style)
            .alignment(Alignment::Center)
            .block(
                Block::bordered().border_style(Style::default().fg(if selected {
                    theme.primary
                } else {
                    theme.border
                })),
            );
        frame.render_widget(widget, tab_area);
        view.regions.tabs.push((tab_area, tab));
    }
}

/// Palette label of a field type.
pub(crate) fn palette_label(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Text => "Single line text",
        FieldType::Number => "Number",
        FieldType::Textarea => "Paragraph text",
        FieldType::Checkbox => "Checkboxes",
        FieldType::Radio => "Multiple choice",
        FieldType::Select => "Dropdown",
        FieldType::Section => "Section break",
        FieldType::Page => "Page break",
        FieldType::Shortname => "Name",
        FieldType::File => "File upload",
        FieldType::Address => "Address",
        FieldType::Date => "Date",
        FieldType::Email => "Email",
        FieldType::Time => "Time",
        FieldType::Phone => "Phone",
        FieldType::Url => "Website",
        FieldType::Money => "Price",
        FieldType::Likert => "Likert scale",
    }
}

fn hint(text: &str, theme: &Theme) -> Line<'static> {
    Line::styled(text.to_string(), Style::default().fg(theme.border))
}

fn field_hints(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::default(),
        hint("t title  i instructions", theme),
        hint("r required  d duplicate  del remove", theme),
    ];
    if field.field_type().is_choice() {
        lines.push(hint("c add choice  e edit last choice", theme));
        lines.push(hint("x remove last choice  m shuffle", theme));
    }
    lines
}

fn draw_panel(
    frame: &mut Frame,
    app: &RatatuiEditor,
    editor: &Editor,
    view: &ViewState,
    area: Rect,
) {
    let theme = app.theme();
    let tab = editor.current_tab();
    let block = Block::bordered()
        .title(format!(" {} ", tab.title()))
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (content_area, input_area) = if view.input.is_some() {
        let [content, input] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(3)]).areas(inner);
        (content, Some(input))
    } else {
        (inner, None)
    };

    match tab {
        Tab::AddField => {
            let items: Vec<ListItem> = FieldType::ALL
                .into_iter()
                .map(|field_type| {
                    ListItem::new(palette_label(field_type)).style(Style::default().fg(theme.text))
                })
                .collect();
            let list = List::new(items)
                .highlight_style(
                    Style::default()
                        .fg(theme.text)
                        .bg(theme.selected_bg)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("+ ");
            let mut state = ListState::default().with_selected(Some(view.palette_index));
            frame.render_stateful_widget(list, content_area, &mut state);
        }
        Tab::FieldSettings => {
            let lines = match editor.selected_field() {
                Some(field) => {
                    let mut lines = app.templates().settings(&field, theme);
                    lines.extend(field_hints(&field, theme));
                    lines
                }
                None => vec![hint("Select a field on the canvas to edit it.", theme)],
            };
            frame.render_widget(
                Paragraph::new(lines).wrap(Wrap { trim: false }),
                content_area,
            );
        }
        Tab::FormSettings => {
            let label = Style::default().fg(theme.border);
            let value = Style::default().fg(theme.text);
            let lines = vec![
                Line::from(vec![
                    Span::styled("Name         ", label),
                    Span::styled(editor.form().name(), value),
                ]),
                Line::from(vec![
                    Span::styled("Description  ", label),
                    Span::styled(editor.form().description(), value),
                ]),
                Line::default(),
                hint("t name  i description", theme),
            ];
            frame.render_widget(
                Paragraph::new(lines).wrap(Wrap { trim: false }),
                content_area,
            );
        }
    }

    if let (Some(input), Some(input_area)) = (&view.input, input_area) {
        let block = Block::bordered()
            .title(format!(" {} ", input.target.label()))
            .border_style(Style::default().fg(theme.primary));
        let text_area = block.inner(input_area);
        frame.render_widget(
            Paragraph::new(input.buffer.clone())
                .style(Style::default().fg(theme.text))
                .block(block),
            input_area,
        );
        let typed = u16::try_from(input.buffer.chars().count()).unwrap_or(u16::MAX);
        let cursor_x = text_area.x.saturating_add(typed);
        if cursor_x < text_area.right() {
            frame.set_cursor_position((cursor_x, text_area.y));
        }
    }
}

fn draw_canvas(
    frame: &mut Frame,
    app: &RatatuiEditor,
    editor: &Editor,
    view: &mut ViewState,
    area: Rect,
) {
    let theme = app.theme();
    let block = Block::bordered()
        .title(format!(" {} ", editor.form().name()))
        .border_style(Style::default().fg(theme.border));
    let mut inner = block.inner(area);
    frame.render_widget(block, area);
    view.regions.rows.clear();

    let description = editor.form().description();
    if !description.is_empty() && inner.height > 2 {
        let description_area = Rect { height: 1, ..inner };
        frame.render_widget(
            Paragraph::new(description).style(
                Style::default()
                    .fg(theme.border)
                    .add_modifier(Modifier::ITALIC),
            ),
            description_area,
        );
        inner.y += 2;
        inner.height -= 2;
    }

    let fields = view.canvas_fields();
    if fields.is_empty() {
        let empty = Paragraph::new(vec![
            Line::styled(
                "No fields yet.",
                Style::default()
                    .fg(theme.text)
                    .add_modifier(Modifier::BOLD),
            ),
            hint("Press n to create your first field,", theme),
            hint("or pick a type in the Add a Field tab.", theme),
        ])
        .wrap(Wrap { trim: false });
        frame.render_widget(empty, inner);
        return;
    }

    let templates = app.templates();
    let previews: Vec<Vec<Line<'static>>> = fields
        .iter()
        .map(|(_, field)| templates.preview(field, theme))
        .collect();
    // Two lines of border around each preview.
    let heights: Vec<u16> = previews
        .iter()
        .map(|lines| u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2))
        .collect();
    let selected = editor.selected_field();
    let focus = fields
        .iter()
        .position(|(_, field)| Some(field) == selected.as_ref());
    let viewport_height = inner.height;
    view.adjust_scroll(&heights, focus, viewport_height);

    let scroll_offset = view.scroll_offset;
    let content_width = inner.width.saturating_sub(1); // Leave room for the scrollbar
    let dragged = view.drag.map(|drag| drag.node);

    for (position, ((node, _), lines)) in fields.iter().zip(previews).enumerate() {
        let top = row_top(&heights, position);
        let height = heights[position];
        if top.saturating_add(height) <= scroll_offset {
            continue;
        }
        if top >= scroll_offset.saturating_add(viewport_height) {
            break;
        }
        // Rows cut off at the top look broken; skip them like the rows above.
        if top < scroll_offset {
            continue;
        }

        let visible_top = top - scroll_offset;
        let row_area = Rect {
            x: inner.x,
            y: inner.y + visible_top,
            width: content_width,
            height: height.min(viewport_height - visible_top),
        };

        let is_dragged = dragged == Some(*node);
        let is_selected = focus == Some(position);
        let border = if is_dragged {
            theme.highlight
        } else if is_selected {
            theme.primary
        } else {
            theme.border
        };
        let mut block = Block::bordered()
            .title(format!(" {} ", position + 1))
            .border_style(Style::default().fg(border));
        if is_dragged {
            block = block.style(Style::default().bg(theme.selected_bg));
        }
        frame.render_widget(Paragraph::new(lines).block(block), row_area);
        view.regions.rows.push(Row {
            area: row_area,
            node: *node,
            position,
        });
    }

    let total_height = content_height(&heights);
    if total_height > viewport_height {
        let scrollbar_area = Rect {
            x: inner.x + inner.width.saturating_sub(1),
            y: inner.y,
            width: 1,
            height: viewport_height,
        };

        let mut scrollbar_state = ScrollbarState::new(total_height as usize)
            .position(scroll_offset as usize)
            .viewport_content_length(viewport_height as usize);

        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"))
            .track_symbol(Some("│"))
            .thumb_symbol("█");

        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }
}

fn draw_help(frame: &mut Frame, theme: &Theme, editor: &Editor, view: &ViewState, area: Rect) {
    let help = if let Some(status) = &view.status {
        Paragraph::new(status.clone()).style(Style::default().fg(theme.success))
    } else {
        let text = if view.input.is_some() {
            "Enter: Save  Esc: Cancel"
        } else {
            match editor.current_tab() {
                Tab::AddField => "↑/↓: Pick type  Enter: Add  Tab: Next tab  j/k: Select field  Esc: Quit",
                Tab::FieldSettings => "j/k: Select field  Del: Remove  Drag: Reorder  f: Form settings  Esc: Quit",
                Tab::FormSettings => "Tab: Next tab  j/k: Select field  Esc: Quit",
            }
        };
        Paragraph::new(text).style(Style::default().fg(theme.border))
    };
    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Flow;
    use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use formsmith::{Form, attach_shortcuts};
    use ratatui::{Terminal, backend::TestBackend};

    fn render(app: &RatatuiEditor, editor: &Editor, view: &mut ViewState) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(110, 40)).unwrap();
        view.sync_host();
        terminal
            .draw(|frame| draw_editor(frame, app, editor, view))
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect()
            })
            .collect()
    }

    fn screen_contains(screen: &[String], text: &str) -> bool {
        screen.iter().any(|line| line.contains(text))
    }

    fn mouse(kind: MouseEventKind, area: Rect) -> MouseEvent {
        MouseEvent {
            kind,
            column: area.x + 2,
            row: area.y + 1,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn empty_form_invites_the_first_field() {
        let app = RatatuiEditor::new();
        let editor = Editor::default();
        let mut view = ViewState::new(&editor);
        let screen = render(&app, &editor, &mut view);

        assert!(screen_contains(&screen, "Form Builder"));
        assert!(screen_contains(&screen, "Add a Field"));
        assert!(screen_contains(&screen, "No fields yet."));
        assert!(screen_contains(&screen, "Single line text"));
    }

    #[test]
    fn canvas_previews_fields_in_order() {
        let app = RatatuiEditor::new();
        let editor = Editor::default();
        editor.add_field_of_type(FieldType::Checkbox);
        editor.add_field_of_type(FieldType::Email).set_title("Your email");
        let mut view = ViewState::new(&editor);
        let screen = render(&app, &editor, &mut view);

        assert!(screen_contains(&screen, "[ ] Second Choice"));
        assert!(screen_contains(&screen, "Your email"));
        assert_eq!(view.regions.rows.len(), 2);
        assert!(view.regions.rows[0].area.y < view.regions.rows[1].area.y);
    }

    #[test]
    fn field_settings_show_the_selected_field() {
        let app = RatatuiEditor::new();
        let editor = Editor::default();
        let field = editor.add_field_of_type(FieldType::Radio);
        editor.select_field(&field);
        let mut view = ViewState::new(&editor);
        let screen = render(&app, &editor, &mut view);

        assert!(screen_contains(&screen, "Field Settings"));
        assert!(screen_contains(&screen, "Select a Choice"));
        assert!(screen_contains(&screen, "Randomized"));
    }

    #[test]
    fn clicking_a_tab_selects_it() {
        let app = RatatuiEditor::new();
        let editor = Editor::default();
        let mut view = ViewState::new(&editor);
        render(&app, &editor, &mut view);

        let (area, _) = view.regions.tabs[2];
        view.handle_mouse(&editor, mouse(MouseEventKind::Down(MouseButton::Left), area));
        assert_eq!(editor.current_tab(), Tab::FormSettings);
    }

    #[test]
    fn dragging_a_row_reorders_the_form() {
        let app = RatatuiEditor::new();
        let editor = Editor::default();
        for title in ["A", "B", "C", "D"] {
            editor.add_field_of_type(FieldType::Text).set_title(title);
        }
        let mut view = ViewState::new(&editor);
        render(&app, &editor, &mut view);

        let source = view.regions.rows[2].area;
        let target = view.regions.rows[0].area;
        view.handle_mouse(&editor, mouse(MouseEventKind::Down(MouseButton::Left), source));
        assert_eq!(editor.selected_field_index(), Some(2));
        assert!(view.drag.is_some());

        view.handle_mouse(&editor, mouse(MouseEventKind::Drag(MouseButton::Left), target));
        let order: Vec<String> = view
            .canvas_fields()
            .iter()
            .map(|(_, field)| field.title())
            .collect();
        assert_eq!(order, vec!["C", "A", "B", "D"]);
        let titles: Vec<String> = editor.form().fields().iter().map(Field::title).collect();
        assert_eq!(titles, vec!["A", "B", "C", "D"]);

        let flow = view.handle_mouse(&editor, mouse(MouseEventKind::Up(MouseButton::Left), target));
        assert_eq!(flow, Flow::Continue);
        let titles: Vec<String> = editor.form().fields().iter().map(Field::title).collect();
        assert_eq!(titles, vec!["C", "A", "B", "D"]);
        assert_eq!(editor.selected_field_index(), Some(0));
        assert!(view.drag.is_none());
        assert_eq!(view.status.as_deref(), Some("Moved field 3 to position 1"));
    }

    #[test]
    fn adding_scrolls_to_the_new_field() {
        let app = RatatuiEditor::new();
        let editor = Editor::new(Form::new());
        let mut view = ViewState::new(&editor);
        let shortcuts = attach_shortcuts(&editor);
        let enter = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Enter,
            KeyModifiers::NONE,
        );
        for _ in 0..12 {
            view.handle_key(&editor, &shortcuts, enter);
        }
        let screen = render(&app, &editor, &mut view);

        assert!(view.scroll_offset > 0);
        assert!(screen_contains(&screen, " 12 "));
        assert!(!view.scroll_to_last);
    }

    #[test]
    fn very_long_input_is_clipped() {
        let app = RatatuiEditor::new();
        let editor = Editor::default();
        let field = editor.add_field_of_type(FieldType::Text);
        field.set_title("x".repeat(70_000));
        editor.select_field(&field);
        let shortcuts = attach_shortcuts(&editor);
        let mut view = ViewState::new(&editor);
        let t = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('t'),
            KeyModifiers::NONE,
        );
        view.handle_key(&editor, &shortcuts, t);

        let screen = render(&app, &editor, &mut view);
        assert!(view.input.is_some());
        assert!(screen_contains(&screen, " Title "));
    }
}
