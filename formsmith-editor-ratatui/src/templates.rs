//! Preview and settings templates, looked up by a field's template names.

use std::collections::HashMap;

use formsmith::{Field, FieldType, PREVIEW_TEMPLATE_PREFIX, SETTINGS_TEMPLATE_PREFIX};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::Theme;

/// Renders a field into lines of text.
pub type Template = fn(&Field, &Theme) -> Vec<Line<'static>>;

/// Templates keyed by template name.
///
/// Fields name the templates they want through
/// [`Field::preview_template_name`] and [`Field::settings_template_name`].
/// Names without a registered template fall back to a generic one.
#[derive(Debug, Clone)]
pub struct Templates {
    previews: HashMap<String, Template>,
    settings: HashMap<String, Template>,
}

impl Default for Templates {
    fn default() -> Self {
        Self::new()
    }
}

impl Templates {
    /// The built-in templates for every field type.
    pub fn new() -> Self {
        let mut templates = Self::empty();
        for field_type in FieldType::ALL {
            templates = templates
                .with_preview(
                    format!("{PREVIEW_TEMPLATE_PREFIX}{field_type}"),
                    preview_for(field_type),
                )
                .with_settings(
                    format!("{SETTINGS_TEMPLATE_PREFIX}{field_type}"),
                    settings_for(field_type),
                );
        }
        templates
    }

    /// No templates; every field renders with the fallbacks.
    pub fn empty() -> Self {
        Self {
            previews: HashMap::new(),
            settings: HashMap::new(),
        }
    }

    /// Register a preview template under `name`.
    pub fn with_preview(mut self, name: impl Into<String>, template: Template) -> Self {
        self.previews.insert(name.into(), template);
        self
    }

    /// Register a settings template under `name`.
    pub fn with_settings(mut self, name: impl Into<String>, template: Template) -> Self {
        self.settings.insert(name.into(), template);
        self
    }

    /// Render the canvas preview of `field`.
    pub fn preview(&self, field: &Field, theme: &Theme) -> Vec<Line<'static>> {
        let name = field.preview_template_name();
        let template = self.previews.get(&name).copied().unwrap_or_else(|| {
            tracing::trace!(%name, "no preview template, using fallback");
            generic_preview as Template
        });
        template(field, theme)
    }

    /// Render the settings panel of `field`.
    pub fn settings(&self, field: &Field, theme: &Theme) -> Vec<Line<'static>> {
        let name = field.settings_template_name();
        let template = self.settings.get(&name).copied().unwrap_or_else(|| {
            tracing::trace!(%name, "no settings template, using fallback");
            generic_settings as Template
        });
        template(field, theme)
    }
}

fn preview_for(field_type: FieldType) -> Template {
    match field_type {
        FieldType::Text => text_preview,
        FieldType::Number => number_preview,
        FieldType::Textarea => textarea_preview,
        FieldType::Checkbox => checkbox_preview,
        FieldType::Radio => radio_preview,
        FieldType::Select => select_preview,
        FieldType::Section => section_preview,
        FieldType::Page => page_preview,
        FieldType::Shortname => shortname_preview,
        FieldType::File => file_preview,
        FieldType::Address => address_preview,
        FieldType::Date => date_preview,
        FieldType::Email => email_preview,
        FieldType::Time => time_preview,
        FieldType::Phone => phone_preview,
        FieldType::Url => url_preview,
        FieldType::Money => money_preview,
        FieldType::Likert => likert_preview,
    }
}

fn settings_for(field_type: FieldType) -> Template {
    if field_type.is_choice() {
        choice_settings
    } else if field_type.is_layout() {
        layout_settings
    } else {
        input_settings
    }
}

fn heading(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    let mut title = vec![Span::styled(
        field.title(),
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    )];
    if field.is_required() {
        title.push(Span::styled(" *", Style::default().fg(theme.error)));
    }
    let mut lines = vec![Line::from(title)];
    let instructions = field.instructions();
    if !instructions.is_empty() {
        lines.push(Line::styled(
            instructions,
            Style::default()
                .fg(theme.border)
                .add_modifier(Modifier::ITALIC),
        ));
    }
    lines
}

fn input(hint: &str, theme: &Theme) -> Line<'static> {
    Line::styled(
        format!("[ {hint:<24} ]"),
        Style::default().fg(theme.secondary),
    )
}

fn with_input(field: &Field, theme: &Theme, hint: &str) -> Vec<Line<'static>> {
    let mut lines = heading(field, theme);
    lines.push(input(hint, theme));
    lines
}

fn generic_preview(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = heading(field, theme);
    lines.push(Line::styled(
        format!("<{}>", field.field_type()),
        Style::default().fg(theme.border),
    ));
    lines
}

fn text_preview(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    with_input(field, theme, "")
}

fn number_preview(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    with_input(field, theme, "0")
}

fn date_preview(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    with_input(field, theme, "YYYY-MM-DD")
}

fn email_preview(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    with_input(field, theme, "name@example.com")
}

fn time_preview(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    with_input(field, theme, "HH:MM")
}

fn phone_preview(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    with_input(field, theme, "+1 555 0100")
}

fn url_preview(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    with_input(field, theme, "https://")
}

fn money_preview(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    with_input(field, theme, "$ 0.00")
}

fn file_preview(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = heading(field, theme);
    lines.push(Line::styled(
        "[ Choose file... ]",
        Style::default().fg(theme.primary),
    ));
    lines
}

fn textarea_preview(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = heading(field, theme);
    let style = Style::default().fg(theme.secondary);
    lines.push(Line::styled(format!("┌{}┐", "─".repeat(26)), style));
    lines.push(Line::styled(format!("│{}│", " ".repeat(26)), style));
    lines.push(Line::styled(format!("└{}┘", "─".repeat(26)), style));
    lines
}

fn shortname_preview(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = heading(field, theme);
    let style = Style::default().fg(theme.secondary);
    lines.push(Line::from(vec![
        Span::styled("[ First        ]", style),
        Span::raw(" "),
        Span::styled("[ Last         ]", style),
    ]));
    lines
}

fn address_preview(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = heading(field, theme);
    lines.push(input("Street address", theme));
    lines.push(input("City", theme));
    lines.push(input("Postal code", theme));
    lines
}

fn choice_lines(field: &Field, theme: &Theme, marker: &str) -> Vec<Line<'static>> {
    let mut lines = heading(field, theme);
    for choice in field.choices() {
        lines.push(Line::styled(
            format!("{marker} {}", choice.choice),
            Style::default().fg(theme.text),
        ));
    }
    lines
}

fn checkbox_preview(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    choice_lines(field, theme, "[ ]")
}

fn radio_preview(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    choice_lines(field, theme, "( )")
}

fn select_preview(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = heading(field, theme);
    let first = field
        .choices()
        .into_iter()
        .next()
        .map(|choice| choice.choice)
        .unwrap_or_default();
    lines.push(Line::styled(
        format!("[ {first:<22} ▾ ]"),
        Style::default().fg(theme.secondary),
    ));
    lines
}

fn section_preview(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![Line::styled(
        field.title(),
        Style::default()
            .fg(theme.primary)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )];
    let instructions = field.instructions();
    if !instructions.is_empty() {
        lines.push(Line::styled(instructions, Style::default().fg(theme.text)));
    }
    lines
}

fn page_preview(_field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    vec![Line::styled(
        "──────── Page break ────────",
        Style::default().fg(theme.border),
    )]
}

fn likert_preview(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = heading(field, theme);
    lines.push(Line::styled(
        "Strongly disagree  ( ) ( ) ( ) ( ) ( )  Strongly agree",
        Style::default().fg(theme.text),
    ));
    lines
}

fn setting(label: &str, value: String, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<13}"), Style::default().fg(theme.border)),
        Span::styled(value, Style::default().fg(theme.text)),
    ])
}

fn checkmark(on: bool) -> String {
    if on { "[✓]".to_string() } else { "[ ]".to_string() }
}

fn common_settings(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    vec![
        setting("Type", field.field_type().to_string(), theme),
        setting("Title", field.title(), theme),
        setting("Instructions", field.instructions(), theme),
    ]
}

fn generic_settings(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    common_settings(field, theme)
}

fn input_settings(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = common_settings(field, theme);
    lines.push(setting("Required", checkmark(field.is_required()), theme));
    lines
}

fn layout_settings(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    common_settings(field, theme)
}

fn choice_settings(field: &Field, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = input_settings(field, theme);
    let randomized = match field.is_randomized() {
        Some(on) => checkmark(on),
        None => "-".to_string(),
    };
    lines.push(setting("Randomized", randomized, theme));
    lines.push(Line::styled("Choices", Style::default().fg(theme.border)));
    for (index, choice) in field.choices().into_iter().enumerate() {
        lines.push(Line::styled(
            format!("  {}. {}", index + 1, choice.choice),
            Style::default().fg(theme.text),
        ));
    }
    lines
}

/// Flatten rendered lines into plain text, for assertions.
#[cfg(test)]
pub(crate) fn plain(lines: &[Line<'_>]) -> Vec<String> {
    lines
        .iter()
        .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect())
        .collect()
}
