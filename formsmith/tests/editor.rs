//! Editor behavior across form mutations.

use formsmith::{
    Command, Editor, Field, FieldPatch, FieldType, Form, FormData, Key, Tab, attach_shortcuts,
};

fn editor_with_abc() -> (Editor, Field, Field, Field) {
    let editor = Editor::new(Form::new());
    let a = editor.add_field_of_type(FieldType::Text);
    let b = editor.add_field_of_type(FieldType::Radio);
    let c = editor.add_field_of_type(FieldType::Email);
    a.set_title("A");
    b.set_title("B");
    c.set_title("C");
    (editor, a, b, c)
}

#[test]
fn checkbox_gets_its_defaults() -> anyhow::Result<()> {
    let editor = Editor::default();
    let field = editor.add_field(FieldPatch::of_type(FieldType::Checkbox))?;

    assert_eq!(field.title(), "Check all that apply");
    let choices: Vec<String> = field.choices().into_iter().map(|c| c.choice).collect();
    assert_eq!(
        choices,
        vec!["First Choice", "Second Choice", "Third Choice"]
    );
    Ok(())
}

#[test]
fn duplicate_selects_the_copy() -> anyhow::Result<()> {
    let (editor, a, b, c) = editor_with_abc();
    b.set_instructions("Pick one");
    editor.select_field(&a);

    let copy = editor.duplicate_field(&b)?;

    assert_eq!(
        editor.form().fields(),
        vec![a.clone(), b.clone(), copy.clone(), c]
    );
    assert_ne!(copy, b);
    assert_eq!(copy.to_data(), b.to_data());
    assert_eq!(editor.selected_field(), Some(copy));
    assert_eq!(editor.selected_field_index(), Some(2));
    assert_eq!(editor.current_tab(), Tab::FieldSettings);
    Ok(())
}

#[test]
fn duplicate_keeps_the_current_tab() -> anyhow::Result<()> {
    let (editor, a, _, _) = editor_with_abc();
    editor.show_form_settings();
    let copy = editor.duplicate_field(&a)?;
    assert_eq!(editor.current_tab(), Tab::FormSettings);
    assert_eq!(editor.selected_field(), Some(copy));
    Ok(())
}

#[test]
fn removing_the_selected_field_clears_the_selection() {
    let (editor, a, b, _) = editor_with_abc();
    editor.select_field(&b);
    assert!(editor.remove_field(&b));

    assert_eq!(editor.selected_field(), None);
    assert_eq!(editor.selected_field_index(), None);
    assert_eq!(editor.form().len(), 2);
    assert_eq!(editor.current_tab(), Tab::FieldSettings);

    editor.select_field(&a);
    assert_eq!(editor.selected_field_index(), Some(0));
}

#[test]
fn removing_another_field_keeps_the_selection() {
    let (editor, a, _, c) = editor_with_abc();
    editor.select_field(&c);
    editor.remove_field(&a);

    assert_eq!(editor.selected_field(), Some(c));
    assert_eq!(editor.selected_field_index(), Some(1));
}

#[test]
fn emptying_the_form_falls_back_to_add_field() {
    let editor = Editor::default();
    let only = editor.add_field_of_type(FieldType::Page);
    editor.select_field(&only);
    assert_eq!(editor.current_tab(), Tab::FieldSettings);

    assert!(editor.remove_selected_field());
    assert_eq!(editor.selected_field(), None);
    assert_eq!(editor.current_tab(), Tab::AddField);
    assert!(!editor.form().has_fields());
}

#[test]
fn emptying_the_form_keeps_form_settings() {
    let editor = Editor::default();
    let only = editor.add_field_of_type(FieldType::Page);
    editor.show_form_settings();
    editor.remove_field(&only);
    assert_eq!(editor.current_tab(), Tab::FormSettings);
}

#[test]
fn removing_through_the_form_clears_the_selection() {
    let editor = Editor::default();
    let only = editor.add_field_of_type(FieldType::Text);
    editor.select_field(&only);

    assert!(editor.form().remove_field(&only));

    assert_eq!(editor.selected_field(), None);
    assert_eq!(editor.selected_field_index(), None);
    assert_eq!(editor.current_tab(), Tab::AddField);
    assert!(!editor.remove_selected_field());
}

#[test]
fn removing_through_a_shared_form_handle() {
    let form = Form::new();
    let editor = Editor::new(form.clone());
    let (a, b) = (
        form.add_field_of_type(FieldType::Text),
        form.add_field_of_type(FieldType::Email),
    );
    editor.select_field(&b);

    form.remove_field(&b);
    assert_eq!(editor.selected_field(), None);
    assert_eq!(editor.current_tab(), Tab::FieldSettings);

    assert!(editor.select_next_field());
    assert_eq!(editor.selected_field(), Some(a));
}

#[test]
fn fallback_tab_sticks_when_fields_come_back() {
    let editor = Editor::default();
    let only = editor.add_field_of_type(FieldType::Text);
    editor.select_field(&only);
    editor.form().remove_field(&only);
    assert_eq!(editor.current_tab(), Tab::AddField);

    editor.add_field_of_type(FieldType::Email);
    assert_eq!(editor.current_tab(), Tab::AddField);
    assert_eq!(editor.selected_field(), None);
}

#[test]
fn field_settings_can_be_shown_for_an_empty_form() {
    let editor = Editor::default();
    editor.select_tab(Tab::FieldSettings);
    assert_eq!(editor.current_tab(), Tab::FieldSettings);
    assert_eq!(editor.current_tab().next(), Tab::FormSettings);
}

#[test]
fn removing_without_selection_is_a_noop() {
    let (editor, _, _, _) = editor_with_abc();
    assert!(!editor.remove_selected_field());
    assert_eq!(editor.form().len(), 3);
    assert!(!editor.execute(Command::RemoveSelectedField));
}

#[test]
fn navigation_stops_at_the_ends() {
    let (editor, a, b, c) = editor_with_abc();

    editor.select_field(&a);
    assert!(!editor.select_prev_field());
    assert_eq!(editor.selected_field(), Some(a.clone()));

    assert!(editor.select_next_field());
    assert_eq!(editor.selected_field(), Some(b));
    assert!(editor.select_next_field());
    assert_eq!(editor.selected_field(), Some(c.clone()));

    assert!(!editor.select_next_field());
    assert_eq!(editor.selected_field(), Some(c));
}

#[test]
fn navigation_without_selection() {
    let (editor, a, _, _) = editor_with_abc();
    assert!(!editor.select_prev_field());
    assert_eq!(editor.selected_field(), None);

    assert!(editor.select_next_field());
    assert_eq!(editor.selected_field(), Some(a));
}

#[test]
fn first_field_is_a_selected_textarea() {
    let editor = Editor::default();
    let field = editor.create_first_field();

    assert_eq!(field.field_type(), FieldType::Textarea);
    assert_eq!(field.title(), "This is my first field, yeay!");
    assert_eq!(editor.selected_field(), Some(field));
    assert_eq!(editor.current_tab(), Tab::FieldSettings);
}

#[test]
fn derived_state_is_never_stale() {
    let (editor, a, b, c) = editor_with_abc();
    editor.select_field(&c);
    assert_eq!(editor.selected_field_index(), Some(2));

    editor.form().field_order().move_item(2, 0);
    assert_eq!(editor.selected_field_index(), Some(0));

    editor.show_form_settings();
    assert!(editor.form_settings_selected());
    editor.select_field(&b);
    assert!(!editor.form_settings_selected());
    assert_eq!(editor.selected_field_index(), Some(2));

    for field in [&a, &b, &c] {
        editor.remove_field(field);
    }
    assert!(!editor.form().has_fields());
    assert_eq!(editor.selected_field_index(), None);
}

#[test]
fn form_data_follows_every_change() -> anyhow::Result<()> {
    let (editor, a, _, _) = editor_with_abc();
    assert_eq!(editor.form_data().fields.len(), 3);

    a.set_required(true);
    assert!(editor.form_data().fields[0].is_required);

    editor.form().set_description("All about you");
    assert_eq!(editor.form_data().description, "All about you");

    editor.remove_field(&a);
    let data = editor.form_data();
    assert_eq!(data.fields.len(), 2);
    assert_eq!(data.fields[0].title, "B");

    let parsed: FormData = serde_json::from_str(&editor.form_json()?)?;
    assert_eq!(parsed, data);
    Ok(())
}

#[test]
fn serialization_round_trip_through_the_editor() -> anyhow::Result<()> {
    let (editor, _, b, _) = editor_with_abc();
    editor.form().set_name("Registration");
    b.add_choice();
    b.set_choice_text(0, "Yes");
    b.set_randomized(Some(false));
    editor.duplicate_field(&b)?;

    let json = editor.form_json()?;
    let value: serde_json::Value = serde_json::from_str(&json)?;
    for key in value["fields"][0].as_object().into_iter().flat_map(|o| o.keys()) {
        assert!(
            [
                "type",
                "title",
                "is_required",
                "instructions",
                "choices",
                "is_randomized"
            ]
            .contains(&key.as_str()),
            "unexpected key {key}"
        );
    }

    let restored = Form::from_json(&json)?;
    assert_eq!(restored.to_data(), editor.form_data());
    Ok(())
}

#[test]
fn shortcuts_walk_and_delete() {
    let (editor, a, b, c) = editor_with_abc();
    let shortcuts = attach_shortcuts(&editor);

    shortcuts.handle(Key::Char('j'));
    shortcuts.handle(Key::Char('j'));
    assert_eq!(editor.selected_field(), Some(b.clone()));
    shortcuts.handle(Key::Char('k'));
    assert_eq!(editor.selected_field(), Some(a.clone()));

    shortcuts.handle(Key::Backspace);
    assert_eq!(editor.form().fields(), vec![b, c]);
    assert_eq!(editor.selected_field(), None);
}
