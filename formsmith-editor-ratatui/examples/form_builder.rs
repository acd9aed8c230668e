//! Form builder - build a form in the terminal and print it as JSON.
//!
//! ```text
//! cargo run --example form_builder -- [form.json]
//! ```
//!
//! Pass a previously saved form to keep editing it. Set `RUST_LOG` to write a
//! log to `form_builder.log`; the terminal itself is taken by the editor.

use std::fs::File;
use std::sync::Mutex;

use anyhow::Context;
use formsmith::{Editor, EditorConfig, Form};
use formsmith_editor_ratatui::{RatatuiEditor, Theme};
use ratatui::style::Color;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn setup_logging() -> anyhow::Result<()> {
    let Ok(filter) = EnvFilter::try_from_default_env() else {
        return Ok(());
    };
    let file = File::create("form_builder.log").context("creating form_builder.log")?;
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    setup_logging()?;

    let form = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            Form::from_json(&json).with_context(|| format!("parsing {path}"))?
        }
        None => Form::new(),
    };

    let editor = Editor::with_config(
        form,
        EditorConfig::new().with_first_field_title("What should we call you?"),
    );

    let theme = Theme {
        primary: Color::Magenta,
        secondary: Color::LightMagenta,
        background: Color::Reset,
        text: Color::White,
        highlight: Color::Yellow,
        error: Color::LightRed,
        success: Color::LightGreen,
        border: Color::DarkGray,
        selected_bg: Color::DarkGray,
    };

    let json = RatatuiEditor::new()
        .with_title("Form Builder")
        .with_theme(theme)
        .run_to_json(&editor)?;

    println!("{json}");
    Ok(())
}
