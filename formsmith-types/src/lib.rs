//! Core types for formsmith.
//!
//! This crate provides the state model of the form builder:
//! - `reactive` - Observable values, observable lists and computed values
//! - `Field` and `FieldType` - A single form field and its kind
//! - `Form` - The ordered collection of fields plus form metadata
//! - `FormData` and `FieldData` - The serialized format
//! - `FormPatch` and `FieldPatch` - Partial input used to create forms and fields

pub mod reactive;

mod field_type;
pub use field_type::FieldType;

mod field;
pub use field::{
    Choice, DEFAULT_FIELD_TITLE, Field, FieldData, FieldPatch, PREVIEW_TEMPLATE_PREFIX,
    SETTINGS_TEMPLATE_PREFIX, defaults_for_type,
};

mod form;
pub use form::{DEFAULT_FORM_NAME, Form, FormData, FormPatch};

mod error;
pub use error::FormError;
