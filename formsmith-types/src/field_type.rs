use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a form field. Serialized in lowercase, e.g. `"textarea"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Single-line text.
    #[default]
    Text,
    Number,
    /// Multi-line text.
    Textarea,
    /// Pick any number of choices.
    Checkbox,
    /// Pick exactly one choice.
    Radio,
    /// Pick one choice from a drop-down.
    Select,
    /// A heading that separates groups of fields.
    Section,
    /// A page break.
    Page,
    /// First and last name.
    Shortname,
    File,
    Address,
    Date,
    Email,
    Time,
    Phone,
    Url,
    Money,
    Likert,
}

impl FieldType {
    /// Every field type, in the order the add-field palette shows them.
    pub const ALL: [FieldType; 18] = [
        Self::Text,
        Self::Number,
        Self::Textarea,
        Self::Checkbox,
        Self::Radio,
        Self::Select,
        Self::Section,
        Self::Page,
        Self::Shortname,
        Self::File,
        Self::Address,
        Self::Date,
        Self::Email,
        Self::Time,
        Self::Phone,
        Self::Url,
        Self::Money,
        Self::Likert,
    ];

    /// The serialized name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Textarea => "textarea",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Select => "select",
            Self::Section => "section",
            Self::Page => "page",
            Self::Shortname => "shortname",
            Self::File => "file",
            Self::Address => "address",
            Self::Date => "date",
            Self::Email => "email",
            Self::Time => "time",
            Self::Phone => "phone",
            Self::Url => "url",
            Self::Money => "money",
            Self::Likert => "likert",
        }
    }

    /// Check if fields of this type present a list of choices.
    pub fn is_choice(self) -> bool {
        matches!(self, Self::Checkbox | Self::Radio | Self::Select)
    }

    /// Check if this type only structures the form and collects no answer.
    pub fn is_layout(self) -> bool {
        matches!(self, Self::Section | Self::Page)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_the_serialized_form() {
        for field_type in FieldType::ALL {
            let json = format!("\"{}\"", field_type.as_str());
            assert_eq!(serde_json::from_str::<FieldType>(&json).unwrap(), field_type);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!(serde_json::from_str::<FieldType>("\"rating\"").is_err());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&FieldType::Shortname).unwrap();
        assert_eq!(json, "\"shortname\"");
    }

    #[test]
    fn choice_types() {
        let choice: Vec<_> = FieldType::ALL.into_iter().filter(|t| t.is_choice()).collect();
        assert_eq!(
            choice,
            vec![FieldType::Checkbox, FieldType::Radio, FieldType::Select]
        );
    }
}
