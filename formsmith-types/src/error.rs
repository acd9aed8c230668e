/// Error type for form and field operations.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// A field was requested without saying which type it should have.
    #[error("Field type is missing")]
    MissingFieldType,

    /// The field is not part of the form it was passed to.
    #[error("Field is not part of this form")]
    FieldNotFound,

    /// Serialized form data could not be read or written.
    #[error("Invalid form data: {0}")]
    Json(#[from] serde_json::Error),
}

impl FormError {
    /// Check if this error means the field was not found in the form.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FieldNotFound)
    }
}
