use super::Error;

/// Error when a schema definition is invalid.
///
/// This occurs when:
/// - A relation targets a model that was never declared
/// - Names are duplicated (models, columns, relations)
/// - Junction options (`this`, `that`, pivots) are used on a relation that
///   is not many-to-many
/// - Two declarations of the same junction table disagree
///
/// These errors are raised once, when the schema is built.
#[derive(Debug)]
pub(super) struct InvalidSchemaError {
    message: Box<str>,
}

impl std::error::Error for InvalidSchemaError {}

impl core::fmt::Display for InvalidSchemaError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSchema(InvalidSchemaError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid schema error.
    pub fn is_invalid_schema(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::InvalidSchema(_)))
    }
}
