use super::Error;

/// Error when a relation slot is assigned a value of the wrong shape.
///
/// This occurs when:
/// - A collection is assigned to a belongs-to or has-one relation
/// - A single model or key is assigned to a has-many or many-to-many relation
/// - The assigned model is not an instance of the relation's target model
#[derive(Debug)]
pub(super) struct InvalidAssignmentError {
    model: Box<str>,
    relation: Box<str>,
    message: Box<str>,
}

impl std::error::Error for InvalidAssignmentError {}

impl core::fmt::Display for InvalidAssignmentError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid assignment to `{}.{}`: {}",
            self.model, self.relation, self.message
        )
    }
}

impl Error {
    /// Creates an invalid assignment error.
    pub fn invalid_assignment(
        model: impl Into<String>,
        relation: impl Into<String>,
        message: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::InvalidAssignment(InvalidAssignmentError {
            model: model.into().into(),
            relation: relation.into().into(),
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid assignment error.
    pub fn is_invalid_assignment(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::InvalidAssignment(_)))
    }
}
