use super::Error;

/// Error when a relation name is not declared by the model's schema.
///
/// This is never recovered from: a typo in a relation name is a programming
/// error and is surfaced to the caller as-is.
#[derive(Debug)]
pub(super) struct UnknownRelationError {
    model: Box<str>,
    relation: Box<str>,
}

impl std::error::Error for UnknownRelationError {}

impl core::fmt::Display for UnknownRelationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "no such relation: `{}` in model `{}`",
            self.relation, self.model
        )
    }
}

impl Error {
    /// Creates an unknown relation error.
    pub fn unknown_relation(model: impl Into<String>, relation: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownRelation(UnknownRelationError {
            model: model.into().into(),
            relation: relation.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is an unknown
    /// relation error.
    pub fn is_unknown_relation(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::UnknownRelation(_)))
    }
}
