//! # Framework Errors
//!
//! Failures raised by the actor plumbing itself, plus a boxed slot for
//! entity-level errors so clients can downcast them back to their typed form.

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Item already exists: {0}")]
    AlreadyExists(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recovers the entity's own error type from an [`FrameworkError::EntityError`].
    ///
    /// Returns the original error unchanged when it carries something else.
    pub fn downcast_entity<E>(self) -> Result<E, FrameworkError>
    where
        E: std::error::Error + 'static,
    {
        match self {
            FrameworkError::EntityError(inner) => match inner.downcast::<E>() {
                Ok(typed) => Ok(*typed),
                Err(other) => Err(FrameworkError::EntityError(other)),
            },
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error, PartialEq)]
    #[error("out of range: {0}")]
    struct RangeError(u32);

    #[test]
    fn downcast_recovers_typed_entity_error() {
        let err = FrameworkError::EntityError(Box::new(RangeError(7)));
        assert_eq!(err.downcast_entity::<RangeError>().unwrap(), RangeError(7));
    }

    #[test]
    fn downcast_leaves_plumbing_errors_alone() {
        let err = FrameworkError::ActorClosed;
        assert!(matches!(
            err.downcast_entity::<RangeError>(),
            Err(FrameworkError::ActorClosed)
        ));
    }
}
