use super::Error;

/// Error when an operation list cannot be arranged into a valid query.
///
/// This occurs when:
/// - `include` appears after a projection has collapsed the entity root
/// - A stage references an alias absent from the current projection
/// - A projection ends up empty
#[derive(Debug)]
pub(super) struct Composition {
    message: Box<str>,
}

impl std::error::Error for Composition {}

impl core::fmt::Display for Composition {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "composition failed: {}", self.message)
    }
}

impl Error {
    /// Creates a composition error.
    pub fn composition(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Composition(Composition {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a composition error.
    pub fn is_composition(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Composition(_))
    }
}
