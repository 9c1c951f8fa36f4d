use super::Error;

/// Error when a callback expression cannot be translated to SQL.
///
/// This occurs when:
/// - The callback source fails to lex or parse
/// - An AST node, operator, or method has no SQL mapping
/// - An identifier path resolves against neither the current projection nor
///   the scope bag
/// - A block body contains anything other than a single return statement
///
/// Translation errors are raised from the terminal call, before any database
/// interaction.
#[derive(Debug)]
pub(super) struct Translation {
    message: Box<str>,
}

impl std::error::Error for Translation {}

impl core::fmt::Display for Translation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "translation failed: {}", self.message)
    }
}

impl Error {
    /// Creates a translation error.
    pub fn translation(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Translation(Translation {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a translation error.
    pub fn is_translation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Translation(_))
    }
}
