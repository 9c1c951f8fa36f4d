use std::fmt;

/// A double-quoted SQL identifier.
pub(crate) struct Ident<S>(pub(crate) S);

impl<S: AsRef<str>> fmt::Display for Ident<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0.as_ref())
    }
}
