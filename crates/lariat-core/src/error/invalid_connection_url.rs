use super::Error;

/// Error when a connection URL cannot be used.
#[derive(Debug)]
pub(super) struct InvalidConnectionUrl {
    message: Box<str>,
    url: Box<str>,
}

impl std::error::Error for InvalidConnectionUrl {}

impl core::fmt::Display for InvalidConnectionUrl {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid connection URL: {}; url={}", self.message, self.url)
    }
}

impl Error {
    /// Creates an invalid connection URL error.
    pub fn invalid_connection_url(
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::InvalidConnectionUrl(
            InvalidConnectionUrl {
                message: message.into().into(),
                url: url.into().into(),
            },
        ))
    }
}
