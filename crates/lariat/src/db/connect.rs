use lariat_core::{async_trait, Connection, Driver, Error, Result};

use url::Url;

/// The standard driver: dispatches on the connection URL's scheme.
#[derive(Debug)]
pub struct Connect {
    url: Url,
}

impl Connect {
    pub fn new(url: &str) -> Result<Self> {
        let url =
            Url::parse(url).map_err(|err| Error::invalid_connection_url(err.to_string(), url))?;
        Ok(Self { url })
    }
}

#[async_trait]
impl Driver for Connect {
    async fn connect(&self) -> Result<Box<dyn Connection>> {
        match self.url.scheme() {
            "postgresql" => {
                let driver = lariat_driver_postgresql::PostgreSql::connect(self.url.as_str()).await?;
                Ok(Box::new(driver))
            }
            scheme => Err(Error::invalid_connection_url(
                format!("unsupported database scheme `{scheme}`"),
                self.url.as_str(),
            )),
        }
    }
}
