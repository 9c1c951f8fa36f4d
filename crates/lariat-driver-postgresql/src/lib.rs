mod value;

use lariat_core::stmt::{Value, ValueRecord};
use lariat_core::{async_trait, Connection, Error, Result};

use tokio_postgres::{tls::MakeTlsConnect, Client, Config, Socket};
use url::Url;

/// PostgreSQL-backed [`Connection`] implementation.
#[derive(Debug)]
pub struct PostgreSql {
    /// The PostgreSQL client.
    client: Client,
}

impl PostgreSql {
    /// Initialize a Lariat PostgreSQL driver using an initialized connection.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connects to a PostgreSQL database using a connection string.
    ///
    /// See [`tokio_postgres::Config`] for more information.
    pub async fn connect(url: &str) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|err| Error::invalid_connection_url(err.to_string(), url))?;

        if parsed.scheme() != "postgresql" {
            return Err(Error::invalid_connection_url(
                "expected a `postgresql` scheme",
                url,
            ));
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| Error::invalid_connection_url("missing host", url))?;

        if parsed.path().is_empty() || parsed.path() == "/" {
            return Err(Error::invalid_connection_url(
                "no database specified - missing path",
                url,
            ));
        }

        let mut config = Config::new();
        config.host(host);
        config.dbname(parsed.path().trim_start_matches('/'));

        if let Some(port) = parsed.port() {
            config.port(port);
        }

        if !parsed.username().is_empty() {
            config.user(parsed.username());
        }

        if let Some(password) = parsed.password() {
            config.password(password);
        }

        Self::connect_with_config(config, tokio_postgres::NoTls).await
    }

    /// Connects to a PostgreSQL database using a [`tokio_postgres::Config`].
    pub async fn connect_with_config<T>(config: Config, tls: T) -> Result<Self>
    where
        T: MakeTlsConnect<Socket> + 'static,
        T::Stream: Send,
    {
        let (client, connection) = config
            .connect(tls)
            .await
            .map_err(Error::driver_operation_failed)?;

        tokio::spawn(async move {
            if let Err(err) = connection.await {
                tracing::warn!("postgresql connection error: {err}");
            }
        });

        Ok(Self::new(client))
    }
}

impl From<Client> for PostgreSql {
    fn from(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Connection for PostgreSql {
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<ValueRecord>> {
        // Compiled queries inline their literals; params stays reserved.
        debug_assert!(params.is_empty(), "statement parameters are not supported yet");

        tracing::trace!(sql, "executing statement");

        let rows = self
            .client
            .query(sql, &[])
            .await
            .map_err(Error::driver_operation_failed)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let mut record = ValueRecord::new();
            for (index, column) in row.columns().iter().enumerate() {
                record.insert(column.name(), value::from_row(&row, index, column)?);
            }
            records.push(record);
        }

        Ok(records)
    }
}
