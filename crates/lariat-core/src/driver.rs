use crate::stmt::{Value, ValueRecord};
use crate::Result;

use async_trait::async_trait;

/// Creates connections for the pool. Implemented per backend; the standard
/// implementation dispatches on the connection URL's scheme.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn Connection>>;
}

/// A connection to a database, implemented per dialect.
///
/// `params` is reserved for future statement parameterization and is always
/// empty today; compiled queries inline their literals.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Executes a SELECT and returns one flat record per row, keyed by the
    /// statement's column aliases in column order.
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<ValueRecord>>;
}
