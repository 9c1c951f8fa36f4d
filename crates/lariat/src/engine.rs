mod rehydrate;

use crate::db::Pool;

use lariat_core::stmt::{Op, QueryState, Value, ValueRecord};
use lariat_core::{Error, Result};
use lariat_sql::CompiledQuery;

/// Dispatches compiled SQL to the backend and reconstructs nested objects
/// from dot-path column aliases.
pub struct Engine {
    pool: Pool,
}

impl Engine {
    pub(crate) fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Compiles and executes the query, returning one record per row.
    ///
    /// Compilation happens before any connection is acquired, so schema,
    /// translation, and composition errors surface without touching the
    /// database.
    pub async fn to_array(&self, state: &QueryState) -> Result<Vec<ValueRecord>> {
        let compiled = lariat_sql::compile(state)?;
        let rows = self.execute(&compiled).await?;
        Ok(rows.into_iter().map(rehydrate::record).collect())
    }

    /// Returns the first row, if any, by limiting the query to one row.
    pub async fn first(&self, state: &QueryState) -> Result<Option<ValueRecord>> {
        let mut state = state.clone();
        state.ops.push(Op::Take(1));

        let mut rows = self.to_array(&state).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.remove(0))
        })
    }

    /// Counts the query's rows with a wrapping `SELECT COUNT(*)`.
    pub async fn count(&self, state: &QueryState) -> Result<u64> {
        let compiled = lariat_sql::compile_count(state)?;
        let rows = self.execute(&compiled).await?;

        match rows.first().and_then(|row| row.get("count")) {
            Some(Value::I64(count)) => u64::try_from(*count)
                .map_err(|_| Error::from_args(format_args!("negative row count {count}"))),
            other => Err(Error::from_args(format_args!(
                "count query returned an unexpected result: {other:?}"
            ))),
        }
    }

    async fn execute(&self, compiled: &CompiledQuery) -> Result<Vec<ValueRecord>> {
        tracing::debug!(sql = %compiled.sql, "executing compiled query");

        // The connection returns to the pool when the guard drops, on every
        // exit path.
        let connection = self.pool.get().await?;
        connection.query(&compiled.sql, &compiled.params).await
    }
}
