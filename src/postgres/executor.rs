use deadpool_postgres::ClientWrapper;

use super::params::Params;
use super::query::build_result_set_from_statement;
use crate::error::StoreError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Execute a batch of SQL statements inside one transaction.
///
/// # Errors
/// Returns errors from transaction operations or batch execution.
pub async fn execute_batch(pg_client: &mut ClientWrapper, query: &str) -> Result<(), StoreError> {
    let tx = pg_client.transaction().await?;
    tx.batch_execute(query).await?;
    tx.commit().await?;

    Ok(())
}

/// Execute a parameterized statement that returns rows (SELECT, or DML with `RETURNING`).
///
/// Statements are prepared through the connection's statement cache, so the fixed
/// lookups are parsed once per pooled connection.
///
/// # Errors
/// Returns errors from statement preparation, execution, or result set building.
pub async fn execute_select(
    pg_client: &ClientWrapper,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, StoreError> {
    let params = Params::convert(params);
    let stmt = pg_client.prepare_cached(query).await?;
    let rows = pg_client.query(&stmt, params.as_refs()).await?;
    build_result_set_from_statement(&stmt, &rows)
}
