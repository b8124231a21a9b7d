//! [`TableStore`] over PostgreSQL.
//!
//! Rows cross the boundary as JSONB: reads use `to_jsonb` /
//! `jsonb_build_object`, writes go through `jsonb_populate_record` so the
//! database converts string payload values into each column's declared type
//! (e.g. `"3"` into a `BIGINT` foreign key).

use aset_core::resource::ID_COLUMN;
use aset_core::types::{DbId, Record};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgDatabaseError;

use super::{scalar_text, SelectQuery, StoreError, TableStore};
use crate::DbPool;

/// PostgreSQL-backed store sharing the application's connection pool.
#[derive(Clone)]
pub struct PgTableStore {
    pool: DbPool,
}

impl PgTableStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Quote an identifier for interpolation into SQL.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Build the read statement for `query` against `table` (aliased `t`).
///
/// Returns the SQL and whether `$1` must be bound to the filter value.
fn select_sql(table: &str, query: &SelectQuery) -> (String, Option<Option<String>>) {
    let projection = match query.columns {
        Some(columns) => {
            let pairs: Vec<String> = columns
                .iter()
                .map(|c| format!("'{c}', t.{}", quote_ident(c)))
                .collect();
            format!("jsonb_build_object({})", pairs.join(", "))
        }
        None => "to_jsonb(t)".to_string(),
    };

    let mut sql = format!("SELECT {projection} FROM {} t", quote_ident(table));

    let mut bind = None;
    if let Some(filter) = &query.filter {
        let column = quote_ident(filter.column);
        match scalar_text(&filter.value) {
            Some(text) => {
                sql.push_str(&format!(" WHERE t.{column}::text = $1"));
                bind = Some(Some(text));
            }
            None => sql.push_str(&format!(" WHERE t.{column} IS NULL")),
        }
    }

    if let Some(order) = query.order {
        let direction = if order.descending { "DESC" } else { "ASC" };
        sql.push_str(&format!(
            " ORDER BY t.{} {direction}",
            quote_ident(order.column)
        ));
    }

    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT {}", limit.max(0)));
    }

    (sql, bind)
}

fn column_list(row: &Record) -> Result<Vec<String>, StoreError> {
    if row.is_empty() {
        return Err(StoreError::new("No columns to write"));
    }
    Ok(row.keys().map(|k| quote_ident(k)).collect())
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                let mut store_err = StoreError::new(db_err.message());
                if let Some(code) = db_err.code() {
                    store_err = store_err.with_code(code.into_owned());
                }
                if let Some(detail) = db_err
                    .try_downcast_ref::<PgDatabaseError>()
                    .and_then(PgDatabaseError::detail)
                {
                    store_err = store_err.with_detail(detail);
                }
                store_err
            }
            other => StoreError::new(other.to_string()),
        }
    }
}

#[async_trait]
impl TableStore for PgTableStore {
    async fn select(
        &self,
        table: &'static str,
        query: &SelectQuery,
    ) -> Result<Vec<Record>, StoreError> {
        let (sql, bind) = select_sql(table, query);
        let mut statement = sqlx::query_scalar::<_, Value>(&sql);
        if let Some(Some(text)) = bind {
            statement = statement.bind(text);
        }
        let rows = statement.fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect())
    }

    async fn insert(&self, table: &'static str, row: Record) -> Result<DbId, StoreError> {
        let columns = column_list(&row)?.join(", ");
        let table = quote_ident(table);
        let sql = format!(
            "INSERT INTO {table} ({columns}) \
             SELECT {columns} FROM jsonb_populate_record(NULL::{table}, $1) \
             RETURNING {}",
            quote_ident(ID_COLUMN)
        );
        let id = sqlx::query_scalar::<_, DbId>(&sql)
            .bind(sqlx::types::Json(Value::Object(row)))
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn update(
        &self,
        table: &'static str,
        id: DbId,
        row: Record,
    ) -> Result<u64, StoreError> {
        let assignments: Vec<String> = column_list(&row)?
            .into_iter()
            .map(|c| format!("{c} = p.{c}"))
            .collect();
        let table = quote_ident(table);
        let sql = format!(
            "UPDATE {table} AS t SET {} \
             FROM jsonb_populate_record(NULL::{table}, $1) AS p \
             WHERE t.{} = $2",
            assignments.join(", "),
            quote_ident(ID_COLUMN)
        );
        let result = sqlx::query(&sql)
            .bind(sqlx::types::Json(Value::Object(row)))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, table: &'static str, id: DbId) -> Result<u64, StoreError> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = $1",
            quote_ident(table),
            quote_ident(ID_COLUMN)
        );
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use aset_core::resource::OrderBy;

    use super::*;

    #[test]
    fn select_all_columns_ordered() {
        let query = SelectQuery::new().order(OrderBy::desc("tahun"));
        let (sql, bind) = select_sql("aset_tahun", &query);
        assert_eq!(
            sql,
            "SELECT to_jsonb(t) FROM \"aset_tahun\" t ORDER BY t.\"tahun\" DESC"
        );
        assert!(bind.is_none());
    }

    #[test]
    fn select_projection_with_filter_and_limit() {
        let query = SelectQuery::new()
            .columns(Some(&["id", "username"]))
            .eq("username", "admin")
            .limit(2);
        let (sql, bind) = select_sql("aset_users", &query);
        assert_eq!(
            sql,
            "SELECT jsonb_build_object('id', t.\"id\", 'username', t.\"username\") \
             FROM \"aset_users\" t WHERE t.\"username\"::text = $1 LIMIT 2"
        );
        assert_eq!(bind, Some(Some("admin".to_string())));
    }

    #[test]
    fn numeric_filter_binds_text() {
        let query = SelectQuery::new().by_id(12);
        let (_, bind) = select_sql("aset_jenis", &query);
        assert_eq!(bind, Some(Some("12".to_string())));
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_ident("type"), "\"type\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn empty_row_is_rejected() {
        assert!(column_list(&Record::new()).is_err());
    }
}
