//! In-process [`TableStore`].
//!
//! Mirrors the PostgreSQL behaviour the API depends on: serial identifiers,
//! text-equality filters, ordering, projection, and foreign-key references
//! that refuse dangling inserts and deletes of still-referenced rows (with
//! the same message/detail shape the database produces).

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use aset_core::resource::ID_COLUMN;
use aset_core::types::{DbId, Record};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{scalar_text, SelectQuery, StoreError, TableStore};

/// SQLSTATE for a foreign-key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// SQLSTATE for a missing relation.
const UNDEFINED_TABLE: &str = "42P01";

/// A foreign-key column: `from_table.column` refers to `to_table.id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub from_table: &'static str,
    pub column: &'static str,
    pub to_table: &'static str,
}

#[derive(Default)]
struct MemoryTable {
    last_id: DbId,
    rows: BTreeMap<DbId, Record>,
}

/// Store holding every table in a `tokio::sync::RwLock`.
pub struct MemoryTableStore {
    tables: RwLock<HashMap<&'static str, MemoryTable>>,
    references: Vec<Reference>,
}

impl MemoryTableStore {
    /// Create a store with the given (empty) tables.
    pub fn new(tables: &[&'static str]) -> Self {
        Self {
            tables: RwLock::new(
                tables
                    .iter()
                    .map(|t| (*t, MemoryTable::default()))
                    .collect(),
            ),
            references: Vec::new(),
        }
    }

    /// Declare a foreign-key reference enforced on insert, update and delete.
    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }
}

fn missing_table(table: &str) -> StoreError {
    StoreError::new(format!("relation \"{table}\" does not exist")).with_code(UNDEFINED_TABLE)
}

/// Order two scalars: numbers numerically, strings lexically, nulls last.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(x), Some(y)) => scalar_text(x).cmp(&scalar_text(y)),
    }
}

fn project(row: &Record, columns: Option<&'static [&'static str]>) -> Record {
    match columns {
        None => row.clone(),
        Some(columns) => columns
            .iter()
            .map(|c| (c.to_string(), row.get(*c).cloned().unwrap_or(Value::Null)))
            .collect(),
    }
}

impl MemoryTableStore {
    /// Refuse a write whose reference columns point at missing rows.
    fn check_outgoing(
        &self,
        tables: &HashMap<&'static str, MemoryTable>,
        table: &'static str,
        row: &Record,
    ) -> Result<(), StoreError> {
        for reference in self.references.iter().filter(|r| r.from_table == table) {
            let Some(value) = row.get(reference.column).and_then(scalar_text) else {
                continue;
            };
            let present = value
                .parse::<DbId>()
                .ok()
                .and_then(|id| tables.get(reference.to_table)?.rows.get(&id))
                .is_some();
            if !present {
                return Err(StoreError::new(format!(
                    "insert or update on table \"{table}\" violates foreign key constraint \
                     \"{table}_{}_fkey\"",
                    reference.column
                ))
                .with_detail(format!(
                    "Key ({})=({value}) is not present in table \"{}\".",
                    reference.column, reference.to_table
                ))
                .with_code(FOREIGN_KEY_VIOLATION));
            }
        }
        Ok(())
    }

    /// Refuse deleting a row other tables still reference.
    fn check_incoming(
        &self,
        tables: &HashMap<&'static str, MemoryTable>,
        table: &'static str,
        id: DbId,
    ) -> Result<(), StoreError> {
        let id_text = id.to_string();
        for reference in self.references.iter().filter(|r| r.to_table == table) {
            let Some(from) = tables.get(reference.from_table) else {
                continue;
            };
            let referenced = from.rows.values().any(|row| {
                row.get(reference.column).and_then(scalar_text).as_deref() == Some(&id_text)
            });
            if referenced {
                return Err(StoreError::new(format!(
                    "update or delete on table \"{table}\" violates foreign key constraint \
                     \"{}_{}_fkey\" on table \"{}\"",
                    reference.from_table, reference.column, reference.from_table
                ))
                .with_detail(format!(
                    "Key (id)=({id}) is still referenced from table \"{}\".",
                    reference.from_table
                ))
                .with_code(FOREIGN_KEY_VIOLATION));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn select(
        &self,
        table: &'static str,
        query: &SelectQuery,
    ) -> Result<Vec<Record>, StoreError> {
        let tables = self.tables.read().await;
        let memory_table = tables.get(table).ok_or_else(|| missing_table(table))?;

        let mut rows: Vec<&Record> = memory_table
            .rows
            .values()
            .filter(|row| match &query.filter {
                None => true,
                Some(filter) => {
                    let wanted = scalar_text(&filter.value);
                    row.get(filter.column).and_then(scalar_text) == wanted
                }
            })
            .collect();

        if let Some(order) = query.order {
            rows.sort_by(|a, b| {
                let ordering = compare_values(a.get(order.column), b.get(order.column));
                if order.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        let limit = query
            .limit
            .map(|l| usize::try_from(l).unwrap_or(0))
            .unwrap_or(usize::MAX);

        Ok(rows
            .into_iter()
            .take(limit)
            .map(|row| project(row, query.columns))
            .collect())
    }

    async fn insert(&self, table: &'static str, mut row: Record) -> Result<DbId, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.contains_key(table) {
            return Err(missing_table(table));
        }
        self.check_outgoing(&tables, table, &row)?;

        let memory_table = tables.get_mut(table).ok_or_else(|| missing_table(table))?;
        memory_table.last_id += 1;
        let id = memory_table.last_id;
        row.insert(ID_COLUMN.to_string(), Value::from(id));
        memory_table.rows.insert(id, row);
        Ok(id)
    }

    async fn update(
        &self,
        table: &'static str,
        id: DbId,
        row: Record,
    ) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.contains_key(table) {
            return Err(missing_table(table));
        }
        self.check_outgoing(&tables, table, &row)?;

        let memory_table = tables.get_mut(table).ok_or_else(|| missing_table(table))?;
        let Some(existing) = memory_table.rows.get_mut(&id) else {
            return Ok(0);
        };
        for (column, value) in row {
            if column != ID_COLUMN {
                existing.insert(column, value);
            }
        }
        Ok(1)
    }

    async fn delete(&self, table: &'static str, id: DbId) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.contains_key(table) {
            return Err(missing_table(table));
        }
        self.check_incoming(&tables, table, id)?;

        let memory_table = tables.get_mut(table).ok_or_else(|| missing_table(table))?;
        Ok(u64::from(memory_table.rows.remove(&id).is_some()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
