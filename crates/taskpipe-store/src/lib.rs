//! Taskpipe Storage Layer
//!
//! Persists normalized record batches and status-history rows to SQLite
//! with replace-on-write semantics: each save drops and recreates its
//! dataset table, so a dataset always reflects exactly one fetch cycle.
//! Record tables carry the fixed record columns plus one TEXT column per
//! catalog label, in catalog order, with an auto `id` key in front.
//!
//! # Thread Safety
//!
//! SQLite connections are not thread-safe. Wrap a [`TaskStore`] in a mutex
//! (or give each worker its own) when sharing across tasks.

#![warn(missing_docs)]

use rusqlite::{Connection, ToSql};
use std::path::Path;
use taskpipe_domain::{NormalizedRecord, StatusHistoryRow};
use taskpipe_extractor::FieldCatalog;
use thiserror::Error;
use tracing::info;

/// Fixed record columns, in dataset order; catalog labels follow these.
const RECORD_COLUMNS: &[&str] = &[
    "Projeto",
    "ID",
    "Status",
    "Name",
    "Priority",
    "Líder",
    "Email líder",
    "date_created",
    "date_updated",
    "current_status",
    "time_in_current_status",
];

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Dataset names become table names and are restricted accordingly
    #[error("Invalid dataset name: {0:?}")]
    InvalidDataset(String),
}

/// SQLite-backed store for normalized datasets.
pub struct TaskStore {
    conn: Connection,
}

impl TaskStore {
    /// Open (or create) the database at the given path.
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Replace the dataset with this batch of records.
    ///
    /// The table is dropped, recreated with the fixed columns plus one
    /// column per catalog label, and repopulated inside one transaction.
    pub fn save_records(
        &mut self,
        dataset: &str,
        catalog: &FieldCatalog,
        records: &[NormalizedRecord],
    ) -> Result<(), StoreError> {
        validate_dataset_name(dataset)?;

        let mut columns: Vec<String> = RECORD_COLUMNS.iter().map(|c| c.to_string()).collect();
        columns.extend(catalog.labels().iter().cloned());

        let column_defs = columns
            .iter()
            .map(|c| {
                // The batch sequence number is the one numeric record column
                let sql_type = if *c == "Projeto" { "INTEGER" } else { "TEXT" };
                format!("{} {}", quote_ident(c), sql_type)
            })
            .collect::<Vec<_>>()
            .join(", ");
        let column_names = columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; columns.len()].join(", ");

        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table};
             CREATE TABLE {table} (id INTEGER PRIMARY KEY AUTOINCREMENT, {defs});",
            table = quote_ident(dataset),
            defs = column_defs,
        ))?;

        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote_ident(dataset),
                column_names,
                placeholders,
            ))?;

            for record in records {
                let seq = record.seq as i64;
                let mut params: Vec<&dyn ToSql> = vec![
                    &seq,
                    &record.id,
                    &record.status,
                    &record.name,
                    &record.priority,
                    &record.leader,
                    &record.leader_email,
                    &record.date_created,
                    &record.date_updated,
                    &record.current_status,
                    &record.time_in_current_status,
                ];
                let field_values: Vec<&str> = catalog
                    .labels()
                    .iter()
                    .map(|label| record.fields.get(label).map(String::as_str).unwrap_or(""))
                    .collect();
                for value in &field_values {
                    params.push(value);
                }
                stmt.execute(&params[..])?;
            }
        }
        tx.commit()?;

        info!(dataset, rows = records.len(), "records dataset replaced");
        Ok(())
    }

    /// Replace the dataset with this batch of status-history rows.
    pub fn save_status_history(
        &mut self,
        dataset: &str,
        rows: &[StatusHistoryRow],
    ) -> Result<(), StoreError> {
        validate_dataset_name(dataset)?;

        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table};
             CREATE TABLE {table} (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 task_id TEXT,
                 status TEXT,
                 time_in_status REAL,
                 timestamp TEXT
             );",
            table = quote_ident(dataset),
        ))?;

        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} (task_id, status, time_in_status, timestamp) VALUES (?, ?, ?, ?)",
                quote_ident(dataset),
            ))?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.task_id,
                    row.status,
                    row.time_in_status,
                    row.timestamp,
                ])?;
            }
        }
        tx.commit()?;

        info!(dataset, rows = rows.len(), "status-history dataset replaced");
        Ok(())
    }

    /// Row count of a dataset table.
    pub fn count_rows(&self, dataset: &str) -> Result<i64, StoreError> {
        validate_dataset_name(dataset)?;
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_ident(dataset)),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

/// Dataset names come from configuration, not user input, but they are
/// spliced into DDL, so keep them to identifier characters.
fn validate_dataset_name(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidDataset(name.to_string()))
    }
}

/// Double-quote an identifier; labels contain spaces and pictographs.
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn catalog() -> FieldCatalog {
        FieldCatalog::new(&["ESCOPO", "E-MAIL"]).unwrap()
    }

    fn record(seq: usize, id: &str, escopo: &str) -> NormalizedRecord {
        let mut fields = BTreeMap::new();
        fields.insert("ESCOPO".to_string(), escopo.to_string());
        fields.insert("E-MAIL".to_string(), String::new());

        NormalizedRecord {
            seq,
            id: id.to_string(),
            status: "em aberto".to_string(),
            name: format!("task {id}"),
            priority: None,
            leader: Some("maria".to_string()),
            leader_email: None,
            date_created: "01-01-2024 00:00:00".to_string(),
            date_updated: "01-01-2024 00:00:00".to_string(),
            current_status: None,
            time_in_current_status: None,
            fields,
        }
    }

    #[test]
    fn test_save_and_count_records() {
        let mut store = TaskStore::new(":memory:").unwrap();
        store
            .save_records("lista_dados", &catalog(), &[record(1, "a", "x"), record(2, "b", "y")])
            .unwrap();

        assert_eq!(store.count_rows("lista_dados").unwrap(), 2);
    }

    #[test]
    fn test_replace_on_write_discards_previous_batch() {
        let mut store = TaskStore::new(":memory:").unwrap();
        store
            .save_records("lista_dados", &catalog(), &[record(1, "a", "x"), record(2, "b", "y")])
            .unwrap();
        store
            .save_records("lista_dados", &catalog(), &[record(1, "c", "z")])
            .unwrap();

        assert_eq!(store.count_rows("lista_dados").unwrap(), 1);
        let id: String = store
            .conn
            .query_row("SELECT \"ID\" FROM \"lista_dados\"", [], |row| row.get(0))
            .unwrap();
        assert_eq!(id, "c");
    }

    #[test]
    fn test_catalog_labels_become_columns() {
        let mut store = TaskStore::new(":memory:").unwrap();
        store
            .save_records("lista_dados", &catalog(), &[record(1, "a", "valor do escopo")])
            .unwrap();

        let escopo: String = store
            .conn
            .query_row("SELECT \"ESCOPO\" FROM \"lista_dados\"", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(escopo, "valor do escopo");
    }

    #[test]
    fn test_status_history_roundtrip() {
        let mut store = TaskStore::new(":memory:").unwrap();
        let rows = vec![StatusHistoryRow {
            task_id: "a".to_string(),
            status: "review".to_string(),
            time_in_status: 0.0625,
            timestamp: "01-06-2024 12:00:00".to_string(),
        }];
        store.save_status_history("status_history", &rows).unwrap();

        let days: f64 = store
            .conn
            .query_row("SELECT time_in_status FROM status_history", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(days, 0.0625);
        assert_eq!(store.count_rows("status_history").unwrap(), 1);
    }

    #[test]
    fn test_dataset_name_is_validated() {
        let mut store = TaskStore::new(":memory:").unwrap();
        let result = store.save_records("bad name; DROP TABLE x", &catalog(), &[]);
        assert!(matches!(result, Err(StoreError::InvalidDataset(_))));
    }

    #[test]
    fn test_store_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taskpipe.db");

        {
            let mut store = TaskStore::new(&path).unwrap();
            store
                .save_records("lista_dados", &catalog(), &[record(1, "a", "x")])
                .unwrap();
        }

        let store = TaskStore::new(&path).unwrap();
        assert_eq!(store.count_rows("lista_dados").unwrap(), 1);
    }
}
