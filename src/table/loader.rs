use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};
use crate::error::{PoValidateError, Result};
use super::store::TableStore;
use super::table::Table;
use super::value::Value;
use super::PROCUREMENT_TABLES;

/// Reads `<name>.csv` files from a directory into a [`TableStore`].
pub struct TableLoader {
    tables: Vec<String>,
}

impl TableLoader {
    pub fn new(tables: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            tables: tables.into_iter().map(Into::into).collect(),
        }
    }

    pub fn procurement() -> Self {
        Self::new(PROCUREMENT_TABLES.iter().copied())
    }

    /// Loads every configured table. A missing file aborts the whole load.
    pub fn load_dir(&self, dir: impl AsRef<Path>) -> Result<TableStore> {
        let dir = dir.as_ref();
        let mut store = TableStore::new();

        for name in &self.tables {
            let path = dir.join(format!("{}.csv", name));
            if !path.exists() {
                return Err(PoValidateError::TableNotFound(path.display().to_string()));
            }
            let table = self.load_file(name, &path)?;
            info!("Loaded {} ({} rows) from {}", name, table.row_count(), path.display());
            store.insert(table);
        }

        Ok(store)
    }

    pub fn load_file(&self, name: &str, path: impl AsRef<Path>) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path.as_ref())?;

        let headers = dedupe_headers(name, reader.headers()?.iter());
        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];

        for record in reader.records() {
            let record = record?;
            for (idx, column) in columns.iter_mut().enumerate() {
                column.push(record.get(idx).map(Value::parse_cell).unwrap_or_default());
            }
        }

        debug!("Parsed {} columns for {}", headers.len(), name);

        let mut table = Table::new(name);
        for (header, values) in headers.into_iter().zip(columns) {
            table.push_column(header, values)?;
        }
        Ok(table)
    }
}

/// Renames repeated headers to `a.1`, `a.2`, ... so every column survives.
/// A generated name that is already taken gets its own suffix in turn.
fn dedupe_headers<'h>(table: &str, headers: impl Iterator<Item = &'h str>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    headers
        .map(|header| {
            let mut name = header.to_string();
            let mut count = counts.get(&name).copied().unwrap_or(0);
            while count > 0 {
                counts.insert(name.clone(), count + 1);
                name = format!("{}.{}", name, count);
                count = counts.get(&name).copied().unwrap_or(0);
            }
            counts.insert(name.clone(), count + 1);
            if name != header {
                warn!("Duplicate column '{}' in {}: renamed to '{}'", header, table, name);
            }
            name
        })
        .collect()
}

impl Default for TableLoader {
    fn default() -> Self {
        Self::procurement()
    }
}
