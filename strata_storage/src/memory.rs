//! In-memory implementation of the storage engine.
//!
//! Suitable for development and testing. Rows appended through a writer stay
//! private to that writer until `commit`; the single-writer lease per table
//! is enforced the same way the durable engine enforces it.

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard},
};

use snafu::OptionExt;
use tracing::debug;

use crate::{
    buffers::{AppendBuffer, PathBuffer},
    config::EngineConfig,
    engine::{SecurityContext, StorageEngine},
    error::{
        InvalidStructureSnafu, PermissionDeniedSnafu, Result, TableAlreadyExistsSnafu,
        TableNotFoundSnafu, WriterBusySnafu,
    },
    structure::TableStructure,
    types::{ColumnType, TableStatus, Value},
    writer::{RecordMetadata, TableWriter},
};

/// Name and type of one table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    pub column_type: ColumnType,
}

/// Point-in-time copy of a table's schema and committed rows.
#[derive(Debug, Clone)]
pub struct TableSnapshot {
    pub columns: Vec<ColumnMeta>,
    pub timestamp_index: usize,
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug)]
struct TableData {
    columns: Vec<ColumnMeta>,
    timestamp_index: usize,
    rows: Vec<Vec<Value>>,
    writer_out: bool,
}

#[derive(Debug, Default)]
struct EngineStore {
    tables: HashMap<String, Arc<Mutex<TableData>>>,
    status_overrides: HashMap<String, TableStatus>,
}

/// In-memory storage engine.
#[derive(Debug)]
pub struct MemoryEngine {
    config: EngineConfig,
    root: PathBuf,
    store: Mutex<EngineStore>,
}

impl MemoryEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            root: PathBuf::from("mem:"),
            store: Mutex::new(EngineStore::default()),
        }
    }

    /// Forces `status` to report the given value for a name.
    pub fn set_status_override(&self, name: &str, status: TableStatus) {
        self.lock_store()
            .status_overrides
            .insert(name.to_string(), status);
    }

    /// Copies out the named table's schema and committed rows.
    pub fn snapshot(&self, name: &str) -> Option<TableSnapshot> {
        let table = self.lock_store().tables.get(name).cloned()?;
        let data = lock(&table);
        Some(TableSnapshot {
            columns: data.columns.clone(),
            timestamp_index: data.timestamp_index,
            rows: data.rows.clone(),
        })
    }

    fn lock_store(&self) -> MutexGuard<'_, EngineStore> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn lock(table: &Mutex<TableData>) -> MutexGuard<'_, TableData> {
    table.lock().unwrap_or_else(|e| e.into_inner())
}

impl StorageEngine for MemoryEngine {
    fn configuration(&self) -> &EngineConfig {
        &self.config
    }

    fn status(&self, _ctx: &dyn SecurityContext, path: &mut PathBuffer, name: &str) -> TableStatus {
        path.set(&self.root, name);
        let store = self.lock_store();
        if let Some(status) = store.status_overrides.get(name) {
            return *status;
        }
        if store.tables.contains_key(name) {
            TableStatus::Exists
        } else {
            TableStatus::DoesNotExist
        }
    }

    fn writer(&self, ctx: &dyn SecurityContext, name: &str) -> Result<Box<dyn TableWriter>> {
        if !ctx.can_write(name) {
            return PermissionDeniedSnafu { name }.fail();
        }

        let table = self
            .lock_store()
            .tables
            .get(name)
            .cloned()
            .context(TableNotFoundSnafu { name })?;

        let meta = {
            let mut data = lock(&table);
            if data.writer_out {
                return WriterBusySnafu { name }.fail();
            }
            data.writer_out = true;
            WriterMetadata {
                columns: data.columns.clone(),
                timestamp_index: data.timestamp_index,
            }
        };

        Ok(Box::new(MemoryTableWriter {
            name: name.to_string(),
            table,
            meta,
            pending: Vec::new(),
            current: None,
        }))
    }

    fn create_table(
        &self,
        ctx: &dyn SecurityContext,
        mem: &mut AppendBuffer,
        path: &mut PathBuffer,
        structure: &dyn TableStructure,
    ) -> Result<()> {
        let name = structure.table_name().to_string();
        if !ctx.can_write(&name) {
            return PermissionDeniedSnafu { name }.fail();
        }
        path.set(&self.root, &name);

        let column_count = structure.column_count();
        let timestamp_index = structure.timestamp_index();
        if timestamp_index >= column_count
            || structure.column_type(timestamp_index) != ColumnType::Timestamp
        {
            return InvalidStructureSnafu {
                name,
                message: "designated timestamp column is missing".to_string(),
            }
            .fail();
        }

        let mut columns = Vec::with_capacity(column_count);
        for i in 0..column_count {
            let column_name = structure.column_name(i);
            if columns.iter().any(|c: &ColumnMeta| c.name == column_name) {
                return InvalidStructureSnafu {
                    name,
                    message: format!("duplicate column name: {column_name}"),
                }
                .fail();
            }
            columns.push(ColumnMeta {
                name: column_name.to_string(),
                column_type: structure.column_type(i),
            });
        }

        // Metadata image, written through the caller's append scratch the
        // way the durable engine writes its _meta file.
        mem.reset();
        mem.put_str(&name);
        mem.put_u32(column_count as u32);
        for (i, column) in columns.iter().enumerate() {
            mem.put_str(&column.name);
            mem.put_str(column.column_type.name());
            mem.put_u8(structure.indexed(i) as u8);
        }
        mem.put_u32(timestamp_index as u32);

        let mut store = self.lock_store();
        if store.tables.contains_key(&name) {
            return TableAlreadyExistsSnafu { name }.fail();
        }

        debug!(table = %name, columns = column_count, meta_bytes = mem.len(), "table created");
        store.tables.insert(
            name,
            Arc::new(Mutex::new(TableData {
                columns,
                timestamp_index,
                rows: Vec::new(),
                writer_out: false,
            })),
        );

        Ok(())
    }
}

/// Writer-local schema view, kept in sync with the shared table by the
/// exclusive lease.
#[derive(Debug, Clone)]
pub struct WriterMetadata {
    columns: Vec<ColumnMeta>,
    timestamp_index: usize,
}

impl RecordMetadata for WriterMetadata {
    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    fn column_type(&self, column: usize) -> ColumnType {
        self.columns[column].column_type
    }

    fn column_name(&self, column: usize) -> &str {
        &self.columns[column].name
    }
}

/// Exclusive writer over one in-memory table.
#[derive(Debug)]
pub struct MemoryTableWriter {
    name: String,
    table: Arc<Mutex<TableData>>,
    meta: WriterMetadata,
    pending: Vec<Vec<Value>>,
    current: Option<Vec<Value>>,
}

impl MemoryTableWriter {
    fn put(&mut self, column: usize, value: Value) {
        if let Some(row) = &mut self.current {
            if let Some(meta) = self.meta.columns.get(column) {
                debug_assert_eq!(value.column_type(), Some(meta.column_type));
            }
            if column >= row.len() {
                row.resize(column + 1, Value::Null);
            }
            row[column] = value;
        }
    }
}

impl TableWriter for MemoryTableWriter {
    fn name(&self) -> &str {
        &self.name
    }

    fn metadata(&self) -> &dyn RecordMetadata {
        &self.meta
    }

    fn add_column(&mut self, name: &str, column_type: ColumnType) -> Result<usize> {
        if self.meta.column_index(name).is_some() {
            return InvalidStructureSnafu {
                name: self.name.clone(),
                message: format!("column already exists: {name}"),
            }
            .fail();
        }

        let column = ColumnMeta {
            name: name.to_string(),
            column_type,
        };

        let index = {
            let mut data = lock(&self.table);
            data.columns.push(column.clone());
            let width = data.columns.len();
            for row in &mut data.rows {
                row.resize(width, Value::Null);
            }
            width - 1
        };

        for row in &mut self.pending {
            row.resize(index + 1, Value::Null);
        }
        if let Some(row) = &mut self.current {
            row.resize(index + 1, Value::Null);
        }
        self.meta.columns.push(column);

        Ok(index)
    }

    fn new_row(&mut self, micros: i64) {
        let mut row = vec![Value::Null; self.meta.columns.len()];
        row[self.meta.timestamp_index] = Value::Timestamp(micros);
        self.current = Some(row);
    }

    fn put_long(&mut self, column: usize, value: i64) {
        self.put(column, Value::Long(value));
    }

    fn put_bool(&mut self, column: usize, value: bool) {
        self.put(column, Value::Boolean(value));
    }

    fn put_str(&mut self, column: usize, value: &str) {
        self.put(column, Value::Str(value.to_string()));
    }

    fn put_sym(&mut self, column: usize, value: &str) {
        self.put(column, Value::Symbol(value.to_string()));
    }

    fn put_double(&mut self, column: usize, value: f64) {
        self.put(column, Value::Double(value));
    }

    fn append_row(&mut self) {
        if let Some(row) = self.current.take() {
            self.pending.push(row);
        }
    }

    fn cancel_row(&mut self) {
        self.current = None;
    }

    fn commit(&mut self) -> Result<()> {
        let mut data = lock(&self.table);
        let width = data.columns.len();
        for mut row in self.pending.drain(..) {
            row.resize(width, Value::Null);
            data.rows.push(row);
        }
        Ok(())
    }
}

impl Drop for MemoryTableWriter {
    fn drop(&mut self) {
        lock(&self.table).writer_out = false;
    }
}
