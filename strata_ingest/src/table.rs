//! Table-structure view synthesized from the current line.

use strata_storage::{ColumnType, EngineConfig, PartitionBy, TableStructure};

use crate::event::{TokenAddress, TokenCache};

/// Borrowing [`TableStructure`] over the line's accumulated column
/// names/types, with a synthetic trailing `timestamp` column that is also
/// the designated timestamp.
///
/// Built lazily at line end when the target table does not exist yet.
pub struct LineTableStructure<'a> {
    cache: &'a dyn TokenCache,
    table_name: TokenAddress,
    columns: &'a [(TokenAddress, ColumnType)],
    config: &'a EngineConfig,
}

impl<'a> LineTableStructure<'a> {
    pub fn new(
        cache: &'a dyn TokenCache,
        table_name: TokenAddress,
        columns: &'a [(TokenAddress, ColumnType)],
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            cache,
            table_name,
            columns,
            config,
        }
    }
}

impl TableStructure for LineTableStructure<'_> {
    fn table_name(&self) -> &str {
        self.cache.text(self.table_name)
    }

    fn column_count(&self) -> usize {
        self.columns.len() + 1
    }

    fn column_name(&self, column: usize) -> &str {
        if column == self.timestamp_index() {
            return "timestamp";
        }
        self.cache.text(self.columns[column].0)
    }

    fn column_type(&self, column: usize) -> ColumnType {
        if column == self.timestamp_index() {
            return ColumnType::Timestamp;
        }
        self.columns[column].1
    }

    fn indexed(&self, _column: usize) -> bool {
        false
    }

    fn index_block_capacity(&self, _column: usize) -> usize {
        0
    }

    fn symbol_cache_flag(&self, _column: usize) -> bool {
        self.config.default_symbol_cache_flag
    }

    fn symbol_capacity(&self, _column: usize) -> usize {
        self.config.default_symbol_capacity
    }

    fn partition_by(&self) -> PartitionBy {
        PartitionBy::None
    }

    fn timestamp_index(&self) -> usize {
        self.columns.len()
    }
}
