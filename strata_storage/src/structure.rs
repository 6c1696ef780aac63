use crate::types::{ColumnType, PartitionBy};

/// A view of the structure of a table about to be created.
///
/// Implementations are typically short-lived adapters over whatever the
/// caller has accumulated; the engine reads the view once while
/// materializing the table.
pub trait TableStructure {
    fn table_name(&self) -> &str;
    fn column_count(&self) -> usize;
    fn column_name(&self, column: usize) -> &str;
    fn column_type(&self, column: usize) -> ColumnType;
    /// Whether the column carries a secondary index.
    fn indexed(&self, column: usize) -> bool;
    fn index_block_capacity(&self, column: usize) -> usize;
    fn symbol_cache_flag(&self, column: usize) -> bool;
    fn symbol_capacity(&self, column: usize) -> usize;
    fn partition_by(&self) -> PartitionBy;
    /// Index of the designated timestamp column.
    fn timestamp_index(&self) -> usize;
}
