use crate::{error::Result, types::ColumnType};

/// Column metadata of an open table.
pub trait RecordMetadata {
    fn column_count(&self) -> usize;
    /// Index of the named column, if present.
    fn column_index(&self, name: &str) -> Option<usize>;
    fn column_type(&self, column: usize) -> ColumnType;
    fn column_name(&self, column: usize) -> &str;
}

/// Exclusive handle accepting rows for one table.
///
/// Rows are assembled in place: `new_row` opens a row at the given
/// timestamp, the typed setters fill columns, and `append_row` or
/// `cancel_row` closes it. Appended rows become visible to readers only
/// after `commit`.
pub trait TableWriter: std::fmt::Debug {
    fn name(&self) -> &str;
    fn metadata(&self) -> &dyn RecordMetadata;

    /// Appends a column to the table, returning its index.
    fn add_column(&mut self, name: &str, column_type: ColumnType) -> Result<usize>;

    fn new_row(&mut self, micros: i64);
    fn put_long(&mut self, column: usize, value: i64);
    fn put_bool(&mut self, column: usize, value: bool);
    fn put_str(&mut self, column: usize, value: &str);
    fn put_sym(&mut self, column: usize, value: &str);
    fn put_double(&mut self, column: usize, value: f64);
    fn append_row(&mut self);
    fn cancel_row(&mut self);

    /// Makes all appended rows visible.
    fn commit(&mut self) -> Result<()>;
}
