use strata_storage::ColumnType;

use crate::event::TokenAddress;

/// Per-line scratch, reused forever.
///
/// `column_name_type` is populated only while a line targets a table that
/// does not exist yet; `column_index_type` only while appending to an
/// existing table. `column_values` is shared by both and may carry one
/// trailing entry holding the explicit timestamp token.
#[derive(Debug, Default)]
pub(crate) struct RowScratch {
    pub column_name_type: Vec<(TokenAddress, ColumnType)>,
    pub column_index_type: Vec<(usize, ColumnType)>,
    pub column_values: Vec<TokenAddress>,
}

impl RowScratch {
    pub fn clear(&mut self) {
        self.column_name_type.clear();
        self.column_index_type.clear();
        self.column_values.clear();
    }
}
