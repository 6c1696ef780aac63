//! Typed column setters that cast a raw token into a row cell.

use strata_storage::{ColumnType, TableWriter};
use tracing::error;

use crate::infer::is_true;

/// A token could not be cast to its column's type.
///
/// Aborts the whole row: the caller cancels the open row and abandons the
/// line. The writer itself stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BadCast;

/// Writes a column value to the open row, interpreting the token per the
/// column type.
pub(crate) fn put_value(
    writer: &mut dyn TableWriter,
    column: usize,
    column_type: ColumnType,
    token: &str,
) -> Result<(), BadCast> {
    match column_type {
        ColumnType::Long => {
            // strip the trailing `i`
            let digits = &token[..token.len() - 1];
            match digits.parse::<i64>() {
                Ok(value) => writer.put_long(column, value),
                Err(_) => {
                    error!(value = token, "not a LONG");
                    return Err(BadCast);
                }
            }
        }
        ColumnType::Boolean => writer.put_bool(column, is_true(token)),
        ColumnType::Str => writer.put_str(column, &token[1..token.len() - 1]),
        ColumnType::Symbol => writer.put_sym(column, token),
        ColumnType::Double => match token.parse::<f64>() {
            Ok(value) => writer.put_double(column, value),
            Err(_) => {
                error!(value = token, "not a DOUBLE");
                return Err(BadCast);
            }
        },
        ColumnType::Timestamp => return Err(BadCast),
    }
    Ok(())
}
