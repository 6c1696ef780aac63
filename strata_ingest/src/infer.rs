//! Value-type inference for field tokens.

use strata_storage::ColumnType;
use tracing::error;

/// Classifies a raw field token by its last character.
///
/// The token arrives exactly as it appeared on the wire: strings keep their
/// surrounding quotes, integers keep their trailing `i`. Returns `None` for
/// tokens that cannot be stored (currently only improperly quoted strings).
pub fn infer_value_type(token: &str) -> Option<ColumnType> {
    match token.as_bytes().last()? {
        b'i' => Some(ColumnType::Long),
        // tru(e), fals(e), bare t/T/f/F
        b'e' | b't' | b'T' | b'f' | b'F' => Some(ColumnType::Boolean),
        b'"' => {
            if token.len() < 2 || token.as_bytes()[0] != b'"' {
                error!(value = token, "incorrectly quoted string");
                return None;
            }
            Some(ColumnType::Str)
        }
        _ => Some(ColumnType::Double),
    }
}

/// A boolean token is truthy iff it starts with `t` or `T`.
pub fn is_true(token: &str) -> bool {
    matches!(token.as_bytes().first(), Some(b't') | Some(b'T'))
}
