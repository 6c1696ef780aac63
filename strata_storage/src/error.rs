use snafu::Snafu;

/// Storage engine error types.
///
/// The message associated with an error is surfaced in ingestion logs, so it
/// should name the table involved.
#[derive(Debug, Clone, Snafu)]
#[snafu(visibility(pub))]
pub enum StorageError {
    /// The table does not exist.
    #[snafu(display("table does not exist: {name}"))]
    TableNotFound { name: String },
    /// The table already exists.
    #[snafu(display("table already exists: {name}"))]
    TableAlreadyExists { name: String },
    /// The table's single writer lease is already checked out.
    #[snafu(display("writer is busy: {name}"))]
    WriterBusy { name: String },
    /// The security context does not permit the write.
    #[snafu(display("write permission denied: {name}"))]
    PermissionDenied { name: String },
    /// The table structure handed to create_table is not materializable.
    #[snafu(display("invalid table structure for {name}: {message}"))]
    InvalidStructure { name: String, message: String },
}

pub type Result<T, E = StorageError> = std::result::Result<T, E>;
