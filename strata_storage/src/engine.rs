use crate::{
    buffers::{AppendBuffer, PathBuffer},
    config::EngineConfig,
    error::Result,
    structure::TableStructure,
    types::TableStatus,
    writer::TableWriter,
};

/// Caller identity checked on every mutating engine operation.
pub trait SecurityContext: Send + Sync {
    fn can_write(&self, table: &str) -> bool;
}

/// Context that permits everything.
#[derive(Debug, Default)]
pub struct AllowAllSecurityContext;

impl SecurityContext for AllowAllSecurityContext {
    fn can_write(&self, _table: &str) -> bool {
        true
    }
}

/// The storage engine consumed by ingestion.
///
/// Writers are exclusive: a table's writer can be checked out by at most one
/// caller at a time, and `writer` fails while the lease is out.
pub trait StorageEngine: Send + Sync {
    fn configuration(&self) -> &EngineConfig;

    /// Resolves what the given name refers to.
    fn status(&self, ctx: &dyn SecurityContext, path: &mut PathBuffer, name: &str) -> TableStatus;

    /// Checks out the table's writer lease.
    fn writer(&self, ctx: &dyn SecurityContext, name: &str) -> Result<Box<dyn TableWriter>>;

    /// Materializes a new table from the given structure view.
    fn create_table(
        &self,
        ctx: &dyn SecurityContext,
        mem: &mut AppendBuffer,
        path: &mut PathBuffer,
        structure: &dyn TableStructure,
    ) -> Result<()>;
}
