//! The event-driven ingest state machine.
//!
//! ## Data flow
//!
//! **Tokenizer**: [`LineEvent`] stream -> per-line scratch.
//!
//! **Line end**: scratch -> one row in the bound table's writer (creating
//! the table first when needed).
//!
//! **Host**: `commit_all` -> rows become visible.

use std::sync::Arc;

use strata_storage::{
    AppendBuffer, ColumnType, MicrosecondClock, PathBuffer, SecurityContext, StorageEngine,
    StorageError, TableStatus,
};
use tracing::{debug, error, info};

use crate::{
    cache::{CommitList, Slot, TableLifecycle, WriterCache},
    event::{CachedToken, LineEvent, TokenAddress, TokenCache},
    infer::infer_value_type,
    row::put_value,
    scratch::RowScratch,
    table::LineTableStructure,
    timestamp::LineTimestampAdapter,
};

/// Behavior of the four mode-dispatched handler positions (line-end,
/// field-name, field-value, tag-value). A single tag rebinds all four at
/// once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// No measurement seen yet; everything is a no-op.
    Unbound,
    /// The bound table has a writer; events bind to its columns.
    Append,
    /// The bound table does not exist; events accumulate its structure.
    NewTable,
    /// The rest of this line is dropped.
    SkipLine,
}

/// What the pending field/tag value will be written to, set by the
/// preceding name event.
#[derive(Debug, Clone, Copy)]
enum ColumnBinding {
    /// The name resolved to an existing column.
    Existing { index: usize, column_type: ColumnType },
    /// The name is not a column yet; the value's inferred type decides it.
    New { name: TokenAddress },
}

/// Consumes tokenizer events and materializes them as rows.
///
/// Malformed input never surfaces to the caller: every failure is logged
/// and absorbed by dropping the offending row or line. The only fallible
/// host-facing operation is [`commit_all`](Self::commit_all).
pub struct LineProtoParser {
    engine: Arc<dyn StorageEngine>,
    security_ctx: Arc<dyn SecurityContext>,
    timestamp_adapter: Arc<dyn LineTimestampAdapter>,
    clock: Arc<dyn MicrosecondClock>,
    path: PathBuffer,
    append_mem: AppendBuffer,
    cache: WriterCache,
    commit_list: CommitList,
    scratch: RowScratch,
    mode: Mode,
    /// Cache entry bound by the current line's measurement, if any.
    active: Option<Slot>,
    binding: Option<ColumnBinding>,
    /// Name of the table being created, valid while in `NewTable` mode.
    table_name: TokenAddress,
}

impl LineProtoParser {
    pub fn new(
        engine: Arc<dyn StorageEngine>,
        security_ctx: Arc<dyn SecurityContext>,
        timestamp_adapter: Arc<dyn LineTimestampAdapter>,
    ) -> Self {
        let clock = engine.configuration().clock.clone();
        Self {
            engine,
            security_ctx,
            timestamp_adapter,
            clock,
            path: PathBuffer::new(),
            append_mem: AppendBuffer::new(),
            cache: WriterCache::default(),
            commit_list: CommitList::default(),
            scratch: RowScratch::default(),
            mode: Mode::Unbound,
            active: None,
            binding: None,
            table_name: TokenAddress::default(),
        }
    }

    /// Feeds one tokenizer event into the state machine.
    pub fn on_event(&mut self, event: LineEvent, token: CachedToken<'_>, cache: &dyn TokenCache) {
        match event {
            LineEvent::Measurement => self.on_measurement(token),
            LineEvent::FieldName | LineEvent::TagName => self.on_field_name(token),
            LineEvent::TagValue => self.on_tag_value(token, cache),
            LineEvent::FieldValue => self.on_field_value(token, cache),
            LineEvent::Timestamp => self.scratch.column_values.push(token.address()),
        }
    }

    /// Finalizes the current line in the current mode and resets scratch.
    pub fn on_line_end(&mut self, cache: &dyn TokenCache) {
        let result = match self.mode {
            Mode::Append => self.append_row(cache),
            Mode::NewTable => self.create_table_and_append_row(cache),
            Mode::SkipLine | Mode::Unbound => Ok(()),
        };
        if let Err(err) = result {
            error!(error = %err, "line dropped");
        }
        self.clear_state();
    }

    /// Abandons the current line after a tokenizer failure.
    pub fn on_error(&mut self, position: usize, state: u32, code: u32) {
        debug!(position, state, code, "tokenizer error, line abandoned");
        self.clear_state();
    }

    /// Commits the active writer and every writer displaced since the last
    /// call, then clears the commit list.
    pub fn commit_all(&mut self) -> Result<(), StorageError> {
        if let Some(slot) = self.active {
            if let Some(writer) = self.cache.writer_mut(slot) {
                writer.commit()?;
            }
        }
        for slot in self.commit_list.iter() {
            if let Some(writer) = self.cache.writer_mut(slot) {
                writer.commit()?;
            }
        }
        self.commit_list.clear();
        Ok(())
    }

    /// Releases scratch memory and every cached writer. Uncommitted rows
    /// are dropped, not committed.
    pub fn close(mut self) {
        self.path.clear();
        self.append_mem.clear();
        self.cache.release_all();
    }

    fn on_measurement(&mut self, token: CachedToken<'_>) {
        let found = self.cache.lookup(token.text());
        match found {
            // Same table as the previous line. Make sure we append in case
            // the entry was still in create mode.
            Some(slot) if self.active == Some(slot) => {
                if self.cache.entry(slot).writer.is_some() {
                    self.mode = Mode::Append;
                } else {
                    self.init_cache_entry(token, slot);
                }
            }
            _ => self.switch_table(token, found),
        }
    }

    fn switch_table(&mut self, token: CachedToken<'_>, found: Option<Slot>) {
        if let Some(prev) = self.active {
            if let Some(writer) = &self.cache.entry(prev).writer {
                let name = writer.name().to_string();
                self.commit_list.add(&name, prev);
            }
        }

        let slot = match found {
            Some(slot) => slot,
            None => self.cache.insert(token.text()),
        };
        self.active = Some(slot);

        if self.cache.entry(slot).writer.is_some() {
            self.mode = Mode::Append;
        } else {
            self.init_cache_entry(token, slot);
        }
    }

    fn init_cache_entry(&mut self, token: CachedToken<'_>, slot: Slot) {
        match self.cache.entry(slot).state {
            TableLifecycle::Unresolved => {
                let status =
                    self.engine
                        .status(&*self.security_ctx, &mut self.path, token.text());
                match status {
                    TableStatus::Exists => {
                        self.cache.entry_mut(slot).state = TableLifecycle::Known;
                        self.cache_writer(token, slot);
                    }
                    TableStatus::DoesNotExist => {
                        self.table_name = token.address();
                        self.mode = Mode::NewTable;
                    }
                    other => {
                        error!(table = %token.text(), status = ?other, "table name is not usable");
                        self.cache.entry_mut(slot).state = TableLifecycle::Unusable;
                        self.mode = Mode::SkipLine;
                    }
                }
            }
            TableLifecycle::Known => self.cache_writer(token, slot),
            TableLifecycle::Unusable => self.mode = Mode::SkipLine,
        }
    }

    fn cache_writer(&mut self, token: CachedToken<'_>, slot: Slot) {
        match self.engine.writer(&*self.security_ctx, token.text()) {
            Ok(writer) => {
                info!(table = %token.text(), "cached writer");
                self.cache.entry_mut(slot).writer = Some(writer);
                self.mode = Mode::Append;
            }
            Err(err) => {
                error!(table = %token.text(), error = %err, "could not acquire writer");
                self.mode = Mode::SkipLine;
            }
        }
    }

    fn on_field_name(&mut self, token: CachedToken<'_>) {
        match self.mode {
            Mode::Append => self.append_field_name(token),
            Mode::NewTable => {
                self.binding = Some(ColumnBinding::New {
                    name: token.address(),
                });
            }
            Mode::SkipLine | Mode::Unbound => {}
        }
    }

    fn append_field_name(&mut self, token: CachedToken<'_>) {
        let Some(slot) = self.active else { return };
        let Some(writer) = self.cache.entry(slot).writer.as_deref() else {
            return;
        };
        let metadata = writer.metadata();
        self.binding = Some(match metadata.column_index(token.text()) {
            Some(index) => ColumnBinding::Existing {
                index,
                column_type: metadata.column_type(index),
            },
            None => ColumnBinding::New {
                name: token.address(),
            },
        });
    }

    fn on_field_value(&mut self, token: CachedToken<'_>, cache: &dyn TokenCache) {
        match self.mode {
            Mode::Append => match infer_value_type(token.text()) {
                Some(value_type) => self.append_value(token, value_type, cache),
                None => self.mode = Mode::SkipLine,
            },
            Mode::NewTable => match infer_value_type(token.text()) {
                Some(value_type) => self.new_table_value(token, value_type),
                None => self.mode = Mode::SkipLine,
            },
            Mode::SkipLine | Mode::Unbound => {}
        }
    }

    fn on_tag_value(&mut self, token: CachedToken<'_>, cache: &dyn TokenCache) {
        match self.mode {
            Mode::Append => self.append_value(token, ColumnType::Symbol, cache),
            Mode::NewTable => self.new_table_value(token, ColumnType::Symbol),
            Mode::SkipLine | Mode::Unbound => {}
        }
    }

    fn append_value(
        &mut self,
        token: CachedToken<'_>,
        value_type: ColumnType,
        cache: &dyn TokenCache,
    ) {
        match self.binding {
            Some(ColumnBinding::Existing { index, column_type }) if column_type == value_type => {
                self.scratch.column_index_type.push((index, value_type));
                self.scratch.column_values.push(token.address());
            }
            Some(ColumnBinding::Existing { index, column_type }) => {
                self.log_type_mismatch(index, column_type, value_type);
                self.mode = Mode::SkipLine;
            }
            Some(ColumnBinding::New { name }) => {
                self.add_column(name, token, value_type, cache);
            }
            None => self.mode = Mode::SkipLine,
        }
    }

    fn add_column(
        &mut self,
        name: TokenAddress,
        token: CachedToken<'_>,
        value_type: ColumnType,
        cache: &dyn TokenCache,
    ) {
        let Some(slot) = self.active else { return };
        let Some(writer) = self.cache.writer_mut(slot) else {
            return;
        };
        match writer.add_column(cache.text(name), value_type) {
            Ok(index) => {
                self.scratch.column_index_type.push((index, value_type));
                self.scratch.column_values.push(token.address());
            }
            Err(err) => {
                error!(column = cache.text(name), error = %err, "could not add column");
                self.mode = Mode::SkipLine;
            }
        }
    }

    fn new_table_value(&mut self, token: CachedToken<'_>, value_type: ColumnType) {
        let Some(ColumnBinding::New { name }) = self.binding else {
            self.mode = Mode::SkipLine;
            return;
        };
        self.scratch.column_name_type.push((name, value_type));
        self.scratch.column_values.push(token.address());
    }

    fn log_type_mismatch(&self, index: usize, column_type: ColumnType, value_type: ColumnType) {
        let Some(slot) = self.active else { return };
        let Some(writer) = self.cache.entry(slot).writer.as_deref() else {
            return;
        };
        error!(
            table = %writer.name(),
            column = %writer.metadata().column_name(index),
            column_type = %column_type,
            value_type = %value_type,
            "mismatched column and value types"
        );
    }

    /// Resolves the row timestamp: wall clock when the line carried no
    /// timestamp token, otherwise the trailing scratch value parsed through
    /// the timestamp adapter. `None` means the row must be dropped.
    fn row_timestamp(&self, column_count: usize, cache: &dyn TokenCache) -> Option<i64> {
        let value_count = self.scratch.column_values.len();
        if value_count == column_count {
            return Some(self.clock.ticks());
        }
        let token = cache.text(self.scratch.column_values[value_count - 1]);
        match self.timestamp_adapter.micros(token) {
            Ok(micros) => Some(micros),
            Err(_) => {
                error!(value = token, "invalid timestamp");
                None
            }
        }
    }

    fn append_row(&mut self, cache: &dyn TokenCache) -> Result<(), StorageError> {
        let Some(slot) = self.active else {
            return Ok(());
        };
        let column_count = self.scratch.column_index_type.len();
        let Some(micros) = self.row_timestamp(column_count, cache) else {
            return Ok(());
        };
        let Some(writer) = self.cache.writer_mut(slot) else {
            return Ok(());
        };

        writer.new_row(micros);
        for i in 0..column_count {
            let (index, column_type) = self.scratch.column_index_type[i];
            let token = cache.text(self.scratch.column_values[i]);
            if put_value(writer, index, column_type, token).is_err() {
                writer.cancel_row();
                return Ok(());
            }
        }
        writer.append_row();
        Ok(())
    }

    fn create_table_and_append_row(&mut self, cache: &dyn TokenCache) -> Result<(), StorageError> {
        let structure = LineTableStructure::new(
            cache,
            self.table_name,
            &self.scratch.column_name_type,
            self.engine.configuration(),
        );
        self.engine.create_table(
            &*self.security_ctx,
            &mut self.append_mem,
            &mut self.path,
            &structure,
        )?;
        self.append_first_row_and_cache_writer(cache)
    }

    fn append_first_row_and_cache_writer(
        &mut self,
        cache: &dyn TokenCache,
    ) -> Result<(), StorageError> {
        let writer = self
            .engine
            .writer(&*self.security_ctx, cache.text(self.table_name))?;
        let Some(slot) = self.active else {
            return Ok(());
        };
        self.cache.entry_mut(slot).writer = Some(writer);

        let column_count = self.scratch.column_name_type.len();
        let Some(micros) = self.row_timestamp(column_count, cache) else {
            return Ok(());
        };
        let Some(writer) = self.cache.writer_mut(slot) else {
            return Ok(());
        };

        // First-row column indices are implicit: the table was created from
        // the scratch pairs in order.
        writer.new_row(micros);
        for i in 0..column_count {
            let (_, column_type) = self.scratch.column_name_type[i];
            let token = cache.text(self.scratch.column_values[i]);
            if put_value(writer, i, column_type, token).is_err() {
                writer.cancel_row();
                return Ok(());
            }
        }
        writer.append_row();
        Ok(())
    }

    fn clear_state(&mut self) {
        self.scratch.clear();
        self.binding = None;
    }
}
