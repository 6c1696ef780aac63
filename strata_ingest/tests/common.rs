#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use strata_ingest::{
    CachedToken, LineEvent, LineProtoParser, MicrosTimestampAdapter, TokenAddress, TokenCache,
};
use strata_storage::{
    AllowAllSecurityContext, AppendBuffer, ColumnType, EngineConfig, FixedClock, MemoryEngine,
    PartitionBy, PathBuffer, StorageEngine, TableStructure,
};

/// Clock value used for rows without an explicit timestamp.
pub const WALL_CLOCK_MICROS: i64 = 1_600_000_000_000_000;

/// Interning pool standing in for the upstream lexer's character cache.
#[derive(Default)]
pub struct TokenPool {
    entries: Vec<String>,
    index: HashMap<String, TokenAddress>,
}

impl TokenPool {
    pub fn intern(&mut self, text: &str) -> TokenAddress {
        if let Some(address) = self.index.get(text) {
            return *address;
        }
        let address = TokenAddress::new(self.entries.len() as u64);
        self.entries.push(text.to_string());
        self.index.insert(text.to_string(), address);
        address
    }

    pub fn token(&self, address: TokenAddress) -> CachedToken<'_> {
        CachedToken::new(address, self.text(address))
    }
}

impl TokenCache for TokenPool {
    fn text(&self, address: TokenAddress) -> &str {
        &self.entries[address.raw() as usize]
    }
}

/// Engine plus parser wired the way a line-protocol server wires them:
/// deterministic clock, microsecond wire timestamps, permissive context.
pub fn create_parser() -> (Arc<MemoryEngine>, LineProtoParser) {
    let clock = Arc::new(FixedClock::new(WALL_CLOCK_MICROS));
    let config = EngineConfig::default().with_clock(clock);
    let engine = Arc::new(MemoryEngine::new(config));
    let parser = LineProtoParser::new(
        engine.clone(),
        Arc::new(AllowAllSecurityContext),
        Arc::new(MicrosTimestampAdapter),
    );
    (engine, parser)
}

/// Interns every token of a line, replays its events, and ends the line.
pub fn feed_line(
    parser: &mut LineProtoParser,
    pool: &mut TokenPool,
    events: &[(LineEvent, &str)],
) {
    let addresses: Vec<TokenAddress> = events.iter().map(|(_, text)| pool.intern(text)).collect();
    for ((event, _), address) in events.iter().zip(addresses) {
        parser.on_event(*event, pool.token(address), &*pool);
    }
    parser.on_line_end(&*pool);
}

/// Table structure with a trailing `timestamp` column, for tests that need
/// a table to exist before any line references it.
pub struct FixedStructure {
    name: String,
    columns: Vec<(String, ColumnType)>,
}

impl TableStructure for FixedStructure {
    fn table_name(&self) -> &str {
        &self.name
    }

    fn column_count(&self) -> usize {
        self.columns.len() + 1
    }

    fn column_name(&self, column: usize) -> &str {
        if column == self.timestamp_index() {
            return "timestamp";
        }
        &self.columns[column].0
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
        true
    }

    fn symbol_capacity(&self, _column: usize) -> usize {
        128
    }

    fn partition_by(&self) -> PartitionBy {
        PartitionBy::None
    }

    fn timestamp_index(&self) -> usize {
        self.columns.len()
    }
}

pub fn create_table(engine: &MemoryEngine, name: &str, columns: &[(&str, ColumnType)]) {
    let structure = FixedStructure {
        name: name.to_string(),
        columns: columns
            .iter()
            .map(|(name, column_type)| (name.to_string(), *column_type))
            .collect(),
    };
    let ctx = AllowAllSecurityContext;
    let mut mem = AppendBuffer::new();
    let mut path = PathBuffer::new();
    engine
        .create_table(&ctx, &mut mem, &mut path, &structure)
        .expect("create table");
}
