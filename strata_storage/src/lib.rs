pub mod buffers;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod memory;
pub mod structure;
pub mod types;
pub mod writer;

pub use buffers::{AppendBuffer, PathBuffer};
pub use clock::{FixedClock, MicrosecondClock, OsMicrosecondClock};
pub use config::EngineConfig;
pub use engine::{AllowAllSecurityContext, SecurityContext, StorageEngine};
pub use error::{Result, StorageError};
pub use memory::{ColumnMeta, MemoryEngine, MemoryTableWriter, TableSnapshot};
pub use structure::TableStructure;
pub use types::{ColumnType, PartitionBy, TableStatus, Value};
pub use writer::{RecordMetadata, TableWriter};
