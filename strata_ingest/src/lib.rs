pub mod cache;
pub mod event;
pub mod infer;
pub mod parser;
pub mod table;
pub mod timestamp;

mod row;
mod scratch;

pub use event::{CachedToken, LineEvent, TokenAddress, TokenCache};
pub use parser::LineProtoParser;
pub use timestamp::{
    LineTimestampAdapter, MicrosTimestampAdapter, MillisTimestampAdapter, NanosTimestampAdapter,
};
