//! Conversion of explicit line timestamps into engine microseconds.

use snafu::Snafu;

/// The timestamp token was not a valid integer.
#[derive(Debug, Snafu)]
#[snafu(display("invalid numeric value"))]
pub struct NumericError;

/// Parses a line's trailing timestamp token into microseconds since the
/// epoch. The wire unit depends on the producer, so the host picks the
/// adapter matching its clients.
pub trait LineTimestampAdapter: Send + Sync {
    fn micros(&self, token: &str) -> Result<i64, NumericError>;
}

fn parse(token: &str) -> Result<i64, NumericError> {
    token.parse::<i64>().map_err(|_| NumericError)
}

/// Wire timestamps are nanoseconds (the line protocol default).
#[derive(Debug, Default)]
pub struct NanosTimestampAdapter;

impl LineTimestampAdapter for NanosTimestampAdapter {
    fn micros(&self, token: &str) -> Result<i64, NumericError> {
        Ok(parse(token)? / 1_000)
    }
}

/// Wire timestamps are already microseconds.
#[derive(Debug, Default)]
pub struct MicrosTimestampAdapter;

impl LineTimestampAdapter for MicrosTimestampAdapter {
    fn micros(&self, token: &str) -> Result<i64, NumericError> {
        parse(token)
    }
}

/// Wire timestamps are milliseconds.
#[derive(Debug, Default)]
pub struct MillisTimestampAdapter;

impl LineTimestampAdapter for MillisTimestampAdapter {
    fn micros(&self, token: &str) -> Result<i64, NumericError> {
        Ok(parse(token)?.saturating_mul(1_000))
    }
}
