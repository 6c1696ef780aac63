//! The event protocol emitted by the upstream line tokenizer.

/// One tokenizer event within a line.
///
/// A well-formed line arrives as `Measurement`, zero or more
/// `TagName`/`TagValue` pairs, zero or more `FieldName`/`FieldValue` pairs,
/// at most one `Timestamp`, and then a line-end callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent {
    Measurement,
    TagName,
    TagValue,
    FieldName,
    FieldValue,
    Timestamp,
}

/// Address of an interned character sequence in the tokenizer's cache.
///
/// Addresses stay resolvable through the [`TokenCache`] for the duration of
/// the current line; they must not be retained across lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenAddress(u64);

impl TokenAddress {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Read-only view of the tokenizer's intern cache.
pub trait TokenCache {
    /// Resolves an address to its character sequence.
    fn text(&self, address: TokenAddress) -> &str;
}

/// A token handed to `on_event`: its cache address plus the resolved text.
#[derive(Debug, Clone, Copy)]
pub struct CachedToken<'a> {
    address: TokenAddress,
    text: &'a str,
}

impl<'a> CachedToken<'a> {
    pub fn new(address: TokenAddress, text: &'a str) -> Self {
        Self { address, text }
    }

    pub fn address(&self) -> TokenAddress {
        self.address
    }

    pub fn text(&self) -> &'a str {
        self.text
    }
}
