use std::path::{Path, PathBuf};

/// Reusable path scratch handed to engine calls that touch table locations.
///
/// Owned by the caller and reused across lines to avoid per-call allocation.
#[derive(Debug, Default)]
pub struct PathBuffer {
    buf: PathBuf,
}

impl PathBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points the buffer at `root/name`, replacing the previous contents.
    pub fn set(&mut self, root: &Path, name: &str) -> &Path {
        self.buf.clear();
        self.buf.push(root);
        self.buf.push(name);
        &self.buf
    }

    pub fn as_path(&self) -> &Path {
        &self.buf
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

/// Reusable append-only byte scratch used while materializing table metadata.
#[derive(Debug, Default)]
pub struct AppendBuffer {
    buf: Vec<u8>,
}

impl AppendBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.buf.clear();
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_str(&mut self, value: &str) {
        self.put_u32(value.len() as u32);
        self.buf.extend_from_slice(value.as_bytes());
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.buf.shrink_to_fit();
    }
}
