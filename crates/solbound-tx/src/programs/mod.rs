//! Instruction builders for the programs the mint transaction touches

pub mod compute_budget;
pub mod mpl_core;
pub mod token;

/// Little-endian, length-prefixed encoder matching the Borsh layout the
/// on-chain programs decode.
#[derive(Debug, Default)]
pub(crate) struct BorshWriter {
    buf: Vec<u8>,
}

impl BorshWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn u8(mut self, v: u8) -> Self {
        self.buf.push(v);
        self
    }

    pub(crate) fn u32(mut self, v: u32) -> Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub(crate) fn u64(mut self, v: u64) -> Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub(crate) fn string(self, s: &str) -> Self {
        let mut this = self.u32(s.len() as u32);
        this.buf.extend_from_slice(s.as_bytes());
        this
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.buf
    }
}
