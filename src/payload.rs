use rand::{distributions::Alphanumeric, Rng};
use std::fmt::Write;

pub const TERMINATOR: u8 = b'\n';

/// Bytes sent in one trial. Text carries a newline terminator and
/// completes on seeing it; Raw has no terminator and completes on
/// reaching the expected byte count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(Vec<u8>),
    Raw(Vec<u8>),
}

impl Payload {
    /// `len` random alphanumeric bytes plus one trailing newline.
    pub fn random_text(len: usize) -> Self {
        let mut bytes: Vec<u8> = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(len)
            .collect();
        bytes.push(TERMINATOR);
        Payload::Text(bytes)
    }

    /// `size` bytes where byte `k` is `(offset + k) % 256`. Pure
    /// function of its inputs.
    pub fn pattern(offset: usize, size: usize) -> Self {
        let bytes = (0..size).map(|k| ((offset + k) & 0xFF) as u8).collect();
        Payload::Raw(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(b) | Payload::Raw(b) => b,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Has the accumulator seen enough to stop polling?
    pub fn is_complete(&self, rx: &[u8]) -> bool {
        match self {
            Payload::Text(_) => rx.contains(&TERMINATOR),
            Payload::Raw(sent) => rx.len() >= sent.len(),
        }
    }

    /// Byte-exact comparison against the sent payload. Text compares the
    /// whole accumulator, terminator included; Raw compares the first
    /// `len(sent)` bytes and ignores trailing extras.
    pub fn matches(&self, rx: &[u8]) -> bool {
        match self {
            Payload::Text(sent) => rx == sent.as_slice(),
            Payload::Raw(sent) => rx.len() >= sent.len() && &rx[..sent.len()] == sent.as_slice(),
        }
    }

    /// Render received bytes for log lines: lossy text for Text payloads,
    /// hex for Raw ones.
    pub fn render(&self, bytes: &[u8]) -> String {
        match self {
            Payload::Text(_) => String::from_utf8_lossy(bytes).trim_end().to_string(),
            Payload::Raw(_) => {
                let mut s = String::with_capacity(bytes.len() * 2);
                for b in bytes {
                    let _ = write!(s, "{:02X}", b);
                }
                s
            }
        }
    }
}
