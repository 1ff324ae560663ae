use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("unsupported config version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("number {0} does not fit a subunit varint")]
    NumberTooLarge(u64),

    #[error("packet of {0} bytes exceeds the 4 MiB limit")]
    PacketTooLarge(usize),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("truncated packet (got={got}, need={need})")]
    Truncated { got: usize, need: usize },

    #[error("bad packet signature 0x{0:02x}")]
    BadSignature(u8),

    #[error("unsupported protocol version {0}")]
    BadVersion(u8),

    #[error("crc mismatch (stored=0x{stored:08x}, computed=0x{computed:08x})")]
    CrcMismatch { stored: u32, computed: u32 },

    #[error("field is not valid UTF-8")]
    InvalidUtf8,
}
