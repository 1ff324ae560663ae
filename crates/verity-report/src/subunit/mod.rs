//! Subunit v2 event stream.
//!
//! Every event is one self-delimiting packet:
//! `SIGNATURE FLAGS LENGTH TIMESTAMP? TEST_ID? TAGS? MIME? FILE? ROUTE? CRC32`.

use std::fmt;

use chrono::{DateTime, Utc};

mod decode;
mod encode;

pub use decode::{decode_packet, decode_stream, read_varint};
pub use encode::{encode_event, split_event, write_varint, StreamWriter, FILE_CHUNK_LEN};

pub const SIGNATURE: u8 = 0xB3;
pub const VERSION: u16 = 0x2000;
pub const MAX_PACKET_LEN: usize = 4 * 1024 * 1024;
pub const MAX_VARINT: u32 = (1 << 30) - 1;

pub const MIME_TEXT_PLAIN: &str = "text/plain;charset=utf8";

pub(crate) const FLAG_VERSION_MASK: u16 = 0xF000;
pub(crate) const FLAG_TEST_ID: u16 = 0x0800;
pub(crate) const FLAG_ROUTE_CODE: u16 = 0x0400;
pub(crate) const FLAG_TIMESTAMP: u16 = 0x0200;
pub(crate) const FLAG_RUNNABLE: u16 = 0x0100;
pub(crate) const FLAG_TAGS: u16 = 0x0080;
pub(crate) const FLAG_MIME: u16 = 0x0040;
pub(crate) const FLAG_EOF: u16 = 0x0020;
pub(crate) const FLAG_FILE_CONTENT: u16 = 0x0010;
pub(crate) const STATUS_MASK: u16 = 0x0007;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Undefined,
    Exists,
    InProgress,
    Success,
    UnexpectedSuccess,
    Skip,
    Fail,
    ExpectedFailure,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::Undefined => 0,
            Status::Exists => 1,
            Status::InProgress => 2,
            Status::Success => 3,
            Status::UnexpectedSuccess => 4,
            Status::Skip => 5,
            Status::Fail => 6,
            Status::ExpectedFailure => 7,
        }
    }

    pub fn from_code(code: u16) -> Self {
        match code & STATUS_MASK {
            1 => Status::Exists,
            2 => Status::InProgress,
            3 => Status::Success,
            4 => Status::UnexpectedSuccess,
            5 => Status::Skip,
            6 => Status::Fail,
            7 => Status::ExpectedFailure,
            _ => Status::Undefined,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Undefined => "undefined",
            Status::Exists => "exists",
            Status::InProgress => "inprogress",
            Status::Success => "success",
            Status::UnexpectedSuccess => "uxsuccess",
            Status::Skip => "skip",
            Status::Fail => "fail",
            Status::ExpectedFailure => "xfail",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seconds since the Unix epoch (32 bits on the wire) plus nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub seconds: u32,
    pub nanos: u32,
}

impl Timestamp {
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Instants outside the 32-bit range are clamped.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        let seconds = at.timestamp().clamp(0, i64::from(u32::MAX));
        Self {
            seconds: u32::try_from(seconds).unwrap_or(u32::MAX),
            nanos: at.timestamp_subsec_nanos().min(999_999_999),
        }
    }

    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::from(self.seconds), self.nanos)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// One status record of the stream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Event {
    pub test_id: Option<String>,
    pub status: Status,
    pub timestamp: Option<Timestamp>,
    pub tags: Vec<String>,
    pub mime: Option<String>,
    pub file: Option<FileContent>,
    pub route_code: Option<String>,
    pub runnable: bool,
    pub eof: bool,
}

impl Event {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn for_test(test_id: impl Into<String>, status: Status) -> Self {
        Self {
            test_id: Some(test_id.into()),
            runnable: true,
            ..Self::new(status)
        }
    }

    /// Attaches a `text/plain` file blob.
    pub fn with_text(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.file = Some(FileContent {
            name: name.into(),
            bytes: bytes.into(),
        });
        self.mime = Some(MIME_TEXT_PLAIN.to_string());
        self
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Text of the attached file, if any.
    pub fn file_text(&self) -> Option<String> {
        self.file
            .as_ref()
            .map(|file| String::from_utf8_lossy(&file.bytes).into_owned())
    }
}
