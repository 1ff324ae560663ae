use flate2::Crc;

use super::{
    Event, FileContent, Status, Timestamp, FLAG_EOF, FLAG_FILE_CONTENT, FLAG_MIME,
    FLAG_ROUTE_CODE, FLAG_RUNNABLE, FLAG_TAGS, FLAG_TEST_ID, FLAG_TIMESTAMP, FLAG_VERSION_MASK,
    SIGNATURE, VERSION,
};
use crate::error::DecodeError;

/// Reads one variable-length number; returns it with the bytes consumed.
pub fn read_varint(bytes: &[u8]) -> Result<(u32, usize), DecodeError> {
    let first = *bytes.first().ok_or(DecodeError::Truncated { got: 0, need: 1 })?;
    let width = usize::from(first >> 6) + 1;
    if bytes.len() < width {
        return Err(DecodeError::Truncated {
            got: bytes.len(),
            need: width,
        });
    }
    let value = bytes[1..width]
        .iter()
        .fold(u32::from(first & 0x3F), |acc, b| (acc << 8) | u32::from(*b));
    Ok((value, width))
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.pos + n;
        if end > self.bytes.len() {
            return Err(DecodeError::Truncated {
                got: self.bytes.len(),
                need: end,
            });
        }
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn varint(&mut self) -> Result<u32, DecodeError> {
        let (value, width) = read_varint(&self.bytes[self.pos..])?;
        self.pos += width;
        Ok(value)
    }

    fn bytes(&mut self) -> Result<Vec<u8>, DecodeError> {
        let len = self.varint()? as usize;
        Ok(self.take(len)?.to_vec())
    }

    fn string(&mut self) -> Result<String, DecodeError> {
        String::from_utf8(self.bytes()?).map_err(|_| DecodeError::InvalidUtf8)
    }
}

/// Parses the packet at the start of `bytes`; returns the event and the
/// packet length.
pub fn decode_packet(bytes: &[u8]) -> Result<(Event, usize), DecodeError> {
    let mut head = Cursor { bytes, pos: 0 };
    let signature = head.take(1)?[0];
    if signature != SIGNATURE {
        return Err(DecodeError::BadSignature(signature));
    }
    let flag_bytes = head.take(2)?;
    let flags = u16::from_be_bytes([flag_bytes[0], flag_bytes[1]]);
    if flags & FLAG_VERSION_MASK != VERSION {
        return Err(DecodeError::BadVersion((flags >> 12) as u8));
    }
    let total = head.varint()? as usize;
    if total < head.pos + 4 || total > bytes.len() {
        return Err(DecodeError::Truncated {
            got: bytes.len(),
            need: total.max(head.pos + 4),
        });
    }

    let crc_at = total - 4;
    let stored = u32::from_be_bytes([
        bytes[crc_at],
        bytes[crc_at + 1],
        bytes[crc_at + 2],
        bytes[crc_at + 3],
    ]);
    let mut crc = Crc::new();
    crc.update(&bytes[..crc_at]);
    if crc.sum() != stored {
        return Err(DecodeError::CrcMismatch {
            stored,
            computed: crc.sum(),
        });
    }

    let mut fields = Cursor {
        bytes: &bytes[..crc_at],
        pos: head.pos,
    };
    let mut event = Event::new(Status::from_code(flags));
    event.runnable = flags & FLAG_RUNNABLE != 0;
    event.eof = flags & FLAG_EOF != 0;

    if flags & FLAG_TIMESTAMP != 0 {
        let secs = fields.take(4)?;
        let seconds = u32::from_be_bytes([secs[0], secs[1], secs[2], secs[3]]);
        let nanos = fields.varint()?;
        event.timestamp = Some(Timestamp { seconds, nanos });
    }
    if flags & FLAG_TEST_ID != 0 {
        event.test_id = Some(fields.string()?);
    }
    if flags & FLAG_TAGS != 0 {
        let count = fields.varint()?;
        for _ in 0..count {
            event.tags.push(fields.string()?);
        }
    }
    if flags & FLAG_MIME != 0 {
        event.mime = Some(fields.string()?);
    }
    if flags & FLAG_FILE_CONTENT != 0 {
        let name = fields.string()?;
        let bytes = fields.bytes()?;
        event.file = Some(FileContent { name, bytes });
    }
    if flags & FLAG_ROUTE_CODE != 0 {
        event.route_code = Some(fields.string()?);
    }
    Ok((event, total))
}

/// Parses a whole stream of back-to-back packets.
pub fn decode_stream(mut bytes: &[u8]) -> Result<Vec<Event>, DecodeError> {
    let mut events = Vec::new();
    while !bytes.is_empty() {
        let (event, len) = decode_packet(bytes)?;
        events.push(event);
        bytes = &bytes[len..];
    }
    Ok(events)
}
