use std::io::Write;

use flate2::Crc;

use super::{
    Event, FileContent, Status, FLAG_EOF, FLAG_FILE_CONTENT, FLAG_MIME, FLAG_ROUTE_CODE, FLAG_RUNNABLE, FLAG_TAGS,
    FLAG_TEST_ID, FLAG_TIMESTAMP, MAX_PACKET_LEN, MAX_VARINT, SIGNATURE, VERSION,
};
use crate::error::EncodeError;

/// Appends `value` as a 1 to 4 byte number; the top two bits of the first
/// byte hold the byte count minus one.
pub fn write_varint(buf: &mut Vec<u8>, value: u32) -> Result<(), EncodeError> {
    match value {
        0..=0x3F => buf.push(value as u8),
        0x40..=0x3FFF => buf.extend_from_slice(&((value as u16) | 0x4000).to_be_bytes()),
        0x4000..=0x3F_FFFF => buf.extend_from_slice(&(value | 0x80_0000).to_be_bytes()[1..]),
        0x40_0000..=MAX_VARINT => buf.extend_from_slice(&(value | 0xC000_0000).to_be_bytes()),
        _ => return Err(EncodeError::NumberTooLarge(u64::from(value))),
    }
    Ok(())
}

fn write_len(buf: &mut Vec<u8>, len: usize) -> Result<(), EncodeError> {
    let value = u32::try_from(len).map_err(|_| EncodeError::NumberTooLarge(len as u64))?;
    write_varint(buf, value)
}

fn write_str(buf: &mut Vec<u8>, s: &str) -> Result<(), EncodeError> {
    write_len(buf, s.len())?;
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Size of the length field for a packet whose other parts take `rest` bytes.
fn length_field_size(rest: usize) -> usize {
    if rest <= 62 {
        1
    } else if rest <= 16_381 {
        2
    } else if rest <= 4_194_300 {
        3
    } else {
        4
    }
}

/// Serializes one event as a complete packet, CRC included.
pub fn encode_event(event: &Event) -> Result<Vec<u8>, EncodeError> {
    let mut flags = VERSION | event.status.code();
    let mut body = Vec::new();

    if let Some(ts) = event.timestamp {
        flags |= FLAG_TIMESTAMP;
        body.extend_from_slice(&ts.seconds.to_be_bytes());
        write_varint(&mut body, ts.nanos)?;
    }
    if let Some(test_id) = &event.test_id {
        flags |= FLAG_TEST_ID;
        write_str(&mut body, test_id)?;
    }
    if !event.tags.is_empty() {
        flags |= FLAG_TAGS;
        write_len(&mut body, event.tags.len())?;
        for tag in &event.tags {
            write_str(&mut body, tag)?;
        }
    }
    if let Some(mime) = &event.mime {
        flags |= FLAG_MIME;
        write_str(&mut body, mime)?;
    }
    if let Some(file) = &event.file {
        flags |= FLAG_FILE_CONTENT;
        write_str(&mut body, &file.name)?;
        write_len(&mut body, file.bytes.len())?;
        body.extend_from_slice(&file.bytes);
    }
    if let Some(route) = &event.route_code {
        flags |= FLAG_ROUTE_CODE;
        write_str(&mut body, route)?;
    }
    if event.runnable {
        flags |= FLAG_RUNNABLE;
    }
    if event.eof {
        flags |= FLAG_EOF;
    }

    // signature + flags + body + crc
    let rest = 1 + 2 + body.len() + 4;
    let total = rest + length_field_size(rest);
    if total > MAX_PACKET_LEN {
        return Err(EncodeError::PacketTooLarge(total));
    }

    let mut packet = Vec::with_capacity(total);
    packet.push(SIGNATURE);
    packet.extend_from_slice(&flags.to_be_bytes());
    write_len(&mut packet, total)?;
    packet.extend_from_slice(&body);

    let mut crc = Crc::new();
    crc.update(&packet);
    packet.extend_from_slice(&crc.sum().to_be_bytes());
    debug_assert_eq!(packet.len(), total);
    Ok(packet)
}

/// File bytes carried per packet once an event's content is split.
pub const FILE_CHUNK_LEN: usize = 64 * 1024;

/// Breaks an event with a large file into packets that each fit the size
/// limit.
///
/// Leading chunks travel as `undefined` events with the same test id, file
/// name and MIME type. The original status rides on the packet holding the
/// last chunk, so consumers still see exactly one status record per event.
pub fn split_event(event: &Event) -> Vec<Event> {
    let Some(file) = event.file.as_ref().filter(|f| f.bytes.len() > FILE_CHUNK_LEN) else {
        return vec![event.clone()];
    };
    let chunks: Vec<&[u8]> = file.bytes.chunks(FILE_CHUNK_LEN).collect();
    let Some((last, leading)) = chunks.split_last() else {
        return vec![event.clone()];
    };

    let part = |status: Status, bytes: &[u8], eof: bool| Event {
        test_id: event.test_id.clone(),
        status,
        timestamp: event.timestamp,
        tags: event.tags.clone(),
        mime: event.mime.clone(),
        file: Some(FileContent {
            name: file.name.clone(),
            bytes: bytes.to_vec(),
        }),
        route_code: event.route_code.clone(),
        runnable: event.runnable,
        eof,
    };
    let mut parts: Vec<Event> = leading
        .iter()
        .map(|chunk| part(Status::Undefined, *chunk, false))
        .collect();
    parts.push(part(event.status, *last, event.eof));
    parts
}

/// Writes events to a byte sink. An event is written as one packet, or as
/// several when its file content has to be split.
#[derive(Debug)]
pub struct StreamWriter<W> {
    output: W,
}

impl<W: Write> StreamWriter<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }

    /// Nothing reaches the sink unless every packet of the event encodes.
    pub fn status(&mut self, event: &Event) -> Result<(), EncodeError> {
        let packets = split_event(event)
            .iter()
            .map(encode_event)
            .collect::<Result<Vec<_>, _>>()?;
        for packet in &packets {
            self.output.write_all(packet)?;
        }
        tracing::trace!(
            status = %event.status,
            test_id = event.test_id.as_deref().unwrap_or(""),
            packets = packets.len(),
            bytes = packets.iter().map(Vec::len).sum::<usize>(),
            "subunit event written"
        );
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.output
    }
}
