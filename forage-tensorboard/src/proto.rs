//! Minimal protobuf wire decoding of events.
//!
//! Decodes only the fields scalar charts consume: `Event.wall_time` (1,
//! double), `Event.step` (2, int64) and `Event.summary` (5) with
//! `Summary.Value.tag` (1) / `Summary.Value.simple_value` (2). Every other
//! field, including the `file_version` event a writer emits first, is
//! skipped by wire type.
use crate::EventReadError;

const WIRE_VARINT: u8 = 0;
const WIRE_FIXED64: u8 = 1;
const WIRE_LEN: u8 = 2;
const WIRE_FIXED32: u8 = 5;

/// One decoded event.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Event {
    pub wall_time: f64,
    pub step: i64,
    /// `(tag, simple_value)` pairs carried by the event's summary.
    pub values: Vec<(String, f32)>,
}

pub(crate) fn decode_event(buf: &[u8]) -> Result<Event, EventReadError> {
    let mut event = Event::default();
    let mut r = WireReader::new(buf);
    while !r.done() {
        let (field, wire) = r.key()?;
        match (field, wire) {
            (1, WIRE_FIXED64) => event.wall_time = f64::from_bits(r.fixed64()?),
            (2, WIRE_VARINT) => event.step = r.varint()? as i64,
            (5, WIRE_LEN) => decode_summary(r.bytes()?, &mut event.values)?,
            _ => r.skip(wire)?,
        }
    }
    Ok(event)
}

fn decode_summary(buf: &[u8], values: &mut Vec<(String, f32)>) -> Result<(), EventReadError> {
    let mut r = WireReader::new(buf);
    while !r.done() {
        let (field, wire) = r.key()?;
        match (field, wire) {
            (1, WIRE_LEN) => decode_value(r.bytes()?, values)?,
            _ => r.skip(wire)?,
        }
    }
    Ok(())
}

fn decode_value(buf: &[u8], values: &mut Vec<(String, f32)>) -> Result<(), EventReadError> {
    let mut tag = None;
    let mut simple_value = None;
    let mut r = WireReader::new(buf);
    while !r.done() {
        let (field, wire) = r.key()?;
        match (field, wire) {
            (1, WIRE_LEN) => {
                let bytes = r.bytes()?;
                let s = std::str::from_utf8(bytes)
                    .map_err(|_| EventReadError::MalformedEvent("tag is not utf-8".into()))?;
                tag = Some(s.to_owned());
            }
            (2, WIRE_FIXED32) => simple_value = Some(f32::from_bits(r.fixed32()?)),
            _ => r.skip(wire)?,
        }
    }
    // Non-scalar summaries (images, histograms) carry a tag but no
    // simple_value; they are not collected.
    if let (Some(tag), Some(value)) = (tag, simple_value) {
        values.push((tag, value));
    }
    Ok(())
}

struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn done(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn key(&mut self) -> Result<(u64, u8), EventReadError> {
        let key = self.varint()?;
        Ok((key >> 3, (key & 0x7) as u8))
    }

    fn varint(&mut self) -> Result<u64, EventReadError> {
        let mut value = 0u64;
        let mut shift = 0u32;
        loop {
            let byte = self.byte()?;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
            if shift >= 64 {
                return Err(EventReadError::MalformedEvent("varint overflow".into()));
            }
        }
    }

    fn byte(&mut self) -> Result<u8, EventReadError> {
        let byte = *self
            .buf
            .get(self.pos)
            .ok_or_else(|| EventReadError::MalformedEvent("message ended inside a field".into()))?;
        self.pos += 1;
        Ok(byte)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], EventReadError> {
        if n > self.buf.len() - self.pos {
            return Err(EventReadError::MalformedEvent(
                "message ended inside a field".into(),
            ));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn fixed64(&mut self) -> Result<u64, EventReadError> {
        let bytes = self.take(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(arr))
    }

    fn fixed32(&mut self) -> Result<u32, EventReadError> {
        let bytes = self.take(4)?;
        let mut arr = [0u8; 4];
        arr.copy_from_slice(bytes);
        Ok(u32::from_le_bytes(arr))
    }

    fn bytes(&mut self) -> Result<&'a [u8], EventReadError> {
        let len = self.varint()? as usize;
        self.take(len)
    }

    fn skip(&mut self, wire: u8) -> Result<(), EventReadError> {
        match wire {
            WIRE_VARINT => {
                self.varint()?;
            }
            WIRE_FIXED64 => {
                self.take(8)?;
            }
            WIRE_LEN => {
                self.bytes()?;
            }
            WIRE_FIXED32 => {
                self.take(4)?;
            }
            other => {
                return Err(EventReadError::MalformedEvent(format!(
                    "unsupported wire type {}",
                    other
                )))
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn varint(mut v: u64) -> Vec<u8> {
        let mut out = Vec::new();
        loop {
            let byte = (v & 0x7f) as u8;
            v >>= 7;
            if v == 0 {
                out.push(byte);
                break;
            }
            out.push(byte | 0x80);
        }
        out
    }

    fn tag_value(tag: &str, value: f32) -> Vec<u8> {
        let mut out = vec![0x0a, tag.len() as u8];
        out.extend_from_slice(tag.as_bytes());
        out.push(0x15);
        out.extend_from_slice(&value.to_le_bytes());
        out
    }

    fn event(wall_time: f64, step: i64, tag_values: &[(&str, f32)]) -> Vec<u8> {
        let mut out = vec![0x09];
        out.extend_from_slice(&wall_time.to_le_bytes());
        out.push(0x10);
        out.extend_from_slice(&varint(step as u64));
        if !tag_values.is_empty() {
            let mut summary = Vec::new();
            for (tag, value) in tag_values {
                let encoded = tag_value(tag, *value);
                summary.push(0x0a);
                summary.push(encoded.len() as u8);
                summary.extend_from_slice(&encoded);
            }
            out.push(0x2a);
            out.push(summary.len() as u8);
            out.extend_from_slice(&summary);
        }
        out
    }

    #[test]
    fn decodes_a_scalar_event() {
        let buf = event(123.5, 7, &[("Train/Episode_Reward", 0.5)]);
        let decoded = decode_event(&buf).unwrap();
        assert_eq!(decoded.wall_time, 123.5);
        assert_eq!(decoded.step, 7);
        assert_eq!(
            decoded.values,
            vec![("Train/Episode_Reward".to_owned(), 0.5)]
        );
    }

    #[test]
    fn decodes_multiple_values_in_one_summary() {
        let buf = event(1.0, 3, &[("a", 1.5), ("b", -2.0)]);
        let decoded = decode_event(&buf).unwrap();
        assert_eq!(decoded.values.len(), 2);
        assert_eq!(decoded.values[1], ("b".to_owned(), -2.0));
    }

    #[test]
    fn skips_unknown_fields() {
        // A file_version event: field 3 (string), no summary.
        let mut buf = vec![0x09];
        buf.extend_from_slice(&2.0f64.to_le_bytes());
        let version = b"brain.Event:2";
        buf.push(0x1a);
        buf.push(version.len() as u8);
        buf.extend_from_slice(version);

        let decoded = decode_event(&buf).unwrap();
        assert_eq!(decoded.wall_time, 2.0);
        assert!(decoded.values.is_empty());
    }

    #[test]
    fn value_without_simple_value_is_not_collected() {
        // A summary value carrying only a tag, as an image value would.
        let mut value = vec![0x0a, 3];
        value.extend_from_slice(b"img");
        let mut summary = vec![0x0a, value.len() as u8];
        summary.extend_from_slice(&value);
        let mut buf = vec![0x2a, summary.len() as u8];
        buf.extend_from_slice(&summary);

        let decoded = decode_event(&buf).unwrap();
        assert!(decoded.values.is_empty());
    }

    #[test]
    fn truncated_message_is_malformed() {
        let buf = event(123.5, 7, &[("acc", 0.5)]);
        let result = decode_event(&buf[..buf.len() - 2]);
        assert!(matches!(result, Err(EventReadError::MalformedEvent(_))));
    }
}
