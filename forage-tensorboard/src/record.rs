//! TFRecord framing.
//!
//! Each record is `{length: u64 le, masked crc32c of the length bytes,
//! payload, masked crc32c of the payload}`.
use crate::crc32c::masked_crc32c;
use crate::EventReadError;
use std::io::{ErrorKind, Read};

pub(crate) struct RecordReader<R> {
    inner: R,
}

impl<R: Read> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Reads the next record payload, `Ok(None)` at a clean end of file.
    pub fn next_record(&mut self) -> Result<Option<Vec<u8>>, EventReadError> {
        let mut len_bytes = [0u8; 8];
        match self.fill(&mut len_bytes)? {
            0 => return Ok(None),
            8 => {}
            _ => return Err(EventReadError::TruncatedRecord),
        }
        let expected = self.read_u32()?;
        let found = masked_crc32c(&len_bytes);
        if expected != found {
            return Err(EventReadError::LengthCrcMismatch { expected, found });
        }

        // The length passed its checksum, so it can be trusted as written.
        let len = u64::from_le_bytes(len_bytes) as usize;
        let mut payload = vec![0u8; len];
        if self.fill(&mut payload)? != len {
            return Err(EventReadError::TruncatedRecord);
        }
        let expected = self.read_u32()?;
        let found = masked_crc32c(&payload);
        if expected != found {
            return Err(EventReadError::PayloadCrcMismatch { expected, found });
        }

        Ok(Some(payload))
    }

    /// Reads until `buf` is full or the input ends; returns the bytes read.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, EventReadError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(filled)
    }

    fn read_u32(&mut self) -> Result<u32, EventReadError> {
        let mut bytes = [0u8; 4];
        if self.fill(&mut bytes)? != 4 {
            return Err(EventReadError::TruncatedRecord);
        }
        Ok(u32::from_le_bytes(bytes))
    }
}
