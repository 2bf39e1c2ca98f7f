//! Binary codec for encoding and decoding protocol envelopes.
//!
//! Wire format (one envelope per frame):
//! ```text
//! [tag_len:2][tag:T][field_count:2]
//! then per field:
//! [name_len:2][name:N][value_len:4][value:V]
//! ```
//! All multi-byte integers are big-endian; all strings are UTF-8.  Values get
//! a 4-byte length so arbitrarily long (or empty) field values round-trip
//! exactly.  This layout is the interoperability contract — a server
//! implementation must produce and consume these bytes verbatim.

use std::collections::HashMap;

use thiserror::Error;

use crate::protocol::envelope::Envelope;

/// Errors that can occur during envelope encoding or decoding.
#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    /// The envelope tag is empty; an envelope without an operation name is
    /// meaningless on the wire.
    #[error("envelope tag must not be empty")]
    EmptyTag,

    /// The byte slice ended before the declared structure was complete.
    #[error("malformed envelope: {context}: need {needed} bytes, got {available}")]
    Truncated {
        context: &'static str,
        needed: usize,
        available: usize,
    },

    /// A tag, field name, or field value was not valid UTF-8.
    #[error("malformed envelope: invalid UTF-8 in {0}")]
    InvalidUtf8(&'static str),

    /// The same field name appeared twice; field names are unique by contract.
    #[error("malformed envelope: duplicate field {0:?}")]
    DuplicateField(String),

    /// Bytes were left over after the declared fields were consumed.
    #[error("malformed envelope: {0} trailing bytes after last field")]
    TrailingBytes(usize),

    /// A length would not fit its prefix width (tag/name > u16, value > u32,
    /// or more than u16 fields).
    #[error("envelope component too large for wire format: {0}")]
    TooLarge(&'static str),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Serializes an envelope into the self-describing byte layout documented in
/// the module header.
///
/// # Errors
///
/// Returns [`CodecError::EmptyTag`] for an empty tag and
/// [`CodecError::TooLarge`] when a component exceeds its length prefix.
///
/// # Examples
///
/// ```rust
/// use ebooking_core::{decode_envelope, encode_envelope, Envelope};
///
/// let env = Envelope::login("alice", "hunter2");
/// let bytes = encode_envelope(&env).unwrap();
/// assert_eq!(decode_envelope(&bytes).unwrap(), env);
/// ```
pub fn encode_envelope(envelope: &Envelope) -> Result<Vec<u8>, CodecError> {
    if envelope.tag().is_empty() {
        return Err(CodecError::EmptyTag);
    }
    if envelope.fields().len() > u16::MAX as usize {
        return Err(CodecError::TooLarge("field count"));
    }

    let mut buf = Vec::new();
    write_short_string(&mut buf, envelope.tag(), "tag")?;
    buf.extend_from_slice(&(envelope.fields().len() as u16).to_be_bytes());

    // HashMap iteration order is arbitrary; field order is not significant
    // on the wire, so no sort is needed for correctness.
    for (name, value) in envelope.fields() {
        write_short_string(&mut buf, name, "field name")?;
        if value.len() > u32::MAX as usize {
            return Err(CodecError::TooLarge("field value"));
        }
        buf.extend_from_slice(&(value.len() as u32).to_be_bytes());
        buf.extend_from_slice(value.as_bytes());
    }
    Ok(buf)
}

/// Parses an envelope from bytes, inverting [`encode_envelope`] exactly.
///
/// # Errors
///
/// Returns a [`CodecError`] describing the first structural violation: a
/// truncated component, invalid UTF-8, an empty tag, a duplicate field name,
/// or trailing bytes after the last field.
pub fn decode_envelope(bytes: &[u8]) -> Result<Envelope, CodecError> {
    let mut cursor = Cursor::new(bytes);

    let tag = cursor.read_short_string("tag")?;
    if tag.is_empty() {
        return Err(CodecError::EmptyTag);
    }

    let field_count = cursor.read_u16("field count")? as usize;
    let mut fields = HashMap::with_capacity(field_count);
    for _ in 0..field_count {
        let name = cursor.read_short_string("field name")?;
        let value = cursor.read_long_string("field value")?;
        if fields.insert(name.clone(), value).is_some() {
            return Err(CodecError::DuplicateField(name));
        }
    }

    if cursor.remaining() > 0 {
        return Err(CodecError::TrailingBytes(cursor.remaining()));
    }

    Ok(Envelope::new(tag, fields))
}

// ── Encode helper ─────────────────────────────────────────────────────────────

/// Writes a 2-byte length prefix followed by the UTF-8 string bytes.
fn write_short_string(buf: &mut Vec<u8>, s: &str, what: &'static str) -> Result<(), CodecError> {
    if s.len() > u16::MAX as usize {
        return Err(CodecError::TooLarge(what));
    }
    buf.extend_from_slice(&(s.len() as u16).to_be_bytes());
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

// ── Decode cursor ─────────────────────────────────────────────────────────────

/// Bounds-checked read cursor over the input slice.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], CodecError> {
        if self.remaining() < n {
            return Err(CodecError::Truncated {
                context,
                needed: n,
                available: self.remaining(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u16(&mut self, context: &'static str) -> Result<u16, CodecError> {
        let b = self.take(2, context)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn read_u32(&mut self, context: &'static str) -> Result<u32, CodecError> {
        let b = self.take(4, context)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_short_string(&mut self, context: &'static str) -> Result<String, CodecError> {
        let len = self.read_u16(context)? as usize;
        self.read_utf8(len, context)
    }

    fn read_long_string(&mut self, context: &'static str) -> Result<String, CodecError> {
        let len = self.read_u32(context)? as usize;
        self.read_utf8(len, context)
    }

    fn read_utf8(&mut self, len: usize, context: &'static str) -> Result<String, CodecError> {
        let bytes = self.take(len, context)?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| CodecError::InvalidUtf8(context))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
