//! Protocol module containing the framing layer, the envelope type, and the
//! binary envelope codec.

pub mod codec;
pub mod envelope;
pub mod framing;

pub use codec::{decode_envelope, encode_envelope, CodecError};
pub use envelope::{tag, Envelope};
pub use framing::{read_frame, write_frame, FramingError};
