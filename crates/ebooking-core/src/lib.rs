//! # ebooking-core
//!
//! Shared library for the E-Booking client containing the wire protocol
//! (framing and envelope codec) and the pre-submit validation rules.
//!
//! This crate has zero dependencies on sockets, UI frameworks, or OS APIs.
//! The framing layer is written against generic `AsyncRead`/`AsyncWrite`
//! streams so it can be unit-tested with in-memory pipes; the application
//! crate binds it to a real TCP connection.
//!
//! # Architecture overview
//!
//! The E-Booking server speaks a small synchronous request/response
//! protocol: the client sends one authentication request (login or
//! register) and blocks for exactly one response.  This crate defines:
//!
//! - **`protocol`** – How bytes travel over the connection.  Each message
//!   is one length-prefixed *frame* carrying one encoded *envelope*
//!   (a tag string plus named string fields).
//!
//! - **`domain`** – Pure business logic with no I/O.  Form validation runs
//!   here before any bytes are sent, so an obviously bad submission never
//!   costs a network round trip.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `ebooking_core::Envelope` instead of `ebooking_core::protocol::envelope::Envelope`.
pub use domain::validation::{
    validate_login, validate_register, LoginForm, RegisterForm, ValidationError,
};
pub use protocol::codec::{decode_envelope, encode_envelope, CodecError};
pub use protocol::envelope::Envelope;
pub use protocol::framing::{read_frame, write_frame, FramingError};
