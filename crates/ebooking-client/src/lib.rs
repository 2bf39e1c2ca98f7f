//! ebooking-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the client do?
//!
//! The client talks to the E-Booking server over a single persistent TCP
//! connection and walks the user through a sequence of screens:
//!
//! 1. Connects (with retry) and reads the server's one-frame greeting.
//! 2. Shows the Welcome screen; the user chooses Login or Register.
//! 3. Validates the entered form locally, then performs exactly one
//!    request/response envelope exchange for the submit.
//! 4. On a `success` response, moves on to the main menu; on anything else
//!    the same screen is re-shown with an error and a cleared password.
//!
//! Rendering is deliberately outside this crate's core: the session talks
//! to a `ScreenIo` trait, and the console adapter in `infrastructure` is
//! just one implementation of it (tests script another).

/// Application layer: the screen-flow state machine and the session use case.
pub mod application;

/// Infrastructure layer: TCP networking, config storage, and the console UI adapter.
pub mod infrastructure;
