//! Application layer for the client.
//!
//! - **`screens`** – The explicit finite-state machine: which screen is
//!   active and how user input plus server responses move between screens.
//!   Pure data and functions, testable without a connection or a UI.
//!
//! - **`session`** – The session use case.  Owns the [`Channel`] and the
//!   retained form state, drives the state machine, and performs the
//!   request/response exchanges.  The UI is injected behind the
//!   [`session::ScreenIo`] trait.
//!
//! [`Channel`]: crate::infrastructure::network::Channel

pub mod screens;
pub mod session;
