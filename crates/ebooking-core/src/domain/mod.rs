//! Domain logic for the E-Booking client.
//!
//! Pure business rules with no I/O dependencies: everything here can be
//! compiled and tested without a network, a server, or a UI.  The outer
//! layers (session, console adapter) depend on this module; it never
//! depends on them.

/// Pre-submit validation of user-entered forms.
pub mod validation;
