//! Infrastructure layer for the client.
//!
//! Everything that touches the outside world lives here:
//!
//! - **`network`** – TCP connection establishment with retry, and the
//!   [`network::Channel`] that frames envelopes over the stream.
//! - **`storage`** – TOML configuration persistence in the platform
//!   config directory.
//! - **`ui_bridge`** – the console implementation of the application
//!   layer's `ScreenIo` trait.
//!
//! The application layer depends on this module only through narrow
//! types (`Channel`, `ScreenIo` implementations), never the reverse.

pub mod network;
pub mod storage;
pub mod ui_bridge;
