// SPDX-License-Identifier: MIT

//! Transport-agnostic request/response contract for the session manager
//! (spec §6). The original kernel module used character-device ioctls as
//! transport; we specify only the message shapes and a length-prefixed
//! JSON framing that `sessionfs-daemon` happens to run over a Unix
//! socket. Any other transport can reuse `Request`/`Response` as-is.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload.

mod request;
mod response;
mod wire;

pub use request::{Request, SESSION_FLAG};
pub use response::Response;
pub use wire::{decode, encode, read_message, write_message, ProtocolError};
