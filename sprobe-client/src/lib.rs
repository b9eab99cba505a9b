//! # Sentinel Probe Client
//!
//! Purpose: Provide a minimal, synchronous RESP2 client that can issue a
//! single command to a sentinel and decode its reply, without pulling in a
//! full client library.
//!
//! ## Design Principles
//! 1. **One Connection, One Exchange**: The client owns exactly one socket,
//!    opened lazily and closed on every exit path.
//! 2. **Generic Entry Point**: `execute` sends any command; `info_fields`
//!    and `ping` are thin wrappers over it.
//! 3. **Protocol Clarity**: RESP2 framing is encoded and decoded explicitly.

mod client;
mod info;
mod resp;

pub use client::{
    ClientConfig, ClientError, ClientResult, SentinelClient, DEFAULT_HOST, DEFAULT_PORT,
};
pub use info::InfoFields;
pub use resp::{encode_command, read_reply, Reply};
