//! Decoded packet records consumed and produced by the detection engine.
//!
//! Wire encoding and protocol-version translation happen upstream of this crate:
//! every record here is already upgraded to the latest protocol and converted to
//! plain Rust values. `S*` records travel client to server, `C*` records travel
//! server to client.

pub mod packets;
pub mod version;

pub use packets::{ClientboundPacket, ServerboundPacket};
pub use version::{DeviceOs, GameMode, ProtocolVersion};
