//! # Ports Layer
//!
//! - `inbound` - `LedgerApi`, the operations the engine offers
//! - `outbound` - storage, codec, identity and matching SPIs

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
