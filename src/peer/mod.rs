use std::time::Duration;

pub mod error;
pub mod exchange;
pub mod handshake;

pub const PSTR: &str = "BitTorrent protocol";
pub const PSTR_LEN: u8 = PSTR.len() as u8; // always 19
pub const RESERVED_LEN: usize = 8;
pub const INFO_HASH_LEN: usize = 20;
pub const PEER_ID_LEN: usize = 20;

/// pstrlen + pstr + reserved + info_hash + peer_id
pub const HANDSHAKE_LEN: usize =
    1 + PSTR_LEN as usize + RESERVED_LEN + INFO_HASH_LEN + PEER_ID_LEN;

/// Upper bound on the wait for the peer's handshake once we start reading.
pub const RECEIVE_TIMEOUT: Duration = Duration::from_secs(10);

pub use error::HandshakeError;
pub use handshake::Handshake;
