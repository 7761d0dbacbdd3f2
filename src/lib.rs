pub mod peer;

// Re-export commonly used types for easier access
pub use peer::{HANDSHAKE_LEN, Handshake, HandshakeError, RECEIVE_TIMEOUT};
