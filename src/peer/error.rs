use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::peer::INFO_HASH_LEN;

#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("{field} must be {expected} bytes, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("encoded handshake should be {expected} bytes, got {actual}")]
    EncodingInvariantViolation { expected: usize, actual: usize },

    #[error("failed to send handshake: {0}")]
    SendFailure(#[source] io::Error),

    #[error("no handshake received within {0:?}")]
    Timeout(Duration),

    #[error("failed to read handshake response: {0}")]
    ReceiveFailure(#[source] io::Error),

    #[error("invalid protocol length: expected 19, got {0}")]
    InvalidProtocolLength(u8),

    #[error("invalid protocol string: {:?}", String::from_utf8_lossy(.0))]
    InvalidProtocolLabel(Vec<u8>),

    #[error(
        "info hash mismatch: expected {}, got {}",
        hex::encode(.expected),
        hex::encode(.actual)
    )]
    ContentIdentifierMismatch {
        expected: [u8; INFO_HASH_LEN],
        actual: [u8; INFO_HASH_LEN],
    },
}

impl HandshakeError {
    /// True when the peer did not answer in time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// True for failures of the underlying stream rather than of the record itself.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::SendFailure(_) | Self::ReceiveFailure(_) | Self::Timeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_message_shows_both_hashes() {
        let err = HandshakeError::ContentIdentifierMismatch {
            expected: [0x01; 20],
            actual: [0xFF; 20],
        };
        let msg = err.to_string();

        assert!(msg.contains(&"01".repeat(20)));
        assert!(msg.contains(&"ff".repeat(20)));
    }

    #[test]
    fn test_classification() {
        let timeout = HandshakeError::Timeout(Duration::from_secs(10));
        assert!(timeout.is_timeout());
        assert!(timeout.is_io());

        let eof = HandshakeError::ReceiveFailure(io::ErrorKind::UnexpectedEof.into());
        assert!(!eof.is_timeout());
        assert!(eof.is_io());

        assert!(!HandshakeError::InvalidProtocolLength(18).is_io());
    }

    #[test]
    fn test_invalid_label_is_readable() {
        let err = HandshakeError::InvalidProtocolLabel(b"BitTorrent protocoX".to_vec());
        assert!(err.to_string().contains("BitTorrent protocoX"));
    }
}
