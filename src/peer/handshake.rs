use tracing::debug;

use crate::peer::{
    HANDSHAKE_LEN, HandshakeError, INFO_HASH_LEN, PEER_ID_LEN, PSTR, PSTR_LEN, RESERVED_LEN,
};

/// The fixed 68-byte record both sides send right after connecting.
///
/// Fields are private so that what gets sent is always what `verify` later
/// compares against. Build a new value for every connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    reserved: [u8; RESERVED_LEN],
    infohash: [u8; INFO_HASH_LEN],
    peer_id: [u8; PEER_ID_LEN],
}

impl Handshake {
    /// Builds an outbound handshake, rejecting ids that are not exactly 20 bytes.
    pub fn new(infohash: &[u8], peer_id: &[u8]) -> Result<Self, HandshakeError> {
        let infohash = fixed::<INFO_HASH_LEN>("info hash", infohash)?;
        let peer_id = fixed::<PEER_ID_LEN>("peer id", peer_id)?;

        Ok(Self::from_ids(infohash, peer_id))
    }

    pub const fn from_ids(infohash: [u8; INFO_HASH_LEN], peer_id: [u8; PEER_ID_LEN]) -> Self {
        Self {
            reserved: [0u8; RESERVED_LEN],
            infohash,
            peer_id,
        }
    }

    pub fn info_hash(&self) -> &[u8; INFO_HASH_LEN] {
        &self.infohash
    }

    pub fn peer_id(&self) -> &[u8; PEER_ID_LEN] {
        &self.peer_id
    }

    /// Extension bits as received. Always zero on handshakes we build.
    pub fn reserved(&self) -> &[u8; RESERVED_LEN] {
        &self.reserved
    }

    pub fn serialize(&self) -> Result<[u8; HANDSHAKE_LEN], HandshakeError> {
        let mut buf = Vec::with_capacity(HANDSHAKE_LEN);
        buf.push(PSTR_LEN);
        buf.extend_from_slice(PSTR.as_bytes());
        buf.extend_from_slice(&self.reserved);
        buf.extend_from_slice(&self.infohash);
        buf.extend_from_slice(&self.peer_id);

        <[u8; HANDSHAKE_LEN]>::try_from(buf).map_err(|buf| {
            HandshakeError::EncodingInvariantViolation {
                expected: HANDSHAKE_LEN,
                actual: buf.len(),
            }
        })
    }

    /// Parses a peer's record. Reserved bytes are kept but not interpreted.
    pub fn deserialize(buf: &[u8]) -> Result<Self, HandshakeError> {
        if buf.len() != HANDSHAKE_LEN {
            return Err(HandshakeError::InvalidLength {
                field: "handshake",
                expected: HANDSHAKE_LEN,
                actual: buf.len(),
            });
        }
        if buf[0] != PSTR_LEN {
            return Err(HandshakeError::InvalidProtocolLength(buf[0]));
        }
        if &buf[1..20] != PSTR.as_bytes() {
            return Err(HandshakeError::InvalidProtocolLabel(buf[1..20].to_vec()));
        }

        Ok(Self {
            reserved: fixed("reserved", &buf[20..28])?,
            infohash: fixed("info hash", &buf[28..48])?,
            peer_id: fixed("peer id", &buf[48..68])?,
        })
    }

    /// Checks that `raw` is a well-formed handshake for the same torrent as ours.
    ///
    /// The remote peer id is not compared. On success the decoded remote
    /// handshake is returned so the caller can look at its peer id.
    pub fn verify(&self, raw: &[u8]) -> Result<Handshake, HandshakeError> {
        let remote = Self::deserialize(raw)?;

        if remote.infohash != self.infohash {
            debug!(
                expected = %hex::encode(self.infohash),
                actual = %hex::encode(remote.infohash),
                "peer handshake is for another torrent"
            );
            return Err(HandshakeError::ContentIdentifierMismatch {
                expected: self.infohash,
                actual: remote.infohash,
            });
        }

        Ok(remote)
    }
}

fn fixed<const N: usize>(field: &'static str, bytes: &[u8]) -> Result<[u8; N], HandshakeError> {
    <[u8; N]>::try_from(bytes).map_err(|_| HandshakeError::InvalidLength {
        field,
        expected: N,
        actual: bytes.len(),
    })
}
