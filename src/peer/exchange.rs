use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::debug;

use crate::peer::{HANDSHAKE_LEN, Handshake, HandshakeError, RECEIVE_TIMEOUT};

impl Handshake {
    /// Sends our handshake on `stream` and waits for the peer's.
    ///
    /// The peer has [`RECEIVE_TIMEOUT`] from the moment we start reading to
    /// deliver all 68 bytes. The reply is returned unparsed; pass it to
    /// [`Handshake::verify`] before trusting it.
    pub async fn exchange<S>(&self, stream: &mut S) -> Result<[u8; HANDSHAKE_LEN], HandshakeError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let outgoing = self.serialize()?;
        trace_record("outgoing", &outgoing);

        stream
            .write_all(&outgoing)
            .await
            .map_err(HandshakeError::SendFailure)?;
        stream.flush().await.map_err(HandshakeError::SendFailure)?;

        let mut response = [0u8; HANDSHAKE_LEN];
        match timeout(RECEIVE_TIMEOUT, stream.read_exact(&mut response)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(HandshakeError::ReceiveFailure(e)),
            Err(_) => {
                debug!(timeout = ?RECEIVE_TIMEOUT, "peer did not answer handshake");
                return Err(HandshakeError::Timeout(RECEIVE_TIMEOUT));
            }
        }

        trace_record("incoming", &response);
        Ok(response)
    }

    /// Exchanges handshakes and checks that the peer is on the same torrent.
    pub async fn perform<S>(&self, stream: &mut S) -> Result<Handshake, HandshakeError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let response = self.exchange(stream).await?;
        self.verify(&response)
    }
}

fn trace_record(direction: &'static str, buf: &[u8; HANDSHAKE_LEN]) {
    debug!(
        direction,
        pstrlen = buf[0],
        pstr = %String::from_utf8_lossy(&buf[1..20]),
        reserved = %hex::encode(&buf[20..28]),
        info_hash = %hex::encode(&buf[28..48]),
        peer_id = %String::from_utf8_lossy(&buf[48..68]),
        "handshake"
    );
}
