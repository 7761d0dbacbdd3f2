use std::net::SocketAddr;
use std::process::ExitCode;
use std::time::Duration;

use bt_handshake::Handshake;
use clap::Parser;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_PEER_ID: &str = "-RT0100-f52c3727bfe8";

/// Connect to a peer and check that it serves the given torrent
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Address of the peer, e.g. 127.0.0.1:6881
    #[arg(short, long)]
    peer: SocketAddr,

    /// Info hash of the torrent as 40 hex characters
    #[arg(short, long, value_parser = parse_info_hash)]
    info_hash: [u8; 20],

    /// Our peer id, exactly 20 bytes
    #[arg(long, default_value = DEFAULT_PEER_ID)]
    peer_id: String,

    /// Seconds to wait for the TCP connection
    #[arg(long, default_value_t = 10)]
    connect_timeout: u64,
}

fn parse_info_hash(s: &str) -> Result<[u8; 20], String> {
    let bytes = hex::decode(s).map_err(|e| e.to_string())?;
    <[u8; 20]>::try_from(bytes.as_slice())
        .map_err(|_| format!("info hash must be 20 bytes, got {}", bytes.len()))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(peer = %args.peer, "{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let handshake = Handshake::new(&args.info_hash, args.peer_id.as_bytes())?;

    let mut stream = timeout(
        Duration::from_secs(args.connect_timeout),
        TcpStream::connect(args.peer),
    )
    .await??;
    info!(peer = %args.peer, "connected");

    let remote = handshake.perform(&mut stream).await?;
    info!(
        peer = %args.peer,
        peer_id = %String::from_utf8_lossy(remote.peer_id()),
        reserved = %hex::encode(remote.reserved()),
        "handshake successful, info hash matches"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_info_hash() {
        let parsed = parse_info_hash("0123456789abcdef0123456789abcdef01234567").unwrap();
        assert_eq!(parsed[0], 0x01);
        assert_eq!(parsed[19], 0x67);

        assert!(parse_info_hash("0123").is_err());
        assert!(parse_info_hash("zz23456789abcdef0123456789abcdef01234567").is_err());
    }

    #[test]
    fn test_default_peer_id_is_valid() {
        assert_eq!(DEFAULT_PEER_ID.len(), 20);
        assert!(Handshake::new(&[0u8; 20], DEFAULT_PEER_ID.as_bytes()).is_ok());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "cli",
            "--peer",
            "127.0.0.1:6881",
            "--info-hash",
            "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
        ])
        .unwrap();

        assert_eq!(args.info_hash, [0xAA; 20]);
        assert_eq!(args.peer_id, DEFAULT_PEER_ID);
        assert_eq!(args.connect_timeout, 10);
    }
}
